//! Credential handler implementations

use mcp_common::{require_non_empty, CallToolResult, McpError};
use serde_json::json;

use crate::client::N8nApi;
use crate::params::{CreateCredentialParams, CredentialIdParams, CredentialSchemaParams};

use super::respond;

pub async fn create_credential(
    api: &N8nApi,
    params: CreateCredentialParams,
) -> Result<CallToolResult, McpError> {
    let name = require_non_empty("name", &params.name)?;
    let credential_type = require_non_empty("type", &params.credential_type)?;
    respond(
        api.create_credential(params.instance.as_deref(), name, credential_type, params.data.clone())
            .await,
    )
}

pub async fn delete_credential(
    api: &N8nApi,
    params: CredentialIdParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let result = api.delete_credential(params.instance.as_deref(), id).await;
    respond(result.map(|_| json!({ "deleted": true, "id": id })))
}

pub async fn get_credential_schema(
    api: &N8nApi,
    params: CredentialSchemaParams,
) -> Result<CallToolResult, McpError> {
    let credential_type = require_non_empty("credential_type", &params.credential_type)?;
    respond(
        api.get_credential_schema(params.instance.as_deref(), credential_type)
            .await,
    )
}
