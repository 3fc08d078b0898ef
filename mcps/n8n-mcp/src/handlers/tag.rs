//! Tag handler implementations

use mcp_common::{require_non_empty, CallToolResult, McpError};
use serde_json::json;

use crate::client::N8nApi;
use crate::params::{CreateTagParams, ListTagsParams, TagIdParams, UpdateTagParams};

use super::respond;

pub async fn list_tags(api: &N8nApi, params: ListTagsParams) -> Result<CallToolResult, McpError> {
    respond(
        api.list_tags(params.instance.as_deref(), params.limit, params.cursor.as_deref())
            .await,
    )
}

pub async fn get_tag(api: &N8nApi, params: TagIdParams) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    respond(api.get_tag(params.instance.as_deref(), id).await)
}

pub async fn create_tag(api: &N8nApi, params: CreateTagParams) -> Result<CallToolResult, McpError> {
    let name = require_non_empty("name", &params.name)?;
    respond(api.create_tag(params.instance.as_deref(), name).await)
}

pub async fn update_tag(api: &N8nApi, params: UpdateTagParams) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let name = require_non_empty("name", &params.name)?;
    respond(api.update_tag(params.instance.as_deref(), id, name).await)
}

pub async fn delete_tag(api: &N8nApi, params: TagIdParams) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let result = api.delete_tag(params.instance.as_deref(), id).await;
    respond(result.map(|_| json!({ "deleted": true, "id": id })))
}
