//! Execution handler implementations

use mcp_common::{require_non_empty, CallToolResult, McpError};
use serde_json::json;

use crate::client::{ExecutionQuery, N8nApi};
use crate::params::{ExecutionIdParams, GetExecutionParams, ListExecutionsParams};

use super::respond;

pub async fn list_executions(
    api: &N8nApi,
    params: ListExecutionsParams,
) -> Result<CallToolResult, McpError> {
    let filter = ExecutionQuery {
        workflow_id: params.workflow_id.filter(|id| !id.trim().is_empty()),
        status: params.status,
        include_data: params.include_data,
        limit: params.limit,
        cursor: params.cursor,
    };
    respond(api.list_executions(params.instance.as_deref(), &filter).await)
}

pub async fn get_execution(
    api: &N8nApi,
    params: GetExecutionParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let include_data = params.include_data.unwrap_or(false);
    respond(
        api.get_execution(params.instance.as_deref(), id, include_data)
            .await,
    )
}

pub async fn delete_execution(
    api: &N8nApi,
    params: ExecutionIdParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let result = api.delete_execution(params.instance.as_deref(), id).await;
    respond(result.map(|_| json!({ "deleted": true, "id": id })))
}
