//! Workflow handler implementations

use mcp_common::{require_non_empty, CallToolResult, McpError};
use serde_json::json;
use tracing::info;

use crate::client::{N8nApi, WorkflowQuery};
use crate::error::N8nResult;
use crate::params::{
    CreateWorkflowParams, ExecuteWorkflowParams, ListWorkflowsParams, UpdateWorkflowParams,
    UpdateWorkflowTagsParams, ValidateWorkflowParams, WorkflowBody, WorkflowIdParams,
};
use crate::translate::{translate, trigger::trigger_types, WorkflowInput};

use super::respond;

/// Structural validation of the body; `nodes` presence is enforced by the
/// parameter schema
fn parse_body(body: &WorkflowBody) -> N8nResult<WorkflowInput> {
    WorkflowInput::from_value(&body.to_value())
}

pub async fn list_workflows(
    api: &N8nApi,
    params: ListWorkflowsParams,
) -> Result<CallToolResult, McpError> {
    let filter = WorkflowQuery {
        active: params.active,
        tags: params.tags,
        name: params.name,
        limit: params.limit,
        cursor: params.cursor,
    };
    respond(api.list_workflows(params.instance.as_deref(), &filter).await)
}

pub async fn get_workflow(
    api: &N8nApi,
    params: WorkflowIdParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    respond(api.get_workflow(params.instance.as_deref(), id).await)
}

pub async fn create_workflow(
    api: &N8nApi,
    params: CreateWorkflowParams,
) -> Result<CallToolResult, McpError> {
    let input = match parse_body(&params.workflow) {
        Ok(input) => input,
        Err(e) => return respond::<()>(Err(e)),
    };
    info!("create_workflow: {} node(s)", input.nodes.len());
    respond(api.create_workflow(params.instance.as_deref(), &input).await)
}

pub async fn update_workflow(
    api: &N8nApi,
    params: UpdateWorkflowParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let input = match parse_body(&params.workflow) {
        Ok(input) => input,
        Err(e) => return respond::<()>(Err(e)),
    };
    respond(api.update_workflow(params.instance.as_deref(), id, &input).await)
}

/// Translate without touching the platform
pub async fn validate_workflow(params: ValidateWorkflowParams) -> Result<CallToolResult, McpError> {
    let result = parse_body(&params.workflow).and_then(|input| translate(&input));
    respond(result.map(|spec| {
        json!({
            "valid": true,
            "nodeCount": spec.nodes.len(),
            "triggers": trigger_types(&spec),
            "workflow": spec,
        })
    }))
}

pub async fn delete_workflow(
    api: &N8nApi,
    params: WorkflowIdParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let result = api.delete_workflow(params.instance.as_deref(), id).await;
    respond(result.map(|deleted| json!({ "deleted": true, "id": id, "workflow": deleted })))
}

pub async fn activate_workflow(
    api: &N8nApi,
    params: WorkflowIdParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    respond(api.activate_workflow(params.instance.as_deref(), id).await)
}

pub async fn deactivate_workflow(
    api: &N8nApi,
    params: WorkflowIdParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    respond(api.deactivate_workflow(params.instance.as_deref(), id).await)
}

pub async fn execute_workflow(
    api: &N8nApi,
    params: ExecuteWorkflowParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let data = params.data.filter(|d| !d.is_null());
    respond(
        api.execute_workflow(params.instance.as_deref(), id, data, params.wait.unwrap_or(false))
            .await,
    )
}

pub async fn get_workflow_tags(
    api: &N8nApi,
    params: WorkflowIdParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    respond(api.get_workflow_tags(params.instance.as_deref(), id).await)
}

pub async fn update_workflow_tags(
    api: &N8nApi,
    params: UpdateWorkflowTagsParams,
) -> Result<CallToolResult, McpError> {
    let id = require_non_empty("id", &params.id)?;
    let tag_ids: Vec<String> = params
        .tag_ids
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    respond(
        api.update_workflow_tags(params.instance.as_deref(), id, &tag_ids)
            .await,
    )
}
