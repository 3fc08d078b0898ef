//! n8n MCP Server implementation
//!
//! Tools delegate to the handlers module. The `ServerHandler` impl is written
//! out instead of generated so that unknown tool names fail with
//! `method_not_found`, and so prompts and resources can be served next to
//! the tools.

use mcp_common::{
    async_trait, method_not_found, EmbeddableError, EmbeddableMcp,
    EmbeddableResult, McpError, ResultExt, Tool,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::{
        CallToolRequestParam, CallToolResult, GetPromptRequestParam, GetPromptResult,
        ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult, ListToolsResult,
        PaginatedRequestParam, Prompt, PromptArgument, PromptMessage, PromptMessageRole,
        ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_router, RoleServer,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::client::N8nApi;
use crate::config::Config;
use crate::error::{ErrorKind, N8nError};
use crate::handlers;
use crate::params::*;
use crate::prompts::{self, PromptTemplate};
use crate::resources::{self, ResourceRef};

/// The n8n MCP Server
#[derive(Clone)]
pub struct N8nMcpServer {
    api: Arc<N8nApi>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl N8nMcpServer {
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_api(Arc::new(N8nApi::new(config)))
    }

    pub fn with_api(api: Arc<N8nApi>) -> Self {
        Self {
            api,
            tool_router: Self::tool_router(),
        }
    }

    pub fn api(&self) -> &N8nApi {
        &self.api
    }

    // ========================================================================
    // Workflows
    // ========================================================================

    #[tool(description = "List workflows (summaries only: id, name, active, timestamps, nodeCount, tags)")]
    async fn list_workflows(
        &self,
        Parameters(params): Parameters<ListWorkflowsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::list_workflows(&self.api, params).await
    }

    #[tool(description = "Get a workflow with its nodes, connections and settings")]
    async fn get_workflow(
        &self,
        Parameters(params): Parameters<WorkflowIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_workflow(&self.api, params).await
    }

    #[tool(
        description = "Create a workflow from a flat node list and source->target connections. Node ids are generated when missing; Set node values are normalised"
    )]
    async fn create_workflow(
        &self,
        Parameters(params): Parameters<CreateWorkflowParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::create_workflow(&self.api, params).await
    }

    #[tool(description = "Replace a workflow's nodes, connections and settings (full update)")]
    async fn update_workflow(
        &self,
        Parameters(params): Parameters<UpdateWorkflowParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::update_workflow(&self.api, params).await
    }

    #[tool(description = "Translate and validate a workflow without sending it to n8n")]
    async fn validate_workflow(
        &self,
        Parameters(params): Parameters<ValidateWorkflowParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::validate_workflow(params).await
    }

    #[tool(description = "Delete a workflow")]
    async fn delete_workflow(
        &self,
        Parameters(params): Parameters<WorkflowIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::delete_workflow(&self.api, params).await
    }

    #[tool(
        description = "Activate a workflow. Adds an hourly schedule trigger first if the workflow has no trigger node"
    )]
    async fn activate_workflow(
        &self,
        Parameters(params): Parameters<WorkflowIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::activate_workflow(&self.api, params).await
    }

    #[tool(description = "Deactivate a workflow")]
    async fn deactivate_workflow(
        &self,
        Parameters(params): Parameters<WorkflowIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::deactivate_workflow(&self.api, params).await
    }

    #[tool(description = "Run a workflow, optionally waiting (bounded) for the execution to finish")]
    async fn execute_workflow(
        &self,
        Parameters(params): Parameters<ExecuteWorkflowParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::execute_workflow(&self.api, params).await
    }

    #[tool(description = "Get the tags attached to a workflow")]
    async fn get_workflow_tags(
        &self,
        Parameters(params): Parameters<WorkflowIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_workflow_tags(&self.api, params).await
    }

    #[tool(description = "Replace the tags attached to a workflow")]
    async fn update_workflow_tags(
        &self,
        Parameters(params): Parameters<UpdateWorkflowTagsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::update_workflow_tags(&self.api, params).await
    }

    // ========================================================================
    // Executions
    // ========================================================================

    #[tool(description = "List executions, optionally filtered by workflow and status")]
    async fn list_executions(
        &self,
        Parameters(params): Parameters<ListExecutionsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::list_executions(&self.api, params).await
    }

    #[tool(description = "Get one execution, optionally with full run data")]
    async fn get_execution(
        &self,
        Parameters(params): Parameters<GetExecutionParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_execution(&self.api, params).await
    }

    #[tool(description = "Delete an execution")]
    async fn delete_execution(
        &self,
        Parameters(params): Parameters<ExecutionIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::delete_execution(&self.api, params).await
    }

    // ========================================================================
    // Tags
    // ========================================================================

    #[tool(description = "List tags")]
    async fn list_tags(
        &self,
        Parameters(params): Parameters<ListTagsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::list_tags(&self.api, params).await
    }

    #[tool(description = "Get a tag by ID")]
    async fn get_tag(
        &self,
        Parameters(params): Parameters<TagIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_tag(&self.api, params).await
    }

    #[tool(description = "Create a tag")]
    async fn create_tag(
        &self,
        Parameters(params): Parameters<CreateTagParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::create_tag(&self.api, params).await
    }

    #[tool(description = "Rename a tag; a random suffix is added if the name is taken")]
    async fn update_tag(
        &self,
        Parameters(params): Parameters<UpdateTagParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::update_tag(&self.api, params).await
    }

    #[tool(description = "Delete a tag")]
    async fn delete_tag(
        &self,
        Parameters(params): Parameters<TagIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::delete_tag(&self.api, params).await
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    #[tool(description = "Create a credential (secrets are write-only)")]
    async fn create_credential(
        &self,
        Parameters(params): Parameters<CreateCredentialParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::create_credential(&self.api, params).await
    }

    #[tool(description = "Delete a credential")]
    async fn delete_credential(
        &self,
        Parameters(params): Parameters<CredentialIdParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::delete_credential(&self.api, params).await
    }

    #[tool(description = "Get the JSON schema of a credential type's data")]
    async fn get_credential_schema(
        &self,
        Parameters(params): Parameters<CredentialSchemaParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_credential_schema(&self.api, params).await
    }

    // ========================================================================
    // Environments & Prompts
    // ========================================================================

    #[tool(description = "List configured n8n environments and the default")]
    async fn list_environments(&self) -> Result<CallToolResult, McpError> {
        handlers::list_environments(&self.api).await
    }

    #[tool(description = "Fill a workflow template and return the create_workflow input")]
    async fn fill_prompt(
        &self,
        Parameters(params): Parameters<FillPromptParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::fill_prompt(params).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

impl rmcp::ServerHandler for N8nMcpServer {
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.ensure_route(&request.name)?;
        tracing::info!("call_tool: {}", request.name);
        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(
            prompts::list().iter().map(to_prompt).collect(),
        ))
    }

    /// Fills the named template; this is the `prompts/fill` path
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        let filled = prompts::fill(&request.name, &arguments).to_mcp_err()?;
        Ok(GetPromptResult {
            description: Some(filled.description.clone()),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                filled.message(),
            )],
        })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(resources::list_resources())
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(resources::list_resource_templates())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let resource = ResourceRef::parse(&request.uri).ok_or_else(|| {
            McpError::resource_not_found(
                format!("Unknown resource: {}", request.uri),
                Some(json!({ "uri": request.uri })),
            )
        })?;

        let value = resources::read(&self.api, &resource)
            .await
            .map_err(|e| resource_error(&request.uri, e))?;
        Ok(resources::text_contents(&request.uri, &value))
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "n8n MCP server. Manage workflows, executions, tags and credentials on one or \
                 more n8n instances. Pass `instance` to target a non-default environment \
                 (see list_environments). Workflows use a flat node list plus \
                 source->target connections."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }
}

impl N8nMcpServer {
    /// Unknown tool names are a protocol error, not a tool failure
    fn ensure_route(&self, name: &str) -> Result<(), McpError> {
        if self.tool_router.has_route(name) {
            Ok(())
        } else {
            Err(method_not_found(format!("Unknown tool: {}", name)))
        }
    }
}

fn to_prompt(template: &PromptTemplate) -> Prompt {
    let arguments = template
        .variables
        .iter()
        .map(|v| PromptArgument {
            name: v.name.to_string(),
            title: None,
            description: Some(match v.default {
                Some(default) => format!("{} (default: {})", v.description, default),
                None => v.description.to_string(),
            }),
            required: Some(v.required),
        })
        .collect();
    Prompt::new(template.name, Some(template.description), Some(arguments))
}

fn resource_error(uri: &str, e: N8nError) -> McpError {
    let data = Some(e.to_payload());
    match e.kind() {
        Some(ErrorKind::NotFound) => McpError::resource_not_found(format!("{}: {}", uri, e), data),
        _ => McpError::internal_error(e.to_string(), data),
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

fn args<T: serde::de::DeserializeOwned>(params: Value) -> EmbeddableResult<T> {
    // Tools without required fields accept a missing argument object
    let params = if params.is_null() {
        Value::Object(Map::new())
    } else {
        params
    };
    Ok(serde_json::from_value(params)?)
}

#[async_trait]
impl EmbeddableMcp for N8nMcpServer {
    fn server_name(&self) -> &str {
        "n8n"
    }

    fn server_description(&self) -> Option<&str> {
        Some(
            "n8n MCP Server - workflow, execution, tag and credential management \
             for one or more n8n instances.",
        )
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        let result = match name {
            "list_workflows" => self.list_workflows(Parameters(args(params)?)).await,
            "get_workflow" => self.get_workflow(Parameters(args(params)?)).await,
            "create_workflow" => self.create_workflow(Parameters(args(params)?)).await,
            "update_workflow" => self.update_workflow(Parameters(args(params)?)).await,
            "validate_workflow" => self.validate_workflow(Parameters(args(params)?)).await,
            "delete_workflow" => self.delete_workflow(Parameters(args(params)?)).await,
            "activate_workflow" => self.activate_workflow(Parameters(args(params)?)).await,
            "deactivate_workflow" => self.deactivate_workflow(Parameters(args(params)?)).await,
            "execute_workflow" => self.execute_workflow(Parameters(args(params)?)).await,
            "get_workflow_tags" => self.get_workflow_tags(Parameters(args(params)?)).await,
            "update_workflow_tags" => self.update_workflow_tags(Parameters(args(params)?)).await,

            "list_executions" => self.list_executions(Parameters(args(params)?)).await,
            "get_execution" => self.get_execution(Parameters(args(params)?)).await,
            "delete_execution" => self.delete_execution(Parameters(args(params)?)).await,

            "list_tags" => self.list_tags(Parameters(args(params)?)).await,
            "get_tag" => self.get_tag(Parameters(args(params)?)).await,
            "create_tag" => self.create_tag(Parameters(args(params)?)).await,
            "update_tag" => self.update_tag(Parameters(args(params)?)).await,
            "delete_tag" => self.delete_tag(Parameters(args(params)?)).await,

            "create_credential" => self.create_credential(Parameters(args(params)?)).await,
            "delete_credential" => self.delete_credential(Parameters(args(params)?)).await,
            "get_credential_schema" => self.get_credential_schema(Parameters(args(params)?)).await,

            "list_environments" => self.list_environments().await,
            "fill_prompt" => self.fill_prompt(Parameters(args(params)?)).await,

            _ => return Err(EmbeddableError::ToolNotFound(name.to_string())),
        };
        result.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> N8nMcpServer {
        // Port 9 (discard) is never listening; tests below must not reach it
        let config = Config::from_json_str(
            r#"{
                "environments": {
                    "prod": {"n8n_host": "http://127.0.0.1:9", "n8n_api_key": "secret-key"},
                    "dev": {"n8n_host": "http://127.0.0.1:9/api/v1/", "n8n_api_key": "dev-key"}
                },
                "defaultEnv": "prod"
            }"#,
        )
        .unwrap();
        N8nMcpServer::new(Arc::new(config))
    }

    fn text(result: &CallToolResult) -> Value {
        let raw = result.content[0].as_text().unwrap().text.clone();
        serde_json::from_str(&raw).unwrap()
    }

    fn is_error(result: &CallToolResult) -> bool {
        result.is_error.unwrap_or(false)
    }

    #[test]
    fn test_embeddable_server_name() {
        assert_eq!(server().server_name(), "n8n");
    }

    #[test]
    fn test_embeddable_list_tools() {
        let tools = server().list_tools();
        assert_eq!(tools.len(), 24);

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        for expected in [
            "list_workflows",
            "create_workflow",
            "activate_workflow",
            "execute_workflow",
            "update_workflow_tags",
            "list_executions",
            "update_tag",
            "get_credential_schema",
            "list_environments",
            "fill_prompt",
        ] {
            assert!(names.contains(&expected), "missing tool {}", expected);
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = server().call_tool("nonexistent_tool", json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_blank_id_is_invalid_params() {
        let result = server().call_tool("get_workflow", json!({"id": "  "})).await;
        assert!(matches!(result, Err(EmbeddableError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_missing_id_is_serde_error() {
        let result = server().call_tool("delete_tag", json!({})).await;
        let err = result.unwrap_err();
        assert!(matches!(err, EmbeddableError::SerdeError(_)));
        assert_eq!(err.into_mcp_error().code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_create_without_nodes_is_invalid_params() {
        let err = server()
            .call_tool("create_workflow", json!({"name": "wf"}))
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddableError::SerdeError(_)));
        assert_eq!(err.into_mcp_error().code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_route_guard_rejects_unknown_tool() {
        let server = server();
        let err = server.ensure_route("drop_database").unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::METHOD_NOT_FOUND);
        assert!(err.message.contains("drop_database"));

        for tool in EmbeddableMcp::list_tools(&server) {
            assert!(server.ensure_route(&tool.name).is_ok(), "{} not routed", tool.name);
        }
    }

    #[tokio::test]
    async fn test_translation_error_is_tool_error() {
        let result = server()
            .call_tool(
                "create_workflow",
                json!({
                    "nodes": [{"name": "A", "type": "t"}],
                    "connections": [{"source": "A", "target": "Ghost"}]
                }),
            )
            .await
            .unwrap();
        assert!(is_error(&result));
        let body = text(&result);
        assert_eq!(body["kind"], "validation");
        assert!(body["error"].as_str().unwrap().contains("Ghost"));
    }

    #[tokio::test]
    async fn test_validate_workflow() {
        let result = server()
            .call_tool(
                "validate_workflow",
                json!({
                    "nodes": [
                        {"name": "Start", "type": "n8n-nodes-base.manualTrigger"},
                        {"name": "Set", "type": "n8n-nodes-base.set",
                         "parameters": {"values": [{"name": "data", "value": "hi"}]}}
                    ],
                    "connections": [{"source": "Start", "target": "Set"}]
                }),
            )
            .await
            .unwrap();
        assert!(!is_error(&result));
        let body = text(&result);
        assert_eq!(body["nodeCount"], 2);
        assert_eq!(body["triggers"], json!(["n8n-nodes-base.manualTrigger"]));
        assert_eq!(
            body["workflow"]["connections"]["node_1"]["main"][0][0]["node"],
            "node_2"
        );
    }

    #[tokio::test]
    async fn test_unknown_instance_is_tool_error() {
        let result = server()
            .call_tool("list_workflows", json!({"instance": "qa"}))
            .await
            .unwrap();
        assert!(is_error(&result));
        let body = text(&result);
        assert_eq!(body["kind"], "configuration");
        assert!(body["error"].as_str().unwrap().contains("dev, prod"));
    }

    #[tokio::test]
    async fn test_list_environments_hides_keys() {
        let result = server()
            .call_tool("list_environments", Value::Null)
            .await
            .unwrap();
        let body = text(&result);
        assert_eq!(body["defaultEnv"], "prod");
        assert_eq!(body["environments"].as_array().unwrap().len(), 2);
        assert_eq!(body["environments"][0]["host"], "http://127.0.0.1:9/api/v1");
        assert!(!body.to_string().contains("secret-key"));
    }

    #[tokio::test]
    async fn test_fill_prompt() {
        let result = server()
            .call_tool(
                "fill_prompt",
                json!({"name": "webhook_workflow",
                       "arguments": {"workflow_name": "Hook", "webhook_path": "in"}}),
            )
            .await
            .unwrap();
        let body = text(&result);
        assert_eq!(body["workflow"]["name"], "Hook");

        let missing = server()
            .call_tool("fill_prompt", json!({"name": "webhook_workflow"}))
            .await;
        assert!(matches!(missing, Err(EmbeddableError::InvalidParams(_))));
    }

    #[test]
    fn test_prompt_listing_carries_arguments() {
        let prompt = to_prompt(prompts::get("schedule_workflow").unwrap());
        let arguments = prompt.arguments.unwrap();
        let cron = arguments.iter().find(|a| a.name == "cron_expression").unwrap();
        assert_eq!(cron.required, Some(false));
        assert!(cron.description.as_deref().unwrap().contains("0 * * * *"));
    }
}
