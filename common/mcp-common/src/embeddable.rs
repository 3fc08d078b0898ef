//! In-process tool execution
//!
//! [`EmbeddableMcp`] lets a host (or a test) list and call a server's tools
//! directly, without a stdio transport in between.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let tools = server.list_tools();
//! let result = server.call_tool("list_workflows", serde_json::json!({})).await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ErrorCode, Tool};
use rmcp::ErrorData as McpError;
use serde_json::Value;

/// Error type for embeddable MCP operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// Tool was not found in the server
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid parameters passed to the tool
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Tool execution failed
    #[error("tool execution failed: {0}")]
    ExecutionError(String),

    /// Arguments could not be deserialized into the tool's parameter type
    #[error("invalid arguments: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// MCP protocol error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<McpError> for EmbeddableError {
    fn from(err: McpError) -> Self {
        if err.code == ErrorCode::INVALID_PARAMS {
            EmbeddableError::InvalidParams(err.message.to_string())
        } else if err.code == ErrorCode::METHOD_NOT_FOUND {
            EmbeddableError::ToolNotFound(err.message.to_string())
        } else {
            EmbeddableError::McpError(err.message.to_string())
        }
    }
}

impl EmbeddableError {
    /// Convert back into the JSON-RPC error a stdio client would see
    pub fn into_mcp_error(self) -> McpError {
        match self {
            EmbeddableError::ToolNotFound(name) => crate::method_not_found(format!(
                "tool not found: {}",
                name
            )),
            EmbeddableError::InvalidParams(msg) => crate::invalid_params(msg),
            EmbeddableError::SerdeError(e) => crate::invalid_params(e.to_string()),
            EmbeddableError::ExecutionError(msg) | EmbeddableError::McpError(msg) => {
                crate::internal_error(msg)
            }
        }
    }
}

/// Result type for embeddable MCP operations
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// Trait for MCP servers that can be executed in-process
///
/// Implementations must be `Send + Sync`; tool calls may arrive from
/// several tasks at once.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Server name, matching the name used in MCP client configuration
    fn server_name(&self) -> &str;

    /// All available tools with their input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a tool by name with a JSON object of arguments
    ///
    /// Unknown names yield [`EmbeddableError::ToolNotFound`]; arguments that
    /// do not match the tool's schema yield [`EmbeddableError::SerdeError`]
    /// or [`EmbeddableError::InvalidParams`].
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    /// Optional human-readable description
    fn server_description(&self) -> Option<&str> {
        None
    }

    /// Server version, if available
    fn server_version(&self) -> Option<&str> {
        None
    }
}
