//! Protocol-level error helpers
//!
//! Tool failures that the caller can act on belong in the result envelope
//! (see [`crate::result::json_error`]). The helpers here build JSON-RPC
//! errors for requests that are malformed at the protocol level.

use rmcp::model::ErrorCode;
use rmcp::ErrorData as McpError;

/// Type alias for MCP tool results
pub type McpResult<T> = Result<T, McpError>;

/// Trait for converting errors into MCP-compatible errors
///
/// Implement this for a crate's own error type so handlers can use
/// [`ResultExt::to_mcp_err`].
pub trait IntoMcpError {
    /// Convert this error into an MCP error
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(format!("JSON error: {}", self), None)
    }
}

impl IntoMcpError for anyhow::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(self.to_string(), None)
    }
}

/// Extension trait for Result types to convert to MCP errors
///
/// ```rust,ignore
/// use mcp_common::ResultExt;
///
/// let body = serde_json::to_string(&value).to_mcp_err()?;
/// ```
pub trait ResultExt<T> {
    /// Convert the error to an MCP error
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(|e| e.into_mcp_error())
    }
}

/// Create an internal error with a message
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// Create an invalid params error with a message
///
/// Use this when a required argument is missing or blank.
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}

/// Create a "method not found" error, used for unknown tool names
pub fn method_not_found(message: impl Into<String>) -> McpError {
    McpError::new(ErrorCode::METHOD_NOT_FOUND, message.into(), None)
}

/// Fail with `invalid_params` when a required string argument is blank
///
/// ```rust,ignore
/// let id = require_non_empty("id", &params.id)?;
/// ```
pub fn require_non_empty<'a>(field: &str, value: &'a str) -> McpResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid_params(format!("{} is required", field)));
    }
    Ok(trimmed)
}
