//! Result envelopes for MCP tool responses
//!
//! Success: `{content: [{type: "text", text: <json>}]}`.
//! Failure: the same shape with `isError: true`.

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

/// Create a successful JSON response from any serializable data
///
/// The payload is pretty-printed into a single text content item.
///
/// ```rust,ignore
/// json_success(&workflow)
/// ```
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Create a tool-level failure carrying a JSON body
///
/// Unlike a protocol error this reaches the model as a normal result with
/// `isError: true`, so it can read the guidance and retry.
pub fn json_error<T: Serialize>(data: &T) -> CallToolResult {
    let json = serde_json::to_string_pretty(data).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("failed to serialize error: {}", e) }).to_string()
    });
    CallToolResult::error(vec![Content::text(json)])
}
