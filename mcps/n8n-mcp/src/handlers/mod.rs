//! Handler implementations for n8n MCP tools
//!
//! Organized by domain: workflow, execution, tag, credential, prompt, environment
//!
//! Blank required arguments are rejected with `invalid_params` before any
//! request is made. Everything that fails after that point (translation,
//! upstream errors, timeouts) is returned as an `isError` result carrying
//! [`N8nError::to_payload`].

mod credential;
mod environment;
mod execution;
mod prompt;
mod tag;
mod workflow;

pub use credential::*;
pub use environment::*;
pub use execution::*;
pub use prompt::*;
pub use tag::*;
pub use workflow::*;

use mcp_common::{json_error, json_success, CallToolResult, McpError};
use serde::Serialize;

use crate::error::N8nResult;

/// Shape a client result into the tool envelope
pub fn respond<T: Serialize>(result: N8nResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => json_success(&value),
        Err(e) => {
            tracing::warn!("Tool call failed: {}", e);
            Ok(json_error(&e.to_payload()))
        }
    }
}
