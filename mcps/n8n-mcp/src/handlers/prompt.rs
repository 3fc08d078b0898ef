//! Prompt template handler implementations

use mcp_common::{
    invalid_params, json_success, require_non_empty, CallToolResult, IntoMcpError, McpError,
    ResultExt,
};

use crate::params::FillPromptParams;
use crate::prompts::{self, PromptError};

impl IntoMcpError for PromptError {
    /// Unknown templates and missing variables are the caller's fault
    fn into_mcp_error(self) -> McpError {
        match self {
            PromptError::NotFound(_) | PromptError::MissingVariable { .. } => {
                invalid_params(self.to_string())
            }
            PromptError::InvalidTemplate { .. } => mcp_common::internal_error(self.to_string()),
        }
    }
}

pub async fn fill_prompt(params: FillPromptParams) -> Result<CallToolResult, McpError> {
    let name = require_non_empty("name", &params.name)?;
    let arguments = params.arguments.unwrap_or_default();
    let filled = prompts::fill(name, &arguments).to_mcp_err()?;
    json_success(&filled)
}
