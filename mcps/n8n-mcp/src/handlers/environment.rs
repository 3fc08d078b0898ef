//! Environment handler implementations

use mcp_common::{json_success, CallToolResult, McpError};
use serde_json::json;

use crate::client::N8nApi;

/// Configured environments with their base URLs; API keys are never shown
pub async fn list_environments(api: &N8nApi) -> Result<CallToolResult, McpError> {
    let config = api.config();
    let environments: Vec<_> = config
        .environment_names()
        .into_iter()
        .filter_map(|name| {
            config.resolve(Some(name)).ok().map(|(name, instance)| {
                json!({
                    "name": name,
                    "host": instance.host,
                    "default": name == config.default_env(),
                })
            })
        })
        .collect();

    json_success(&json!({
        "defaultEnv": config.default_env(),
        "environments": environments,
    }))
}
