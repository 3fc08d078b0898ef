//! n8n MCP Server
//!
//! Serves the n8n REST API over MCP stdio. Configuration comes from
//! `--config`, `.config.json` in the working directory, or the `N8N_HOST` /
//! `N8N_API_KEY` environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rmcp::ServiceExt;

use n8n_mcp::config::Config;
use n8n_mcp::server::N8nMcpServer;

#[derive(Parser)]
#[command(name = "n8n-mcp")]
#[command(about = "MCP server for the n8n workflow automation API")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, env = "N8N_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the default environment
    #[arg(long, env = "N8N_MCP_ENV")]
    env: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    mcp_common::init_tracing("n8n_mcp")?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(env) = cli.env.as_deref() {
        config = config.with_default_env(env)?;
    }
    tracing::info!(
        "Starting n8n MCP Server (environments: {}, default: {})",
        config.environment_names().join(", "),
        config.default_env()
    );

    let service = N8nMcpServer::new(Arc::new(config))
        .serve(rmcp::transport::stdio())
        .await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
