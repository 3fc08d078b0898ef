//! n8n MCP Server
//!
//! Exposes the n8n workflow automation REST API as MCP tools, prompts and
//! resources, across one or more configured n8n instances.
//!
//! # Architecture
//!
//! - `config` - Environment map loading and base URL normalisation
//! - `error` - [`N8nError`] and the tool error payload
//! - `translate` - Flat node/connection input to the platform workflow format
//! - `client` - Typed REST client, one HTTP transport per environment
//! - `wait` - Bounded polling for long-running executions
//! - `prompts` - Workflow templates
//! - `resources` - `n8n://` resources
//! - `handlers` - MCP tool handlers
//! - `params` - MCP parameter types
//! - `server` - MCP server implementation

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod params;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod translate;
pub mod wait;

pub use client::N8nApi;
pub use config::{Config, N8nInstance};
pub use error::{ErrorKind, N8nError, N8nResult};
pub use server::N8nMcpServer;
