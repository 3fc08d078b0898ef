//! MCP Common - Shared plumbing for stdio MCP servers
//!
//! - **Initialization**: [`init_tracing`] (stderr logging, `DEBUG`, `LOG_FORMAT`)
//! - **Results**: [`json_success`] / [`json_error`] tool envelopes
//! - **Errors**: protocol error helpers and [`IntoMcpError`]
//! - **Embeddable**: [`EmbeddableMcp`] for in-process tool calls

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{
    internal_error, invalid_params, method_not_found, require_non_empty, IntoMcpError, McpResult,
    ResultExt,
};
pub use init::init_tracing;
pub use result::{json_error, json_success};

pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
