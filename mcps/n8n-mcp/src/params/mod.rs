//! Parameter types for n8n MCP tools
//!
//! Organized by domain: workflow, execution, tag, credential, prompt.
//! Every platform tool takes an optional `instance` naming the environment.

mod credential;
mod execution;
mod prompt;
mod tag;
mod workflow;

pub use credential::*;
pub use execution::*;
pub use prompt::*;
pub use tag::*;
pub use workflow::*;
