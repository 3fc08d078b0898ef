//! Error types for n8n operations
//!
//! Validation and configuration failures are raised locally; everything that
//! comes back from the platform is run through [`crate::client::classify`]
//! and lands in [`N8nError::Api`].

use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// Category of an upstream failure, derived from status and message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SetNodeParameters,
    NameConflict,
    Authentication,
    PayloadTooLarge,
    RateLimited,
    ServerError,
    NotFound,
    Upstream,
}

/// Errors that can occur while talking to n8n
#[derive(Error, Debug)]
pub enum N8nError {
    /// Client input is malformed; never retried
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client for an environment could not be constructed
    #[error("failed to build HTTP client for environment '{env}': {reason}")]
    Client { env: String, reason: String },

    /// Non-success response from the platform
    #[error("{context}: {detail}")]
    Api {
        kind: ErrorKind,
        status: u16,
        context: String,
        /// Message as returned by the platform
        message: String,
        /// Guidance when a rule matched, otherwise the upstream message
        detail: String,
        guidance: Option<&'static str>,
    },

    /// Network-level failure (connect, TLS, body read)
    #[error("{context}: request failed: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not have the expected shape
    #[error("{context}: failed to decode response: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    /// The workflow was saved but a later step failed; retrying the save
    /// would create a duplicate
    #[error("workflow {workflow_id} was saved, but {step} failed: {source}")]
    FollowUp {
        workflow_id: String,
        step: &'static str,
        #[source]
        source: Box<N8nError>,
    },
}

/// Result type alias for n8n operations
pub type N8nResult<T> = Result<T, N8nError>;

impl N8nError {
    pub fn validation(message: impl Into<String>) -> Self {
        N8nError::Validation(message.into())
    }

    /// Upstream status, if this error came from an HTTP response
    pub fn status(&self) -> Option<u16> {
        match self {
            N8nError::Api { status, .. } => Some(*status),
            N8nError::FollowUp { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            N8nError::Api { kind, .. } => Some(*kind),
            N8nError::FollowUp { source, .. } => source.kind(),
            _ => None,
        }
    }

    /// JSON body used in the `isError` tool envelope
    pub fn to_payload(&self) -> Value {
        match self {
            N8nError::Api {
                kind,
                status,
                message,
                guidance,
                ..
            } => json!({
                "error": self.to_string(),
                "kind": kind,
                "status": status,
                "guidance": guidance,
                "upstream_message": message,
            }),
            N8nError::Validation(_) => json!({ "error": self.to_string(), "kind": "validation" }),
            N8nError::Config(_) => json!({ "error": self.to_string(), "kind": "configuration" }),
            N8nError::Timeout { .. } => json!({ "error": self.to_string(), "kind": "timeout" }),
            N8nError::FollowUp {
                workflow_id,
                step,
                source,
            } => json!({
                "error": self.to_string(),
                "kind": "follow_up_failed",
                "workflowId": workflow_id,
                "step": step,
                "cause": source.to_payload(),
            }),
            _ => json!({ "error": self.to_string(), "kind": "transport" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_uses_detail() {
        let err = N8nError::Api {
            kind: ErrorKind::Authentication,
            status: 401,
            context: "Failed to list workflows".into(),
            message: "unauthorized".into(),
            detail: "Check the API key".into(),
            guidance: Some("Check the API key"),
        };
        assert_eq!(err.to_string(), "Failed to list workflows: Check the API key");
        assert_eq!(err.status(), Some(401));

        let payload = err.to_payload();
        assert_eq!(payload["kind"], "authentication");
        assert_eq!(payload["upstream_message"], "unauthorized");
    }

    #[test]
    fn test_validation_payload() {
        let payload = N8nError::validation("nodes must be an array").to_payload();
        assert_eq!(payload["kind"], "validation");
        assert!(payload["error"].as_str().unwrap().contains("nodes must be an array"));
    }
}
