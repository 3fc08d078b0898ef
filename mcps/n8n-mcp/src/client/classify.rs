//! Table-driven classification of upstream error responses
//!
//! n8n does not return structured error codes for the common failure modes,
//! so each rule pairs a status matcher with an optional message substring.
//! The first matching rule wins; new rules go in [`DEFAULT_RULES`].

use crate::error::{ErrorKind, N8nError};

/// Status predicate for a rule
#[derive(Debug, Clone, Copy)]
pub enum StatusMatch {
    Any,
    Exact(u16),
    AnyOf(&'static [u16]),
    AtLeast(u16),
}

impl StatusMatch {
    fn matches(self, status: u16) -> bool {
        match self {
            StatusMatch::Any => true,
            StatusMatch::Exact(code) => status == code,
            StatusMatch::AnyOf(codes) => codes.contains(&status),
            StatusMatch::AtLeast(min) => status >= min,
        }
    }
}

/// `(status, message pattern) -> guidance`
#[derive(Debug, Clone, Copy)]
pub struct ErrorRule {
    pub status: StatusMatch,
    /// Case-insensitive substring of the upstream message
    pub pattern: Option<&'static str>,
    pub kind: ErrorKind,
    pub guidance: &'static str,
}

impl ErrorRule {
    fn matches(&self, status: u16, message_lower: &str) -> bool {
        self.status.matches(status)
            && self
                .pattern
                .map_or(true, |p| message_lower.contains(&p.to_ascii_lowercase()))
    }
}

pub const DEFAULT_RULES: &[ErrorRule] = &[
    ErrorRule {
        status: StatusMatch::Exact(400),
        pattern: Some("property values"),
        kind: ErrorKind::SetNodeParameters,
        guidance: "n8n rejected the node parameters. Set nodes expect each value as \
                   {name, value, type, parameterType: \"propertyValue\"}; simplify the Set node \
                   values or let the server normalise them",
    },
    ErrorRule {
        status: StatusMatch::Any,
        pattern: Some("already exists"),
        kind: ErrorKind::NameConflict,
        guidance: "An item with this name already exists. Choose a different name",
    },
    ErrorRule {
        status: StatusMatch::AnyOf(&[401, 403]),
        pattern: None,
        kind: ErrorKind::Authentication,
        guidance: "Authentication failed. Check the API key configured for this environment \
                   and that the n8n public API is enabled",
    },
    ErrorRule {
        status: StatusMatch::Exact(413),
        pattern: None,
        kind: ErrorKind::PayloadTooLarge,
        guidance: "The request payload is too large. Reduce the number of nodes or the size \
                   of pinned/static data",
    },
    ErrorRule {
        status: StatusMatch::Exact(429),
        pattern: None,
        kind: ErrorKind::RateLimited,
        guidance: "Rate limit exceeded. Wait before issuing further requests",
    },
    ErrorRule {
        status: StatusMatch::AtLeast(500),
        pattern: None,
        kind: ErrorKind::ServerError,
        guidance: "The n8n server returned an internal error. Check the n8n logs and retry later",
    },
];

/// Classify an upstream failure using [`DEFAULT_RULES`]
pub fn classify(context: &str, status: u16, message: &str) -> N8nError {
    classify_with(DEFAULT_RULES, context, status, message)
}

/// Classify an upstream failure against an explicit rule table
pub fn classify_with(rules: &[ErrorRule], context: &str, status: u16, message: &str) -> N8nError {
    let lower = message.to_ascii_lowercase();

    match rules.iter().find(|rule| rule.matches(status, &lower)) {
        Some(rule) => N8nError::Api {
            kind: rule.kind,
            status,
            context: context.to_string(),
            message: message.to_string(),
            detail: rule.guidance.to_string(),
            guidance: Some(rule.guidance),
        },
        None => N8nError::Api {
            kind: if status == 404 {
                ErrorKind::NotFound
            } else {
                ErrorKind::Upstream
            },
            status,
            context: context.to_string(),
            message: message.to_string(),
            detail: message.to_string(),
            guidance: None,
        },
    }
}

/// Pull a human-readable message out of an error response body
///
/// n8n usually answers `{"message": "..."}`; anything else is used verbatim.
pub fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
