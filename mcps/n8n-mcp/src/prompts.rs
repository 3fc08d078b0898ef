//! Canned workflow templates with `{{variable}}` placeholders
//!
//! Each template body is a client-format workflow (the shape accepted by
//! `create_workflow`) with placeholders inside JSON string literals. Filling
//! escapes every value as a JSON string fragment, so the result always
//! parses. Only `{{identifier}}` sequences naming a declared variable are
//! replaced; n8n expressions such as `={{ $json.id }}` pass through.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptVariable {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub variables: &'static [PromptVariable],
    #[serde(skip)]
    body: &'static str,
}

impl PromptTemplate {
    pub fn variable(&self, name: &str) -> Option<&PromptVariable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    #[error("unknown prompt template '{0}'")]
    NotFound(String),

    #[error("prompt '{template}' requires variable '{variable}'")]
    MissingVariable { template: String, variable: String },

    #[error("prompt '{template}' produced invalid JSON: {reason}")]
    InvalidTemplate { template: String, reason: String },
}

/// A template with every placeholder resolved
#[derive(Debug, Clone, Serialize)]
pub struct FilledPrompt {
    pub name: String,
    pub description: String,
    /// Client-format workflow ready for `create_workflow`
    pub workflow: Value,
}

impl FilledPrompt {
    /// User message handed to the model via `prompts/get`
    pub fn message(&self) -> String {
        let body = serde_json::to_string_pretty(&self.workflow).unwrap_or_default();
        format!(
            "{}\n\nCreate this workflow by calling `create_workflow` with the following input:\n\n```json\n{}\n```",
            self.description, body
        )
    }
}

const WORKFLOW_NAME: PromptVariable = PromptVariable {
    name: "workflow_name",
    description: "Name of the workflow to create",
    required: true,
    default: None,
};

static TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        name: "schedule_workflow",
        title: "Scheduled workflow",
        description: "Workflow that calls an HTTP endpoint on a cron schedule",
        variables: &[
            WORKFLOW_NAME,
            PromptVariable {
                name: "cron_expression",
                description: "Cron expression for the schedule trigger",
                required: false,
                default: Some("0 * * * *"),
            },
            PromptVariable {
                name: "url",
                description: "URL requested on every run",
                required: true,
                default: None,
            },
        ],
        body: r#"{
  "name": "{{workflow_name}}",
  "nodes": [
    {
      "name": "Schedule Trigger",
      "type": "n8n-nodes-base.scheduleTrigger",
      "typeVersion": 1.2,
      "parameters": {
        "rule": { "interval": [{ "field": "cronExpression", "expression": "{{cron_expression}}" }] }
      }
    },
    {
      "name": "HTTP Request",
      "type": "n8n-nodes-base.httpRequest",
      "typeVersion": 4.2,
      "parameters": { "method": "GET", "url": "{{url}}" }
    }
  ],
  "connections": [{ "source": "Schedule Trigger", "target": "HTTP Request" }]
}"#,
    },
    PromptTemplate {
        name: "webhook_workflow",
        title: "Webhook workflow",
        description: "Workflow started by an incoming webhook that answers with a fixed message",
        variables: &[
            WORKFLOW_NAME,
            PromptVariable {
                name: "webhook_path",
                description: "Path segment the webhook listens on",
                required: true,
                default: None,
            },
            PromptVariable {
                name: "http_method",
                description: "HTTP method accepted by the webhook",
                required: false,
                default: Some("POST"),
            },
            PromptVariable {
                name: "response_message",
                description: "Message returned to the caller",
                required: false,
                default: Some("ok"),
            },
        ],
        body: r#"{
  "name": "{{workflow_name}}",
  "nodes": [
    {
      "name": "Webhook",
      "type": "n8n-nodes-base.webhook",
      "typeVersion": 2,
      "parameters": {
        "path": "{{webhook_path}}",
        "httpMethod": "{{http_method}}",
        "responseMode": "lastNode"
      }
    },
    {
      "name": "Respond",
      "type": "n8n-nodes-base.set",
      "parameters": { "values": [{ "name": "message", "value": "{{response_message}}" }] }
    }
  ],
  "connections": [{ "source": "Webhook", "target": "Respond" }]
}"#,
    },
    PromptTemplate {
        name: "data_transformation",
        title: "Data transformation workflow",
        description: "Workflow that copies one field of each incoming item into a new field",
        variables: &[
            WORKFLOW_NAME,
            PromptVariable {
                name: "source_field",
                description: "Field read from each item",
                required: true,
                default: None,
            },
            PromptVariable {
                name: "target_field",
                description: "Field written on each item",
                required: true,
                default: None,
            },
        ],
        body: r#"{
  "name": "{{workflow_name}}",
  "nodes": [
    {
      "name": "Manual Trigger",
      "type": "n8n-nodes-base.manualTrigger",
      "parameters": {}
    },
    {
      "name": "Transform",
      "type": "n8n-nodes-base.set",
      "parameters": {
        "values": [{ "name": "{{target_field}}", "value": "={{ $json.{{source_field}} }}" }]
      }
    }
  ],
  "connections": [{ "source": "Manual Trigger", "target": "Transform" }]
}"#,
    },
    PromptTemplate {
        name: "api_integration",
        title: "External API integration",
        description: "Workflow that calls an external API and keeps one field of the response",
        variables: &[
            WORKFLOW_NAME,
            PromptVariable {
                name: "api_url",
                description: "Endpoint of the external API",
                required: true,
                default: None,
            },
            PromptVariable {
                name: "http_method",
                description: "HTTP method used for the call",
                required: false,
                default: Some("GET"),
            },
            PromptVariable {
                name: "result_field",
                description: "Field of the response kept as `result`",
                required: false,
                default: Some("data"),
            },
        ],
        body: r#"{
  "name": "{{workflow_name}}",
  "nodes": [
    {
      "name": "Manual Trigger",
      "type": "n8n-nodes-base.manualTrigger",
      "parameters": {}
    },
    {
      "name": "Call API",
      "type": "n8n-nodes-base.httpRequest",
      "typeVersion": 4.2,
      "parameters": { "method": "{{http_method}}", "url": "{{api_url}}" }
    },
    {
      "name": "Extract Result",
      "type": "n8n-nodes-base.set",
      "parameters": {
        "values": [{ "name": "result", "value": "={{ $json.{{result_field}} }}" }]
      }
    }
  ],
  "connections": [
    { "source": "Manual Trigger", "target": "Call API" },
    { "source": "Call API", "target": "Extract Result" }
  ]
}"#,
    },
];

/// All templates, in catalogue order
pub fn list() -> &'static [PromptTemplate] {
    TEMPLATES
}

pub fn get(name: &str) -> Option<&'static PromptTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}

/// Fill a template from caller arguments
///
/// Non-string argument values are rendered as their JSON text.
pub fn fill(name: &str, args: &Map<String, Value>) -> Result<FilledPrompt, PromptError> {
    let template = get(name).ok_or_else(|| PromptError::NotFound(name.to_string()))?;

    let mut values = HashMap::new();
    for var in template.variables {
        let provided = args.get(var.name).and_then(|v| match v {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        let value = match (provided, var.default) {
            (Some(v), _) => v,
            (None, Some(default)) => default.to_string(),
            (None, None) if var.required => {
                return Err(PromptError::MissingVariable {
                    template: template.name.to_string(),
                    variable: var.name.to_string(),
                })
            }
            (None, None) => String::new(),
        };
        values.insert(var.name, escape_json_fragment(&value));
    }

    let text = substitute(template.body, &values);
    let workflow = serde_json::from_str(&text).map_err(|e| PromptError::InvalidTemplate {
        template: template.name.to_string(),
        reason: e.to_string(),
    })?;

    Ok(FilledPrompt {
        name: template.name.to_string(),
        description: template.description.to_string(),
        workflow,
    })
}

/// Escape `value` for use inside a JSON string literal (no surrounding quotes)
fn escape_json_fragment(value: &str) -> String {
    let quoted = Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Single left-to-right pass; substituted text is never rescanned
fn substitute(body: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let ident_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let ident = &after[..ident_len];

        match values.get(ident) {
            Some(value) if ident_len > 0 && after[ident_len..].starts_with("}}") => {
                out.push_str(value);
                rest = &after[ident_len + 2..];
            }
            _ => {
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}
