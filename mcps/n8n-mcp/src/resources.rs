//! MCP resources backed by the default environment
//!
//! | URI | Content |
//! |---|---|
//! | `n8n://workflows` | workflow summaries |
//! | `n8n://execution-stats` | status counts over recent executions |
//! | `n8n://workflows/{id}` | one workflow |
//! | `n8n://executions/{id}` | one execution with run data |

use rmcp::model::{
    AnnotateAble, ListResourceTemplatesResult, ListResourcesResult, RawResource,
    RawResourceTemplate, ReadResourceResult, Resource, ResourceContents,
};
use serde_json::Value;

use crate::client::{N8nApi, WorkflowQuery};
use crate::error::{N8nError, N8nResult};

pub const WORKFLOWS_URI: &str = "n8n://workflows";
pub const EXECUTION_STATS_URI: &str = "n8n://execution-stats";
const WORKFLOW_PREFIX: &str = "n8n://workflows/";
const EXECUTION_PREFIX: &str = "n8n://executions/";

/// A parsed resource URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Workflows,
    ExecutionStats,
    Workflow(String),
    Execution(String),
}

impl ResourceRef {
    /// `None` for URIs this server does not serve
    pub fn parse(uri: &str) -> Option<Self> {
        match uri {
            WORKFLOWS_URI => Some(Self::Workflows),
            EXECUTION_STATS_URI => Some(Self::ExecutionStats),
            _ => {
                if let Some(id) = uri.strip_prefix(WORKFLOW_PREFIX) {
                    non_empty_segment(id).map(Self::Workflow)
                } else if let Some(id) = uri.strip_prefix(EXECUTION_PREFIX) {
                    non_empty_segment(id).map(Self::Execution)
                } else {
                    None
                }
            }
        }
    }
}

fn non_empty_segment(id: &str) -> Option<String> {
    let id = id.trim();
    (!id.is_empty() && !id.contains('/')).then(|| id.to_string())
}

pub fn list_resources() -> ListResourcesResult {
    ListResourcesResult::with_all_items(vec![
        resource(
            WORKFLOWS_URI,
            "workflows",
            "Summaries of all workflows in the default environment",
        ),
        resource(
            EXECUTION_STATS_URI,
            "execution-stats",
            "Execution counts by status over the most recent runs",
        ),
    ])
}

pub fn list_resource_templates() -> ListResourceTemplatesResult {
    ListResourceTemplatesResult::with_all_items(vec![
        template("n8n://workflows/{id}", "workflow", "A single workflow with nodes and connections"),
        template("n8n://executions/{id}", "execution", "A single execution including run data"),
    ])
}

/// Fetch the JSON behind a resource
pub async fn read(api: &N8nApi, resource: &ResourceRef) -> N8nResult<Value> {
    let value = match resource {
        ResourceRef::Workflows => {
            let page = api.list_workflows(None, &WorkflowQuery::default()).await?;
            to_value(&page.data)?
        }
        ResourceRef::ExecutionStats => to_value(&api.execution_stats(None).await?)?,
        ResourceRef::Workflow(id) => to_value(&api.get_workflow(None, id).await?)?,
        ResourceRef::Execution(id) => to_value(&api.get_execution(None, id, true).await?)?,
    };
    Ok(value)
}

/// Wrap resource JSON as a text content block
pub fn text_contents(uri: &str, value: &Value) -> ReadResourceResult {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    ReadResourceResult {
        contents: vec![ResourceContents::text(text, uri)],
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> N8nResult<Value> {
    serde_json::to_value(value).map_err(|source| N8nError::Decode {
        context: "Failed to serialise resource".to_string(),
        source,
    })
}

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some("application/json".to_string());
    raw.no_annotation()
}

fn template(uri_template: &str, name: &str, description: &str) -> rmcp::model::ResourceTemplate {
    RawResourceTemplate {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        mime_type: Some("application/json".to_string()),
        icons: None,
    }
    .no_annotation()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_uris() {
        assert_eq!(ResourceRef::parse("n8n://workflows"), Some(ResourceRef::Workflows));
        assert_eq!(
            ResourceRef::parse("n8n://execution-stats"),
            Some(ResourceRef::ExecutionStats)
        );
    }

    #[test]
    fn test_parse_templated_uris() {
        assert_eq!(
            ResourceRef::parse("n8n://workflows/abc"),
            Some(ResourceRef::Workflow("abc".into()))
        );
        assert_eq!(
            ResourceRef::parse("n8n://executions/42"),
            Some(ResourceRef::Execution("42".into()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(ResourceRef::parse("n8n://workflows/"), None);
        assert_eq!(ResourceRef::parse("n8n://workflows/a/b"), None);
        assert_eq!(ResourceRef::parse("n8n://tags"), None);
        assert_eq!(ResourceRef::parse("file:///etc/passwd"), None);
    }

    #[test]
    fn test_listings() {
        assert_eq!(list_resources().resources.len(), 2);
        assert_eq!(list_resource_templates().resource_templates.len(), 2);
    }
}
