//! Response records returned by the n8n public API

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::translate::{ConnectionMap, Node, WorkflowSpec};

/// Cursor-paginated list response (`{data, nextCursor}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(
        default,
        rename = "nextCursor",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A workflow as stored by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: ConnectionMap,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default, rename = "staticData", skip_serializing_if = "Option::is_none")]
    pub static_data: Option<Value>,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Read-only platform fields (`versionId`, `meta`, `pinData`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    /// Writable part of the workflow, as accepted by `PUT /workflows/{id}`
    pub fn into_spec(self) -> WorkflowSpec {
        WorkflowSpec {
            name: self.name,
            nodes: self.nodes,
            connections: self.connections,
            settings: self.settings,
            static_data: self.static_data,
        }
    }

    pub fn summary(&self) -> WorkflowSummary {
        WorkflowSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            active: self.active,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            node_count: self.nodes.len(),
            tags: self.tags.clone(),
        }
    }
}

/// Listing view of a workflow without nodes or connections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub node_count: usize,
    pub tags: Vec<Tag>,
}

/// A single workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, rename = "startedAt", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, rename = "stoppedAt", skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<String>,
    #[serde(
        default,
        rename = "workflowId",
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_id: Option<String>,
    /// Run data and anything else the platform returns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const UNSETTLED_STATUSES: &[&str] = &["running", "new", "waiting"];

impl Execution {
    /// True once the run has stopped changing
    pub fn is_settled(&self) -> bool {
        self.finished
            || self
                .status
                .as_deref()
                .map_or(false, |s| !UNSETTLED_STATUSES.contains(&s))
    }
}

/// Execution counts by status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionStats {
    pub total: usize,
    pub by_status: std::collections::BTreeMap<String, usize>,
}

impl ExecutionStats {
    pub fn from_executions(executions: &[Execution]) -> Self {
        let mut stats = Self {
            total: executions.len(),
            ..Default::default()
        };
        for exec in executions {
            let status = exec.status.clone().unwrap_or_else(|| {
                if exec.finished { "success" } else { "unknown" }.to_string()
            });
            *stats.by_status.entry(status).or_insert(0) += 1;
        }
        stats
    }
}

/// The platform returns ids as strings on some endpoints and numbers on others
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workflow_summary_drops_graph() {
        let wf: Workflow = serde_json::from_value(json!({
            "id": "1",
            "name": "wf",
            "active": true,
            "nodes": [
                {"id": "a", "name": "A", "type": "t", "position": [0, 0]},
                {"id": "b", "name": "B", "type": "t", "position": [0, 0]}
            ],
            "connections": {},
            "createdAt": "2024-01-01T00:00:00.000Z",
            "versionId": "v1",
            "tags": [{"id": "t1", "name": "ops"}]
        }))
        .unwrap();

        let summary = serde_json::to_value(wf.summary()).unwrap();
        assert_eq!(summary["nodeCount"], 2);
        assert_eq!(summary["createdAt"], "2024-01-01T00:00:00.000Z");
        assert!(summary.get("nodes").is_none());
        assert!(summary.get("connections").is_none());
        assert_eq!(summary["tags"][0]["name"], "ops");
    }

    #[test]
    fn test_into_spec_strips_read_only_fields() {
        let wf: Workflow = serde_json::from_value(json!({
            "id": "1",
            "name": "wf",
            "active": true,
            "nodes": [],
            "connections": {},
            "settings": {"executionOrder": "v1"},
            "versionId": "abc",
            "updatedAt": "2024-01-01",
            "tags": []
        }))
        .unwrap();
        let body = serde_json::to_value(wf.into_spec()).unwrap();
        let mut keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["connections", "name", "nodes", "settings"]);
    }

    #[test]
    fn test_execution_numeric_ids() {
        let exec: Execution = serde_json::from_value(json!({
            "id": 42, "finished": false, "status": "running", "workflowId": 7
        }))
        .unwrap();
        assert_eq!(exec.id, "42");
        assert_eq!(exec.workflow_id.as_deref(), Some("7"));
        assert!(!exec.is_settled());
    }

    #[test]
    fn test_execution_settled() {
        let parse = |v: Value| serde_json::from_value::<Execution>(v).unwrap();
        assert!(parse(json!({"id": "1", "finished": true})).is_settled());
        assert!(parse(json!({"id": "1", "status": "error"})).is_settled());
        assert!(!parse(json!({"id": "1", "status": "waiting"})).is_settled());
        assert!(!parse(json!({"id": "1"})).is_settled());
    }

    #[test]
    fn test_execution_stats() {
        let execs: Vec<Execution> = serde_json::from_value(json!([
            {"id": "1", "status": "success", "finished": true},
            {"id": "2", "status": "error"},
            {"id": "3", "status": "success", "finished": true},
            {"id": "4", "finished": true}
        ]))
        .unwrap();
        let stats = ExecutionStats::from_executions(&execs);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_status["success"], 3);
        assert_eq!(stats.by_status["error"], 1);
    }
}
