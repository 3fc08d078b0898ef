//! Workflow-related parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListWorkflowsParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Only active (true) or inactive (false) workflows")]
    pub active: Option<bool>,
    #[schemars(description = "Comma-separated tag names to filter by")]
    pub tags: Option<String>,
    #[schemars(description = "Filter by workflow name")]
    pub name: Option<String>,
    #[schemars(description = "Maximum number of workflows to return (platform default: 100)")]
    pub limit: Option<u32>,
    #[schemars(description = "Pagination cursor from a previous nextCursor")]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowIdParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Workflow ID")]
    pub id: String,
}

/// Client-format workflow body shared by create, update and validate
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowBody {
    #[schemars(description = "Workflow name (default: \"New Workflow\")")]
    pub name: Option<String>,
    #[schemars(
        description = "Array of nodes: {type, name, id?, parameters?, position?: [x, y], typeVersion?}. Missing ids become node_1, node_2, ... by position"
    )]
    pub nodes: Vec<Value>,
    #[schemars(
        description = "Array of {source, target, sourceOutput?, targetInput?}; source/target are node ids or names"
    )]
    pub connections: Option<Value>,
    #[schemars(description = "Tag IDs to attach after saving")]
    pub tags: Option<Vec<Value>>,
    #[schemars(description = "Workflow settings, merged over {executionOrder: \"v1\"}")]
    pub settings: Option<Map<String, Value>>,
    #[schemars(description = "Activate (true) or deactivate (false) after saving")]
    pub active: Option<bool>,
}

impl WorkflowBody {
    /// JSON document in the shape the translator validates
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        if let Some(name) = &self.name {
            obj.insert("name".into(), Value::String(name.clone()));
        }
        obj.insert("nodes".into(), Value::Array(self.nodes.clone()));
        if let Some(connections) = &self.connections {
            obj.insert("connections".into(), connections.clone());
        }
        if let Some(tags) = &self.tags {
            obj.insert("tags".into(), Value::Array(tags.clone()));
        }
        if let Some(settings) = &self.settings {
            obj.insert("settings".into(), Value::Object(settings.clone()));
        }
        if let Some(active) = self.active {
            obj.insert("active".into(), Value::Bool(active));
        }
        Value::Object(obj)
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateWorkflowParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[serde(flatten)]
    pub workflow: WorkflowBody,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateWorkflowParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Workflow ID")]
    pub id: String,
    #[serde(flatten)]
    pub workflow: WorkflowBody,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ValidateWorkflowParams {
    #[serde(flatten)]
    pub workflow: WorkflowBody,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteWorkflowParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Workflow ID")]
    pub id: String,
    #[schemars(description = "Input data passed to the run")]
    pub data: Option<Value>,
    #[schemars(description = "Wait (bounded) until the execution finishes and return it")]
    pub wait: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateWorkflowTagsParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Workflow ID")]
    pub id: String,
    #[schemars(description = "Complete list of tag IDs; replaces the current tags")]
    pub tag_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nodes_required_in_schema() {
        let schema = serde_json::to_value(schemars::schema_for!(CreateWorkflowParams)).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("nodes")));
        assert_eq!(schema["properties"]["nodes"]["type"], "array");
    }

    #[test]
    fn test_missing_nodes_fails_to_deserialize() {
        let missing = serde_json::from_value::<CreateWorkflowParams>(json!({"name": "wf"}));
        assert!(missing.is_err());

        let params: CreateWorkflowParams =
            serde_json::from_value(json!({"name": "wf", "nodes": []})).unwrap();
        assert!(params.workflow.nodes.is_empty());
        assert_eq!(params.workflow.to_value()["nodes"], json!([]));
    }
}
