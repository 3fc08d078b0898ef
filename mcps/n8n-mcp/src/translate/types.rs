//! Workflow representations on both sides of the translator
//!
//! - [`WorkflowInput`] is what MCP clients send: a flat node list plus named
//!   `source -> target` connections.
//! - [`WorkflowSpec`] is what n8n accepts: nodes with required ids and a
//!   [`ConnectionMap`] indexed by output port.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::error::N8nError;

/// Client-facing workflow description
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub nodes: Vec<NodeInput>,

    #[serde(default)]
    pub connections: Vec<LegacyConnection>,

    /// Tag ids (strings) or tag objects with an `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,

    /// Activate right after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// A node as supplied by the client
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NodeInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default)]
    pub parameters: Map<String, Value>,

    /// Canvas position `[x, y]`; laid out left to right when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,

    #[serde(
        default,
        rename = "typeVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_version: Option<Number>,

    /// Passed through untouched (`credentials`, `disabled`, `webhookId`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `source -> target` edge referencing nodes by id or name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LegacyConnection {
    pub source: String,
    pub target: String,

    #[serde(
        default,
        rename = "sourceOutput",
        alias = "source_output",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_output: Option<usize>,

    #[serde(
        default,
        rename = "targetInput",
        alias = "target_input",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_input: Option<usize>,
}

impl LegacyConnection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_output: None,
            target_input: None,
        }
    }
}

impl WorkflowInput {
    /// Structurally validate an arbitrary JSON value and deserialize it
    ///
    /// Checks run before deserialization so that the error names the
    /// offending part of the input instead of a serde path.
    pub fn from_value(value: &Value) -> Result<Self, N8nError> {
        let obj = value
            .as_object()
            .ok_or_else(|| N8nError::validation("workflow input must be a JSON object"))?;

        let nodes = obj
            .get("nodes")
            .and_then(Value::as_array)
            .ok_or_else(|| N8nError::validation("workflow input must contain a 'nodes' array"))?;

        for (index, node) in nodes.iter().enumerate() {
            let has_string = |key: &str| node.get(key).map_or(false, Value::is_string);
            if !has_string("type") || !has_string("name") {
                return Err(N8nError::validation(format!(
                    "node at index {} must have a string 'type' and 'name'",
                    index
                )));
            }
        }

        serde_json::from_value(value.clone())
            .map_err(|e| N8nError::validation(format!("invalid workflow input: {}", e)))
    }
}

/// One target in a connection list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionItem {
    pub node: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub index: usize,
}

impl ConnectionItem {
    pub fn main(node: impl Into<String>, index: usize) -> Self {
        Self {
            node: node.into(),
            kind: "main".to_string(),
            index,
        }
    }
}

/// Outgoing connections of one node, indexed by output port
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConnections {
    #[serde(default)]
    pub main: Vec<Vec<ConnectionItem>>,

    /// Non-`main` connection types (e.g. `ai_tool`), kept as-is
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl NodeConnections {
    /// Append a target on `output`, creating empty lists for lower ports
    pub fn push_main(&mut self, output: usize, item: ConnectionItem) {
        while self.main.len() <= output {
            self.main.push(Vec::new());
        }
        self.main[output].push(item);
    }
}

/// Source node id -> outgoing connections
pub type ConnectionMap = BTreeMap<String, NodeConnections>;

/// A node in platform format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub position: [f64; 2],
    #[serde(rename = "typeVersion", default = "default_type_version")]
    pub type_version: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_type_version() -> Number {
    Number::from(1)
}

impl Node {
    /// `group` array as reported by n8n node descriptions, if present
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.extra
            .get("group")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }
}

/// Workflow body accepted by `POST /workflows` and `PUT /workflows/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSpec {
    pub name: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: ConnectionMap,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(
        default,
        rename = "staticData",
        skip_serializing_if = "Option::is_none"
    )]
    pub static_data: Option<Value>,
}
