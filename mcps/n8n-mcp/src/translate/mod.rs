//! Workflow translation between client and platform formats
//!
//! - `types` - [`WorkflowInput`] (client) and [`WorkflowSpec`] (platform)
//! - `set_node` - the single Set-node normaliser
//! - `trigger` - trigger inference and activation pre-processing
//!
//! [`translate`] is pure: no I/O, and identical input produces identical
//! output. Ids are synthesized from array position (`node_1`, `node_2`, ...)
//! so reordering `nodes` changes the generated ids.

pub mod set_node;
pub mod trigger;
pub mod types;

pub use set_node::{is_set_node, normalize_set_parameters, SET_NODE_TYPE};
pub use trigger::{is_trigger_node, prepare_for_activation, ActivationFixups, SCHEDULE_TRIGGER_TYPE};
pub use types::{
    ConnectionItem, ConnectionMap, LegacyConnection, Node, NodeConnections, NodeInput,
    WorkflowInput, WorkflowSpec,
};

use serde_json::{Map, Number, Value};
use std::collections::HashSet;

use crate::error::N8nError;

/// Name used when the client does not supply one
pub const DEFAULT_WORKFLOW_NAME: &str = "New Workflow";

/// Highest output or input port index a connection may name
pub const MAX_PORT: usize = 64;

const LAYOUT_ORIGIN: [f64; 2] = [250.0, 300.0];
const LAYOUT_STEP: f64 = 200.0;

/// Settings every translated workflow starts from
pub fn default_settings() -> Map<String, Value> {
    let mut settings = Map::new();
    settings.insert("executionOrder".to_string(), Value::String("v1".to_string()));
    settings
}

/// Validate an arbitrary JSON value and translate it
pub fn translate_value(value: &Value) -> Result<WorkflowSpec, N8nError> {
    translate(&WorkflowInput::from_value(value)?)
}

/// Convert a client workflow description into the platform format
///
/// Fails with [`N8nError::Validation`] on blank node type/name, duplicate
/// node ids, or a connection whose source or target cannot be resolved.
pub fn translate(input: &WorkflowInput) -> Result<WorkflowSpec, N8nError> {
    let nodes = input
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| translate_node(index, node))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    if let Some(dup) = nodes.iter().find(|n| !seen.insert(n.id.as_str())) {
        return Err(N8nError::validation(format!("duplicate node id '{}'", dup.id)));
    }

    let mut connections = ConnectionMap::new();
    for conn in &input.connections {
        let source = resolve_node(&nodes, &conn.source);
        let target = resolve_node(&nodes, &conn.target);
        let (source, target) = match (source, target) {
            (Some(s), Some(t)) => (s, t),
            _ => {
                return Err(N8nError::validation(format!(
                    "connection references unknown node(s): source '{}' -> target '{}'",
                    conn.source, conn.target
                )))
            }
        };

        let output = conn.source_output.unwrap_or(0);
        let input = conn.target_input.unwrap_or(0);
        if output > MAX_PORT || input > MAX_PORT {
            return Err(N8nError::validation(format!(
                "connection '{}' -> '{}' uses port {} -> {}; ports must be at most {}",
                conn.source, conn.target, output, input, MAX_PORT
            )));
        }

        connections
            .entry(source.id.clone())
            .or_default()
            .push_main(output, ConnectionItem::main(target.id.clone(), input));
    }

    let mut settings = default_settings();
    if let Some(overrides) = &input.settings {
        settings.extend(overrides.clone());
    }

    Ok(WorkflowSpec {
        name: input
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WORKFLOW_NAME.to_string()),
        nodes,
        connections,
        settings,
        static_data: None,
    })
}

fn translate_node(index: usize, input: &NodeInput) -> Result<Node, N8nError> {
    if input.node_type.trim().is_empty() || input.name.trim().is_empty() {
        return Err(N8nError::validation(format!(
            "node at index {} must have a non-empty 'type' and 'name'",
            index
        )));
    }

    let id = input
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("node_{}", index + 1));

    let parameters = if is_set_node(&input.node_type) {
        normalize_set_parameters(&input.parameters).unwrap_or_else(|| input.parameters.clone())
    } else {
        input.parameters.clone()
    };

    let position = input.position.unwrap_or([
        LAYOUT_ORIGIN[0] + LAYOUT_STEP * index as f64,
        LAYOUT_ORIGIN[1],
    ]);

    Ok(Node {
        id,
        name: input.name.clone(),
        node_type: input.node_type.clone(),
        parameters,
        position,
        type_version: input.type_version.clone().unwrap_or_else(|| Number::from(1)),
        extra: input.extra.clone(),
    })
}

/// Exact id match first, then exact name match
fn resolve_node<'a>(nodes: &'a [Node], reference: &str) -> Option<&'a Node> {
    nodes
        .iter()
        .find(|n| n.id == reference)
        .or_else(|| nodes.iter().find(|n| n.name == reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(name: &str, node_type: &str) -> NodeInput {
        NodeInput {
            name: name.to_string(),
            node_type: node_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ids_synthesized_in_array_order() {
        let input = WorkflowInput {
            nodes: vec![node("A", "t"), node("B", "t"), node("C", "t")],
            ..Default::default()
        };
        let spec = translate(&input).unwrap();
        let ids: Vec<_> = spec.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["node_1", "node_2", "node_3"]);
    }

    #[test]
    fn test_explicit_ids_kept() {
        let mut a = node("A", "t");
        a.id = Some("custom".into());
        let input = WorkflowInput {
            nodes: vec![a, node("B", "t")],
            ..Default::default()
        };
        let spec = translate(&input).unwrap();
        assert_eq!(spec.nodes[0].id, "custom");
        assert_eq!(spec.nodes[1].id, "node_2");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut a = node("A", "t");
        a.id = Some("node_2".into());
        let input = WorkflowInput {
            nodes: vec![a, node("B", "t")],
            ..Default::default()
        };
        let err = translate(&input).unwrap_err();
        assert!(err.to_string().contains("duplicate node id 'node_2'"));
    }

    #[test]
    fn test_out_of_range_ports_rejected() {
        let value = json!({
            "nodes": [{"name": "A", "type": "t"}, {"name": "B", "type": "t"}],
            "connections": [{"source": "A", "target": "B", "sourceOutput": 1u64 << 40}]
        });
        let err = translate_value(&value).unwrap_err();
        assert!(matches!(err, N8nError::Validation(_)));

        let mut conn = LegacyConnection::new("A", "B");
        conn.target_input = Some(MAX_PORT + 1);
        let input = WorkflowInput {
            nodes: vec![node("A", "t"), node("B", "t")],
            connections: vec![conn],
            ..Default::default()
        };
        assert!(translate(&input).is_err());

        let mut conn = LegacyConnection::new("A", "B");
        conn.source_output = Some(MAX_PORT);
        let input = WorkflowInput {
            nodes: vec![node("A", "t"), node("B", "t")],
            connections: vec![conn],
            ..Default::default()
        };
        let spec = translate(&input).unwrap();
        assert_eq!(spec.connections["node_1"].main.len(), MAX_PORT + 1);
    }

    #[test]
    fn test_unknown_endpoint_names_both() {
        let input = WorkflowInput {
            nodes: vec![node("A", "t")],
            connections: vec![LegacyConnection::new("A", "Missing")],
            ..Default::default()
        };
        let err = translate(&input).unwrap_err();
        assert!(matches!(err, N8nError::Validation(_)));
        let msg = err.to_string();
        assert!(msg.contains("'A'") && msg.contains("'Missing'"), "{}", msg);
    }

    #[test]
    fn test_output_port_gap_filled() {
        let input = WorkflowInput {
            nodes: vec![node("A", "t"), node("B", "t")],
            connections: vec![LegacyConnection {
                source_output: Some(1),
                ..LegacyConnection::new("A", "B")
            }],
            ..Default::default()
        };
        let spec = translate(&input).unwrap();
        let main = &spec.connections["node_1"].main;
        assert!(main.len() >= 2);
        assert!(main[0].is_empty());
        assert_eq!(main[1], vec![ConnectionItem::main("node_2", 0)]);
    }

    #[test]
    fn test_connection_resolves_id_before_name() {
        // Node "B" is named like the other node's id
        let mut a = node("B", "t");
        a.id = Some("x".into());
        let mut b = node("Other", "t");
        b.id = Some("B".into());
        let input = WorkflowInput {
            nodes: vec![a, b],
            connections: vec![LegacyConnection {
                target_input: Some(1),
                ..LegacyConnection::new("x", "B")
            }],
            ..Default::default()
        };
        let spec = translate(&input).unwrap();
        assert_eq!(spec.connections["x"].main[0], vec![ConnectionItem::main("B", 1)]);
    }

    #[test]
    fn test_set_node_parameters_rewritten() {
        let mut set = node("Set", "n8n-nodes-base.set");
        set.parameters = json!({"values": [{"name": "x", "value": "y"}]})
            .as_object()
            .cloned()
            .unwrap();
        let mut http = node("HTTP", "n8n-nodes-base.httpRequest");
        http.parameters = json!({"values": [1]}).as_object().cloned().unwrap();

        let spec = translate(&WorkflowInput {
            nodes: vec![set, http],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            Value::Object(spec.nodes[0].parameters.clone()),
            json!({
                "values": [{"name": "x", "value": "y", "type": "string", "parameterType": "propertyValue"}],
                "options": {"dotNotation": true},
                "mode": "manual"
            })
        );
        assert_eq!(Value::Object(spec.nodes[1].parameters.clone()), json!({"values": [1]}));
    }

    #[test]
    fn test_settings_merge_caller_wins() {
        let input = WorkflowInput {
            nodes: vec![node("A", "t")],
            settings: json!({"executionOrder": "v0", "timezone": "UTC"})
                .as_object()
                .cloned(),
            ..Default::default()
        };
        let spec = translate(&input).unwrap();
        assert_eq!(spec.settings["executionOrder"], "v0");
        assert_eq!(spec.settings["timezone"], "UTC");

        let spec = translate(&WorkflowInput {
            nodes: vec![node("A", "t")],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(Value::Object(spec.settings), json!({"executionOrder": "v1"}));
        assert_eq!(spec.name, DEFAULT_WORKFLOW_NAME);
    }

    #[test]
    fn test_default_layout_and_type_version() {
        let mut b = node("B", "t");
        b.position = Some([10.0, 20.0]);
        b.type_version = Some(Number::from_f64(2.1).unwrap());
        let spec = translate(&WorkflowInput {
            nodes: vec![node("A", "t"), b],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(spec.nodes[0].position, [250.0, 300.0]);
        assert_eq!(spec.nodes[0].type_version, Number::from(1));
        assert_eq!(spec.nodes[1].position, [10.0, 20.0]);
        assert_eq!(spec.nodes[1].type_version.as_f64(), Some(2.1));
    }

    #[test]
    fn test_start_to_set_scenario() {
        let spec = translate_value(&json!({
            "nodes": [
                {"name": "Start", "type": "manualTrigger"},
                {"name": "Set", "type": "set", "parameters": {"values": [{"name": "data", "value": "hi"}]}}
            ],
            "connections": [{"source": "Start", "target": "Set"}]
        }))
        .unwrap();

        assert_eq!(spec.nodes.len(), 2);
        assert_eq!(spec.connections["node_1"].main[0][0].node, "node_2");
        assert_eq!(spec.nodes[1].parameters["mode"], "manual");
    }

    #[test]
    fn test_deterministic() {
        let value = json!({
            "name": "wf",
            "nodes": [{"name": "A", "type": "t"}, {"name": "B", "type": "t"}],
            "connections": [{"source": "A", "target": "B"}]
        });
        assert_eq!(translate_value(&value).unwrap(), translate_value(&value).unwrap());
    }

    #[test]
    fn test_serialized_shape() {
        let spec = translate_value(&json!({
            "name": "wf",
            "nodes": [{"name": "A", "type": "t"}, {"name": "B", "type": "t"}],
            "connections": [{"source": "A", "target": "B"}]
        }))
        .unwrap();
        let body = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            body["connections"],
            json!({"node_1": {"main": [[{"node": "node_2", "type": "main", "index": 0}]]}})
        );
        assert_eq!(body["nodes"][0]["typeVersion"], 1);
        assert!(body.get("staticData").is_none());
    }
}
