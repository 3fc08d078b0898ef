//! Trigger inference and activation pre-processing
//!
//! n8n refuses to activate a workflow without a trigger-capable node. Before
//! activation the workflow is checked, a schedule trigger is injected when
//! none exists, and Set nodes are normalised.

use serde_json::{json, Map, Number};

use super::set_node::normalize_set_parameters;
use super::types::{ConnectionItem, Node, WorkflowSpec};

/// Platform type of the injected trigger
pub const SCHEDULE_TRIGGER_TYPE: &str = "n8n-nodes-base.scheduleTrigger";

const TRIGGER_MARKERS: &[&str] = &["trigger", "webhook", "cron", "interval", "schedule"];
const TRIGGER_OFFSET_X: f64 = 200.0;
const EMPTY_CANVAS_POSITION: [f64; 2] = [250.0, 300.0];

/// What [`prepare_for_activation`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ActivationFixups {
    /// Id of the injected schedule trigger, if one was added
    pub trigger_added: Option<String>,
    /// Names of Set nodes whose parameters were rewritten
    pub set_nodes_normalized: Vec<String>,
}

impl ActivationFixups {
    /// True when the workflow must be re-submitted before activating
    pub fn changed(&self) -> bool {
        self.trigger_added.is_some() || !self.set_nodes_normalized.is_empty()
    }
}

/// Activation rewrites every node whose type mentions `set`, which also
/// covers variants such as `setAssignments`
pub fn is_set_like(node_type: &str) -> bool {
    node_type.to_ascii_lowercase().contains("set")
}

/// A node counts as a trigger if its type mentions a trigger marker
/// (case-insensitive) or its `group` contains `trigger`
pub fn is_trigger_node(node: &Node) -> bool {
    let node_type = node.node_type.to_ascii_lowercase();
    TRIGGER_MARKERS.iter().any(|m| node_type.contains(m)) || node.groups().any(|g| g == "trigger")
}

/// Make a workflow acceptable for activation
///
/// `now_millis` seeds the injected trigger id. The two fixups are
/// independent; both may apply.
pub fn prepare_for_activation(spec: &mut WorkflowSpec, now_millis: i64) -> ActivationFixups {
    let mut fixups = ActivationFixups::default();

    if !spec.nodes.iter().any(is_trigger_node) {
        fixups.trigger_added = Some(inject_schedule_trigger(spec, now_millis));
    }

    for node in spec.nodes.iter_mut().filter(|n| is_set_like(&n.node_type)) {
        if let Some(normalized) = normalize_set_parameters(&node.parameters) {
            if normalized != node.parameters {
                node.parameters = normalized;
                fixups.set_nodes_normalized.push(node.name.clone());
            }
        }
    }

    fixups
}

fn inject_schedule_trigger(spec: &mut WorkflowSpec, now_millis: i64) -> String {
    let id = format!("schedule_trigger_{}", now_millis);
    let name = unique_name(spec, "Schedule Trigger");

    let position = if spec.nodes.is_empty() {
        EMPTY_CANVAS_POSITION
    } else {
        let min_x = spec.nodes.iter().map(|n| n.position[0]).fold(f64::INFINITY, f64::min);
        let min_y = spec.nodes.iter().map(|n| n.position[1]).fold(f64::INFINITY, f64::min);
        [min_x - TRIGGER_OFFSET_X, min_y]
    };

    let first_existing = spec.nodes.first().map(|n| n.id.clone());

    let parameters = json!({
        "rule": { "interval": [{ "field": "hours", "hoursInterval": 1 }] }
    });

    spec.nodes.insert(
        0,
        Node {
            id: id.clone(),
            name,
            node_type: SCHEDULE_TRIGGER_TYPE.to_string(),
            parameters: parameters.as_object().cloned().unwrap_or_default(),
            position,
            type_version: Number::from_f64(1.2).unwrap_or_else(|| Number::from(1)),
            extra: Map::new(),
        },
    );

    // Written straight into the map: the trigger has no user-facing name to resolve
    if let Some(target) = first_existing {
        spec.connections
            .entry(id.clone())
            .or_default()
            .push_main(0, ConnectionItem::main(target, 0));
    }

    id
}

fn unique_name(spec: &WorkflowSpec, base: &str) -> String {
    let taken = |candidate: &str| spec.nodes.iter().any(|n| n.name == candidate);
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|i| format!("{} {}", base, i))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Trigger node types present in a workflow, for reporting
pub fn trigger_types(spec: &WorkflowSpec) -> Vec<&str> {
    spec.nodes
        .iter()
        .filter(|n| is_trigger_node(n))
        .map(|n| n.node_type.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::translate_value;
    use serde_json::Value;

    fn spec(value: Value) -> WorkflowSpec {
        translate_value(&value).unwrap()
    }

    #[test]
    fn test_trigger_detection_by_type() {
        let s = spec(json!({"nodes": [
            {"name": "a", "type": "n8n-nodes-base.webhook"},
            {"name": "b", "type": "n8n-nodes-base.CRON"},
            {"name": "c", "type": "n8n-nodes-base.manualTrigger"},
            {"name": "d", "type": "n8n-nodes-base.httpRequest"}
        ]}));
        let flags: Vec<bool> = s.nodes.iter().map(is_trigger_node).collect();
        assert_eq!(flags, vec![true, true, true, false]);
    }

    #[test]
    fn test_trigger_detection_by_group() {
        let s = spec(json!({"nodes": [
            {"name": "a", "type": "custom.thing", "group": ["trigger"]}
        ]}));
        assert!(is_trigger_node(&s.nodes[0]));
    }

    #[test]
    fn test_injects_single_schedule_trigger() {
        let mut s = spec(json!({"nodes": [
            {"name": "HTTP", "type": "n8n-nodes-base.httpRequest", "position": [400, 120]},
            {"name": "Code", "type": "n8n-nodes-base.code", "position": [300, 500]}
        ]}));

        let fixups = prepare_for_activation(&mut s, 1_700_000_000_000);

        assert_eq!(fixups.trigger_added.as_deref(), Some("schedule_trigger_1700000000000"));
        assert_eq!(s.nodes.len(), 3);
        let injected: Vec<_> = s
            .nodes
            .iter()
            .filter(|n| n.node_type == SCHEDULE_TRIGGER_TYPE)
            .collect();
        assert_eq!(injected.len(), 1);
        assert_eq!(s.nodes[0].position, [100.0, 120.0]);

        let wired = &s.connections["schedule_trigger_1700000000000"].main[0];
        assert_eq!(wired, &vec![ConnectionItem::main("node_1", 0)]);
    }

    #[test]
    fn test_existing_trigger_left_alone() {
        let mut s = spec(json!({"nodes": [
            {"name": "Hook", "type": "n8n-nodes-base.webhook"},
            {"name": "HTTP", "type": "n8n-nodes-base.httpRequest"}
        ]}));
        let before = s.clone();
        let fixups = prepare_for_activation(&mut s, 1);
        assert!(!fixups.changed());
        assert_eq!(s, before);
    }

    #[test]
    fn test_empty_workflow_gets_unwired_trigger() {
        let mut s = spec(json!({"nodes": []}));
        let fixups = prepare_for_activation(&mut s, 5);
        assert!(fixups.changed());
        assert_eq!(s.nodes.len(), 1);
        assert!(s.connections.is_empty());
    }

    #[test]
    fn test_trigger_name_does_not_collide() {
        let mut s = spec(json!({"nodes": [
            {"name": "Schedule Trigger", "type": "n8n-nodes-base.noOp"}
        ]}));
        prepare_for_activation(&mut s, 7);
        assert_eq!(s.nodes[0].name, "Schedule Trigger 1");
    }

    #[test]
    fn test_set_nodes_normalized_on_activation() {
        let mut s = spec(json!({"nodes": [
            {"name": "Start", "type": "n8n-nodes-base.manualTrigger"}
        ]}));
        // Fetched workflows bypass the translator, so inject a raw Set node
        s.nodes.push(Node {
            id: "set".into(),
            name: "Set".into(),
            node_type: "n8n-nodes-base.set".into(),
            parameters: json!({"values": [{"name": "a", "value": "b"}]})
                .as_object()
                .cloned()
                .unwrap(),
            position: [0.0, 0.0],
            type_version: Number::from(1),
            extra: Map::new(),
        });

        let fixups = prepare_for_activation(&mut s, 1);
        assert_eq!(fixups.trigger_added, None);
        assert_eq!(fixups.set_nodes_normalized, vec!["Set".to_string()]);
        assert_eq!(s.nodes[1].parameters["values"][0]["parameterType"], "propertyValue");

        // Second pass finds nothing to do
        assert!(!prepare_for_activation(&mut s, 2).changed());
    }

    #[test]
    fn test_set_variants_normalized_on_activation() {
        let mut s = spec(json!({"nodes": [
            {"name": "Start", "type": "n8n-nodes-base.manualTrigger"}
        ]}));
        s.nodes.push(Node {
            id: "assign".into(),
            name: "Assign".into(),
            node_type: "n8n-nodes-base.setAssignments".into(),
            parameters: json!({"values": [{"name": "a", "value": "b"}]})
                .as_object()
                .cloned()
                .unwrap(),
            position: [0.0, 0.0],
            type_version: Number::from(1),
            extra: Map::new(),
        });

        let fixups = prepare_for_activation(&mut s, 1);
        assert_eq!(fixups.set_nodes_normalized, vec!["Assign".to_string()]);
        assert_eq!(s.nodes[1].parameters["values"][0]["parameterType"], "propertyValue");
    }

    #[test]
    fn test_is_set_like() {
        assert!(is_set_like("n8n-nodes-base.set"));
        assert!(is_set_like("n8n-nodes-base.setAssignments"));
        assert!(is_set_like("Set"));
        assert!(!is_set_like("n8n-nodes-base.httpRequest"));
    }

    #[test]
    fn test_trigger_types() {
        let s = spec(json!({"nodes": [
            {"name": "a", "type": "n8n-nodes-base.scheduleTrigger"},
            {"name": "b", "type": "n8n-nodes-base.set"}
        ]}));
        assert_eq!(trigger_types(&s), vec!["n8n-nodes-base.scheduleTrigger"]);
    }
}
