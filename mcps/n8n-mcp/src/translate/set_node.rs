//! Set-node parameter normalisation
//!
//! n8n's Set node wants each value as
//! `{name, value, type, parameterType: "propertyValue"}` wrapped in
//! `{values, options: {dotNotation: true}, mode: "manual"}`. Clients tend to
//! send a bare `values` list. This is the only place that reshapes them; both
//! the translator and the activation pre-processor call it.

use serde_json::{json, Map, Value};

/// Platform type of the Set node
pub const SET_NODE_TYPE: &str = "n8n-nodes-base.set";

/// True for the Set node, by full platform type or the bare `set` shorthand
pub fn is_set_node(node_type: &str) -> bool {
    node_type.eq_ignore_ascii_case(SET_NODE_TYPE) || node_type.eq_ignore_ascii_case("set")
}

/// Rewrite Set-node parameters into the propertyValue shape
///
/// Returns `None` when there is no `values` key. The rewrite is lossy: every
/// key other than `values` is replaced. Applying it to its own output yields
/// the same output.
///
/// `values` may be a flat list of `{name, value, type?}` entries, or the older
/// grouped shape `{"string": [...], "number": [...]}` where the group key is
/// the type.
pub fn normalize_set_parameters(parameters: &Map<String, Value>) -> Option<Map<String, Value>> {
    let values = parameters.get("values")?;

    let entries: Vec<Value> = match values {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| normalize_entry(item, None))
            .collect(),
        Value::Object(groups) => groups
            .iter()
            .filter_map(|(group_type, items)| {
                items.as_array().map(|items| (group_type.as_str(), items))
            })
            .flat_map(|(group_type, items)| {
                items
                    .iter()
                    .filter_map(move |item| normalize_entry(item, Some(group_type)))
            })
            .collect(),
        _ => Vec::new(),
    };

    let mut out = Map::new();
    out.insert("values".to_string(), Value::Array(entries));
    out.insert("options".to_string(), json!({ "dotNotation": true }));
    out.insert("mode".to_string(), Value::String("manual".to_string()));
    Some(out)
}

fn normalize_entry(item: &Value, group_type: Option<&str>) -> Option<Value> {
    let obj = item.as_object()?;

    let name = match obj.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let value = obj.get("value").cloned().unwrap_or(Value::String(String::new()));
    let value_type = obj
        .get("type")
        .and_then(Value::as_str)
        .or(group_type)
        .unwrap_or("string");

    Some(json!({
        "name": name,
        "value": value,
        "type": value_type,
        "parameterType": "propertyValue",
    }))
}
