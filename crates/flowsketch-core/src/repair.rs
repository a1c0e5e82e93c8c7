//! Structural repair of raw workflow documents.
//!
//! The model regularly returns workflow JSON that is right in spirit and
//! wrong in shape: `nodes` as a mapping instead of a sequence, nodes
//! without ids or positions, connection groups that are bare objects
//! instead of arrays. This pass coerces those shapes and fills missing
//! fields with deterministic defaults. It only adds and coerces; it never
//! drops a node or an existing field, and it never fails.

use serde_json::{Map, Value};

use crate::document::MAIN_CHANNEL;

/// Horizontal step between default node positions.
const DEFAULT_COLUMN_STEP: f64 = 200.0;
/// Vertical step between default node rows.
const DEFAULT_ROW_STEP: f64 = 150.0;
/// Nodes per default row.
const DEFAULT_ROW_WIDTH: usize = 3;

/// Repair a raw workflow value in place.
///
/// Idempotent: repairing an already-repaired value changes nothing.
pub fn repair(value: &mut Value) {
    let Some(workflow) = value.as_object_mut() else {
        return;
    };

    repair_nodes_shape(workflow);
    repair_node_fields(workflow);
    repair_connections(workflow);
}

/// Default position for the node at `index` in the sequence.
pub fn default_position(index: usize) -> [f64; 2] {
    [
        100.0 + DEFAULT_COLUMN_STEP * index as f64,
        100.0 + DEFAULT_ROW_STEP * (index / DEFAULT_ROW_WIDTH) as f64,
    ]
}

/// Convert a `nodes` mapping into a sequence, carrying each entry's key
/// into a missing `id`.
fn repair_nodes_shape(workflow: &mut Map<String, Value>) {
    let Some(nodes) = workflow.get_mut("nodes") else {
        return;
    };

    if let Value::Object(map) = nodes {
        let mut sequence = Vec::with_capacity(map.len());
        for (key, entry) in std::mem::take(map) {
            let mut node = match entry {
                Value::Object(node) => node,
                // A non-object entry still names a node; keep the key.
                _ => Map::new(),
            };
            node.entry("id").or_insert_with(|| Value::String(key));
            sequence.push(Value::Object(node));
        }
        *nodes = Value::Array(sequence);
    }
}

/// Fill missing id, name, position and parameter bag on every node.
fn repair_node_fields(workflow: &mut Map<String, Value>) {
    let Some(Value::Array(nodes)) = workflow.get_mut("nodes") else {
        return;
    };

    for (index, node) in nodes.iter_mut().enumerate() {
        let Some(node) = node.as_object_mut() else {
            continue;
        };

        match node.get("id") {
            Some(Value::String(_)) => {}
            Some(Value::Number(id)) => {
                let id = id.to_string();
                node.insert("id".to_string(), Value::String(id));
            }
            _ => {
                node.insert("id".to_string(), Value::String(format!("node-{}", index + 1)));
            }
        }

        if !is_non_empty_string(node.get("name")) {
            let name = node
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Node {}", index + 1));
            node.insert("name".to_string(), Value::String(name));
        }

        if !is_position(node.get("position")) {
            let [x, y] = default_position(index);
            node.insert("position".to_string(), serde_json::json!([x, y]));
        }

        if !node.get("parameters").is_some_and(|p| p.is_object()) {
            node.insert("parameters".to_string(), Value::Object(Map::new()));
        }
    }
}

/// Ensure every connection-set's `main` is an array of arrays of edges
/// with channel tag and slot index present.
fn repair_connections(workflow: &mut Map<String, Value>) {
    let Some(Value::Object(connections)) = workflow.get_mut("connections") else {
        return;
    };

    for connection_set in connections.values_mut() {
        let Some(set) = connection_set.as_object_mut() else {
            continue;
        };

        let main = set
            .entry(MAIN_CHANNEL)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !main.is_array() {
            // A bare edge object in place of the group nesting.
            *main = match main.take() {
                Value::Object(edge) => {
                    Value::Array(vec![Value::Array(vec![Value::Object(edge)])])
                }
                _ => Value::Array(Vec::new()),
            };
        }

        let Value::Array(groups) = main else {
            continue;
        };
        for group in groups.iter_mut() {
            if !group.is_array() {
                *group = match group.take() {
                    Value::Object(edge) => Value::Array(vec![Value::Object(edge)]),
                    _ => Value::Array(Vec::new()),
                };
            }
            let Value::Array(edges) = group else {
                continue;
            };
            for edge in edges.iter_mut() {
                let Some(edge) = edge.as_object_mut() else {
                    continue;
                };
                if !edge.get("type").is_some_and(|t| t.is_string()) {
                    edge.insert("type".to_string(), Value::String(MAIN_CHANNEL.to_string()));
                }
                if !edge.get("index").is_some_and(|i| i.is_number()) {
                    edge.insert("index".to_string(), Value::Number(0.into()));
                }
            }
        }
    }
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

fn is_position(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(items)) if items.len() == 2 && items.iter().all(Value::is_number))
}

#[cfg(test)]
#[path = "repair_tests.rs"]
mod tests;
