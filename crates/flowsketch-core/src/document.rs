//! Workflow document types.
//!
//! The strict stage of the document pipeline: a [`Workflow`] is only
//! constructed from values that already satisfy the structural shape the
//! repair pass establishes. Anything repair could not coerce is rejected
//! here instead of being carried along.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Channel tag used when an edge does not declare one.
pub const MAIN_CHANNEL: &str = "main";

/// Errors turning a raw JSON value into a [`Workflow`].
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The value does not decode into the workflow shape.
    #[error("failed to decode workflow document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An importable n8n workflow document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Optional workflow name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ordered node sequence.
    pub nodes: Vec<Node>,

    /// Outgoing edges keyed by source node id.
    #[serde(default)]
    pub connections: BTreeMap<String, NodeConnections>,
}

impl Workflow {
    /// Decode a (repaired) JSON value into a strict workflow.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize back into the JSON shape n8n imports.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("workflow serialization is infallible")
    }

    /// Pretty-printed JSON, as handed to the user for import.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("workflow serialization is infallible")
    }
}

/// One step in a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Identifier, unique within the workflow.
    pub id: String,

    /// Display name.
    pub name: String,

    /// n8n node type tag, e.g. `n8n-nodes-base.webhook`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Canvas position, advisory only.
    pub position: [f64; 2],

    /// Type-dependent parameter bag.
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Outgoing edges of one node, grouped per output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConnections {
    /// Ordered connection groups on the main channel.
    #[serde(default)]
    pub main: Vec<Vec<Connection>>,
}

/// A directed edge into a target node's input slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Target node id.
    pub node: String,

    /// Channel tag, conventionally `main`.
    #[serde(rename = "type", default = "default_channel")]
    pub kind: String,

    /// Input slot index on the target.
    #[serde(default)]
    pub index: u32,
}

fn default_channel() -> String {
    MAIN_CHANNEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_minimal_workflow() {
        let value = json!({
            "nodes": [
                {
                    "id": "trigger",
                    "name": "Webhook",
                    "type": "n8n-nodes-base.webhook",
                    "position": [100.0, 100.0],
                    "parameters": {"path": "hook"}
                }
            ],
            "connections": {}
        });

        let workflow = Workflow::from_value(value).unwrap();
        assert_eq!(workflow.nodes.len(), 1);
        assert_eq!(workflow.nodes[0].kind, "n8n-nodes-base.webhook");
        assert!(workflow.connections.is_empty());
    }

    #[test]
    fn test_decode_connection_defaults() {
        let value = json!({
            "nodes": [
                {"id": "a", "name": "A", "type": "t", "position": [0.0, 0.0]},
                {"id": "b", "name": "B", "type": "t", "position": [0.0, 0.0]}
            ],
            "connections": {
                "a": {"main": [[{"node": "b"}]]}
            }
        });

        let workflow = Workflow::from_value(value).unwrap();
        let edge = &workflow.connections["a"].main[0][0];
        assert_eq!(edge.node, "b");
        assert_eq!(edge.kind, MAIN_CHANNEL);
        assert_eq!(edge.index, 0);
    }

    #[test]
    fn test_decode_rejects_non_sequence_nodes() {
        let value = json!({"nodes": "not-a-sequence"});
        assert!(Workflow::from_value(value).is_err());
    }

    #[test]
    fn test_roundtrip_preserves_type_tag_field_name() {
        let value = json!({
            "name": "demo",
            "nodes": [
                {"id": "a", "name": "A", "type": "n8n-nodes-base.set", "position": [1.0, 2.0]}
            ]
        });

        let workflow = Workflow::from_value(value).unwrap();
        let out = workflow.to_value();
        assert_eq!(out["nodes"][0]["type"], "n8n-nodes-base.set");
        assert!(out["nodes"][0].get("kind").is_none());
    }

    #[test]
    fn test_missing_name_is_serialized_away() {
        let workflow = Workflow {
            name: None,
            nodes: vec![],
            connections: BTreeMap::new(),
        };
        let out = workflow.to_value();
        assert!(out.get("name").is_none());
    }
}
