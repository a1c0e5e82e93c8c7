//! Workflow validation.
//!
//! Classifies a structurally-plausible workflow value into import-blocking
//! errors and non-blocking warnings. Warned fields are defaulted in place
//! with the same values the repair pass would use, so a validated document
//! is always as importable as its errors allow.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::document::MAIN_CHANNEL;
use crate::repair::default_position;

/// n8n type tags live under this prefix.
pub const KIND_PREFIX: &str = "n8n-nodes-base.";

/// Import-blocking problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("workflow is not an object")]
    NotAnObject,

    #[error("missing nodes array")]
    MissingNodes,

    #[error("nodes is not an array")]
    NodesNotArray,

    #[error("connections is not an object")]
    ConnectionsNotObject,

    #[error("node {index} is not a valid object")]
    NodeNotObject { index: usize },

    #[error("node {index} is missing an id")]
    MissingNodeId { index: usize },

    #[error("duplicate node id: {id}")]
    DuplicateNodeId { id: String },
}

/// Non-blocking problems; the affected fields are defaulted in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("missing connections object")]
    MissingConnections,

    #[error("node {id} is missing a type")]
    MissingKind { id: String },

    #[error("node {id} should use the n8n-nodes-base prefix")]
    UnprefixedKind { id: String },

    #[error("node {id} has a missing or invalid position")]
    InvalidPosition { id: String },

    #[error("node {id} is missing a name")]
    MissingName { id: String },

    #[error("connection source {id} not found among nodes")]
    UnknownSource { id: String },

    #[error("invalid connection structure for {id}")]
    InvalidConnectionSet { id: String },

    #[error("invalid connection group {group} for {id}")]
    InvalidGroup { id: String, group: usize },

    #[error("invalid connection {entry} in group {group} for {id}")]
    InvalidEntry { id: String, group: usize, entry: usize },

    #[error("connection from {id} is missing a target node")]
    MissingTarget { id: String },

    #[error("connection target {target} not found")]
    DanglingTarget { target: String },
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Valid means importable: warnings do not block.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a workflow value, defaulting warned fields in place.
pub fn validate(value: &mut Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(workflow) = value.as_object_mut() else {
        report.errors.push(ValidationError::NotAnObject);
        return report;
    };

    match workflow.get("nodes") {
        None => {
            report.errors.push(ValidationError::MissingNodes);
            return report;
        }
        Some(nodes) if !nodes.is_array() => {
            report.errors.push(ValidationError::NodesNotArray);
            return report;
        }
        Some(_) => {}
    }

    match workflow.get("connections") {
        None => {
            report.warnings.push(ValidationWarning::MissingConnections);
            workflow.insert("connections".to_string(), Value::Object(Map::new()));
        }
        Some(connections) if !connections.is_object() => {
            report.errors.push(ValidationError::ConnectionsNotObject);
            return report;
        }
        Some(_) => {}
    }

    let node_ids = validate_nodes(workflow, &mut report);
    validate_connections(workflow, &node_ids, &mut report);

    report
}

fn validate_nodes(
    workflow: &mut Map<String, Value>,
    report: &mut ValidationReport,
) -> HashSet<String> {
    let mut node_ids = HashSet::new();

    let Some(Value::Array(nodes)) = workflow.get_mut("nodes") else {
        return node_ids;
    };

    for (index, node) in nodes.iter_mut().enumerate() {
        let Some(node) = node.as_object_mut() else {
            report.errors.push(ValidationError::NodeNotObject { index });
            continue;
        };

        let Some(id) = node.get("id").and_then(Value::as_str).map(str::to_string) else {
            report.errors.push(ValidationError::MissingNodeId { index });
            continue;
        };

        if !node_ids.insert(id.clone()) {
            report
                .errors
                .push(ValidationError::DuplicateNodeId { id: id.clone() });
        }

        match node.get("type").and_then(Value::as_str) {
            None => report
                .warnings
                .push(ValidationWarning::MissingKind { id: id.clone() }),
            Some(kind) if !kind.starts_with(KIND_PREFIX) => report
                .warnings
                .push(ValidationWarning::UnprefixedKind { id: id.clone() }),
            Some(_) => {}
        }

        let position_ok = matches!(
            node.get("position"),
            Some(Value::Array(p)) if p.len() == 2 && p.iter().all(Value::is_number)
        );
        if !position_ok {
            report
                .warnings
                .push(ValidationWarning::InvalidPosition { id: id.clone() });
            if node.get("position").is_none() {
                let [x, y] = default_position(index);
                node.insert("position".to_string(), serde_json::json!([x, y]));
            }
        }

        if !node.get("name").and_then(Value::as_str).is_some_and(|n| !n.is_empty()) {
            report
                .warnings
                .push(ValidationWarning::MissingName { id: id.clone() });
            node.insert("name".to_string(), Value::String(id));
        }
    }

    node_ids
}

fn validate_connections(
    workflow: &mut Map<String, Value>,
    node_ids: &HashSet<String>,
    report: &mut ValidationReport,
) {
    let Some(Value::Object(connections)) = workflow.get_mut("connections") else {
        return;
    };

    for (source, connection_set) in connections.iter_mut() {
        if !node_ids.contains(source) {
            report
                .warnings
                .push(ValidationWarning::UnknownSource { id: source.clone() });
            continue;
        }

        let Some(set) = connection_set.as_object_mut() else {
            report
                .warnings
                .push(ValidationWarning::InvalidConnectionSet { id: source.clone() });
            continue;
        };

        let Some(Value::Array(groups)) = set.get_mut(MAIN_CHANNEL) else {
            continue;
        };

        for (group_index, group) in groups.iter_mut().enumerate() {
            let Value::Array(edges) = group else {
                report.warnings.push(ValidationWarning::InvalidGroup {
                    id: source.clone(),
                    group: group_index,
                });
                continue;
            };

            for (entry_index, edge) in edges.iter_mut().enumerate() {
                let Some(edge) = edge.as_object_mut() else {
                    report.warnings.push(ValidationWarning::InvalidEntry {
                        id: source.clone(),
                        group: group_index,
                        entry: entry_index,
                    });
                    continue;
                };

                match edge.get("node").and_then(Value::as_str) {
                    None => report
                        .warnings
                        .push(ValidationWarning::MissingTarget { id: source.clone() }),
                    Some(target) if !node_ids.contains(target) => {
                        report.warnings.push(ValidationWarning::DanglingTarget {
                            target: target.to_string(),
                        });
                    }
                    Some(_) => {}
                }

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

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
