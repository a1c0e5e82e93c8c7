//! Lane-based layout estimation for preview rendering.
//!
//! Positions coming back from the model routinely overlap. This groups
//! nodes into lanes by their type tag and re-spaces them with fixed
//! constants so a preview can draw them without collisions. Advisory
//! only; the stored node positions are not rewritten.

use crate::document::Node;

const START_X: f64 = 50.0;
const START_Y: f64 = 50.0;
const HORIZONTAL_SPACING: f64 = 200.0;
const VERTICAL_SPACING: f64 = 120.0;
const STAGE_SPACING: f64 = 180.0;

/// Horizontal lanes, left to right in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Webhooks and other triggers.
    Trigger,
    /// Agent-style processing nodes.
    Agent,
    /// Chat/LLM model nodes.
    Model,
    /// Outbound HTTP request nodes.
    Request,
    /// Everything else.
    Other,
}

impl Lane {
    /// Classify a type tag by substring, the way the preview always has.
    pub fn for_kind(kind: &str) -> Lane {
        if kind.contains("webhook") || kind.contains("trigger") {
            Lane::Trigger
        } else if kind.contains("agent") {
            Lane::Agent
        } else if kind.contains("openAi") {
            Lane::Model
        } else if kind.contains("httpRequest") {
            Lane::Request
        } else {
            Lane::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Lane::Trigger => "triggers",
            Lane::Agent => "agents",
            Lane::Model => "models",
            Lane::Request => "requests",
            Lane::Other => "other",
        }
    }
}

/// An estimated on-screen placement for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub id: String,
    pub lane: Lane,
    pub position: [f64; 2],
}

/// Estimate non-overlapping placements for a node sequence.
///
/// Triggers take the leftmost column, agents the next with wider stage
/// spacing, models and requests share the third column and one running
/// row counter, everything else lands in a final column.
pub fn estimate(nodes: &[Node]) -> Vec<Placement> {
    let mut placements = Vec::with_capacity(nodes.len());

    let lane_nodes = |lane: Lane| {
        nodes
            .iter()
            .filter(move |node| Lane::for_kind(&node.kind) == lane)
    };

    let mut x = START_X;
    for (row, node) in lane_nodes(Lane::Trigger).enumerate() {
        placements.push(Placement {
            id: node.id.clone(),
            lane: Lane::Trigger,
            position: [x, START_Y + row as f64 * VERTICAL_SPACING],
        });
    }

    x += HORIZONTAL_SPACING;
    for (row, node) in lane_nodes(Lane::Agent).enumerate() {
        placements.push(Placement {
            id: node.id.clone(),
            lane: Lane::Agent,
            position: [x, START_Y + row as f64 * STAGE_SPACING],
        });
    }

    x += HORIZONTAL_SPACING;
    let mut support_y = START_Y;
    for lane in [Lane::Model, Lane::Request] {
        for node in lane_nodes(lane) {
            placements.push(Placement {
                id: node.id.clone(),
                lane,
                position: [x, support_y],
            });
            support_y += VERTICAL_SPACING;
        }
    }

    x += HORIZONTAL_SPACING;
    for (row, node) in lane_nodes(Lane::Other).enumerate() {
        placements.push(Placement {
            id: node.id.clone(),
            lane: Lane::Other,
            position: [x, START_Y + row as f64 * VERTICAL_SPACING],
        });
    }

    placements
}
