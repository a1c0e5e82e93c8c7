//! Core workflow document handling for flowsketch.
//!
//! Everything here is pure: the raw stage works on `serde_json::Value`
//! documents as they come back from the model, the strict stage decodes
//! them into [`Workflow`] once repair has run.

pub mod catalog;
pub mod document;
pub mod layout;
pub mod repair;
pub mod validate;

pub use catalog::{NodeCatalog, NodeCategory, NodeSpec};
pub use document::{Connection, DocumentError, Node, NodeConnections, Workflow};
pub use layout::{Lane, Placement};
pub use validate::{ValidationError, ValidationReport, ValidationWarning};
