//! The per-interaction result slot.
//!
//! Holds at most one generated workflow between a generation and its
//! export, replaced by the next generation and cleared by reset. An
//! owned value the caller threads through, not ambient state.

use std::path::Path;

use crate::error::GeneratorError;
use crate::generator::GeneratedWorkflow;

/// Suffix of exported workflow files.
const EXPORT_SUFFIX: &str = "_workflow.json";

/// One user interaction's worth of state.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<GeneratedWorkflow>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a generation result, replacing any previous one.
    pub fn complete(&mut self, generated: GeneratedWorkflow) {
        self.current = Some(generated);
    }

    pub fn current(&self) -> Option<&GeneratedWorkflow> {
        self.current.as_ref()
    }

    /// Clear the slot back to its initial state.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// The current workflow as pretty JSON.
    pub fn export_json(&self) -> Result<String, GeneratorError> {
        let generated = self.current.as_ref().ok_or(GeneratorError::NothingGenerated)?;
        Ok(generated.workflow.to_json_pretty())
    }

    /// File name the export writes to, derived from the project name.
    pub fn export_file_name(&self) -> Result<String, GeneratorError> {
        let generated = self.current.as_ref().ok_or(GeneratorError::NothingGenerated)?;
        Ok(export_file_name(&generated.project_name))
    }

    /// Write the current workflow to a file.
    pub fn write_to(&self, path: &Path) -> Result<(), GeneratorError> {
        let json = self.export_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Sanitize a project name into an export file name: alphanumerics kept
/// and lowercased, everything else collapsed to underscores.
pub fn export_file_name(project_name: &str) -> String {
    let stem: String = project_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}{EXPORT_SUFFIX}")
}
