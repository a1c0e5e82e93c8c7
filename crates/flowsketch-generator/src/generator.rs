//! Pipeline orchestration: one image in, one validated workflow out.

use serde_json::Value;
use tracing::{debug, info};

use flowsketch_core::validate::KIND_PREFIX;
use flowsketch_core::{layout, repair, validate, NodeCatalog, Placement, ValidationReport, Workflow};
use flowsketch_provider_anthropic::{AnthropicClient, ApiMessage, ApiRequest, ContentBlock};

use crate::error::GeneratorError;
use crate::image::DiagramImage;
use crate::parser::parse_workflow_json;
use crate::prompt::{self, PromptOptions};

/// Outcome of one successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedWorkflow {
    /// The strict, importable document.
    pub workflow: Workflow,

    /// Validation outcome; warnings ride along with a success.
    pub report: ValidationReport,

    /// Advisory preview placements.
    pub placements: Vec<Placement>,

    /// Project name the generation ran under.
    pub project_name: String,
}

impl GeneratedWorkflow {
    pub fn node_count(&self) -> usize {
        self.workflow.nodes.len()
    }
}

/// The diagram-to-workflow generator.
pub struct WorkflowGenerator {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
    catalog: NodeCatalog,
}

impl WorkflowGenerator {
    pub fn new(client: AnthropicClient, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
            catalog: NodeCatalog::new(),
        }
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    /// Assemble the Messages API request for one generation.
    pub fn build_request(&self, image: &DiagramImage, options: &PromptOptions) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ApiMessage::user(vec![
                ContentBlock::text(prompt::render(options)),
                ContentBlock::image(image.media_type().as_mime(), image.to_base64()),
            ])],
            system: None,
            temperature: None,
        }
    }

    /// Run one full generation.
    pub async fn generate(
        &self,
        image: &DiagramImage,
        options: &PromptOptions,
    ) -> Result<GeneratedWorkflow, GeneratorError> {
        info!(
            project = %options.project_name,
            image_bytes = image.len(),
            "generating workflow from diagram"
        );

        let request = self.build_request(image, options);
        let response = self.client.messages(&request).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }

        let mut value = parse_workflow_json(&text)?;
        repair::repair(&mut value);
        let corrected = self.correct_node_kinds(&mut value);
        if corrected > 0 {
            debug!(corrected, "corrected node type tags against the catalog");
        }

        let report = validate::validate(&mut value);
        let workflow = Workflow::from_value(value)?;
        let placements = layout::estimate(&workflow.nodes);

        info!(
            nodes = workflow.nodes.len(),
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "workflow generated"
        );

        Ok(GeneratedWorkflow {
            workflow,
            report,
            placements,
            project_name: options.project_name.clone(),
        })
    }

    /// Rewrite type tags the platform would not recognize.
    ///
    /// Nodes already carrying the platform prefix are trusted even when
    /// the catalog does not list them; everything else is matched by
    /// display name first, then by the tag itself, falling back to the
    /// catalog default. Freshly corrected nodes with an empty parameter
    /// bag inherit the catalog entry's defaults.
    fn correct_node_kinds(&self, value: &mut Value) -> usize {
        let Some(Value::Array(nodes)) = value.get_mut("nodes") else {
            return 0;
        };

        let mut corrected = 0;
        for node in nodes.iter_mut() {
            let Some(node) = node.as_object_mut() else {
                continue;
            };

            let kind = node
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if kind.starts_with(KIND_PREFIX) {
                continue;
            }

            let name = node.get("name").and_then(Value::as_str).unwrap_or_default();
            let spec = self
                .catalog
                .resolve(name)
                .or_else(|| self.catalog.resolve(&kind))
                .unwrap_or_else(|| self.catalog.fallback());

            node.insert("type".to_string(), Value::String(spec.kind.clone()));
            let parameters_empty = node
                .get("parameters")
                .and_then(Value::as_object)
                .is_none_or(|p| p.is_empty());
            if parameters_empty {
                node.insert(
                    "parameters".to_string(),
                    Value::Object(spec.parameters.clone()),
                );
            }
            corrected += 1;
        }
        corrected
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
