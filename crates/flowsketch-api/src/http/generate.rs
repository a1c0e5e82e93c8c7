//! Server-side generation route.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use flowsketch_generator::{DiagramImage, PromptOptions, WorkflowCategory};

use crate::error::InterfaceError;
use crate::state::AppState;

/// Request to generate a workflow from a diagram image.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// The diagram image.
    pub image: ImagePayload,

    /// Optional project name folded into the prompt.
    pub project_name: Option<String>,

    /// Workflow category (general, customer, inventory, training,
    /// reporting). Defaults to general.
    pub category: Option<String>,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Optional video-transcript text.
    pub transcript: Option<String>,
}

/// A base64 image with its declared media type.
#[derive(Debug, Deserialize)]
pub struct ImagePayload {
    pub media_type: String,
    pub data: String,
}

/// Response carrying the generated workflow and its validation outcome.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// The importable workflow document.
    pub workflow: Value,

    pub node_count: usize,

    /// Whether validation found no blocking errors.
    pub valid: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Advisory preview placements.
    pub layout: Vec<PlacementResponse>,

    /// Suggested file name for a download.
    pub file_name: String,
}

/// One node's preview placement.
#[derive(Debug, Serialize)]
pub struct PlacementResponse {
    pub id: String,
    pub lane: &'static str,
    pub position: [f64; 2],
}

/// Generate a workflow from an uploaded diagram.
///
/// POST /v1/workflows/generate
pub async fn generate_workflow(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, InterfaceError> {
    let Some(generator) = &state.generator else {
        return Err(InterfaceError::MissingCredential);
    };

    let data = base64::engine::general_purpose::STANDARD
        .decode(&request.image.data)
        .map_err(|e| InterfaceError::BadRequest(format!("invalid base64 image data: {e}")))?;
    let image = DiagramImage::from_declared(&request.image.media_type, data)?;

    let category = match request.category.as_deref() {
        None => WorkflowCategory::default(),
        Some(name) => WorkflowCategory::from_name(name)
            .ok_or_else(|| InterfaceError::BadRequest(format!("unknown category: {name}")))?,
    };

    let project_name = request
        .project_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.config.generator.default_project_name.clone());

    let options = PromptOptions {
        project_name,
        category,
        description: request.description,
        transcript: request.transcript,
    };

    let generated = generator.generate(&image, &options).await?;

    info!(
        nodes = generated.node_count(),
        valid = generated.report.is_valid(),
        "generation request served"
    );

    Ok(Json(GenerateResponse {
        node_count: generated.node_count(),
        valid: generated.report.is_valid(),
        errors: generated.report.errors.iter().map(ToString::to_string).collect(),
        warnings: generated.report.warnings.iter().map(ToString::to_string).collect(),
        layout: generated
            .placements
            .iter()
            .map(|p| PlacementResponse {
                id: p.id.clone(),
                lane: p.lane.label(),
                position: p.position,
            })
            .collect(),
        file_name: flowsketch_generator::session::export_file_name(&generated.project_name),
        workflow: generated.workflow.to_value(),
    }))
}
