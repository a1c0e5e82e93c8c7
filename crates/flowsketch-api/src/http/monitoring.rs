//! Health and probe handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy.
    Healthy,
    /// Service is up but cannot serve generations.
    Degraded,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub components: Vec<ComponentHealth>,
}

/// Component health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Detailed health check.
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let anthropic = if state.client.is_some() {
        ComponentHealth {
            name: "anthropic".to_string(),
            status: HealthStatus::Healthy,
            message: None,
        }
    } else {
        ComponentHealth {
            name: "anthropic".to_string(),
            status: HealthStatus::Degraded,
            message: Some("no API key configured".to_string()),
        }
    };

    let status = anthropic.status;
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        components: vec![anthropic],
    })
}

/// Liveness probe.
///
/// GET /livez
pub async fn liveness_probe() -> impl IntoResponse {
    "ok"
}

/// Readiness probe.
///
/// GET /readyz
pub async fn readiness_probe() -> impl IntoResponse {
    "ok"
}
