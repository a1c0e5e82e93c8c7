//! HTTP route definitions.
//!
//! ```text
//! POST /v1/messages            - verbatim Messages API relay
//! POST /v1/workflows/generate  - diagram-to-workflow generation
//! GET  /health                 - detailed health check
//! GET  /livez                  - liveness probe
//! GET  /readyz                 - readiness probe
//! ```
//!
//! Permissive CORS is layered over everything, preflight included; other
//! methods on these paths get 405 from the router.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::http::{generate, monitoring, relay};
use crate::state::AppState;

/// Request body ceiling. A 2 MiB image grows by a third as base64 plus
/// the JSON envelope, so the limit sits well above that.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Build the router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/messages", post(relay::relay_messages))
        .route("/v1/workflows/generate", post(generate::generate_workflow))
        .route("/health", get(monitoring::health_check))
        .route("/livez", get(monitoring::liveness_probe))
        .route("/readyz", get(monitoring::readiness_probe))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
