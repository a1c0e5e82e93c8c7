//! Verbatim Messages API relay.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::InterfaceError;
use crate::state::AppState;

/// Relay a Messages API request body to the upstream endpoint.
///
/// POST /v1/messages
///
/// The body is forwarded untouched under the server-held credential.
/// Upstream status and body come back verbatim, success or not; only a
/// missing credential, a transport failure or the wall-clock bound turn
/// into errors of this route.
pub async fn relay_messages(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Response, InterfaceError> {
    let Some(client) = &state.client else {
        warn!("relay request refused: no API key configured");
        return Err(InterfaceError::MissingCredential);
    };

    let relayed = client.relay(&body).await.map_err(|err| {
        warn!("relay failed: {err}");
        InterfaceError::Generator(err.into())
    })?;

    info!(status = relayed.status, "relayed messages request");
    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(relayed.body)).into_response())
}
