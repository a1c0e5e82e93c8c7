//! Interface error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use flowsketch_generator::GeneratorError;
use flowsketch_provider_anthropic::ProviderError;

/// Errors the HTTP layer reports to callers.
#[derive(Debug, Error)]
pub enum InterfaceError {
    /// Server-side misconfiguration, distinct from request errors.
    #[error("Anthropic API key not configured")]
    MissingCredential,

    /// The request itself is unusable.
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// A pipeline failure, mapped onto a status by its class.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

impl InterfaceError {
    /// Status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            InterfaceError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            InterfaceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            InterfaceError::Generator(err) => generator_status(err),
        }
    }
}

fn generator_status(err: &GeneratorError) -> StatusCode {
    match err {
        GeneratorError::ImageTooLarge { .. } | GeneratorError::UnsupportedImageType(_) => {
            StatusCode::BAD_REQUEST
        }
        GeneratorError::Provider(provider) => provider_status(provider),
        GeneratorError::EmptyResponse
        | GeneratorError::MalformedJson(_)
        | GeneratorError::Document(_) => StatusCode::BAD_GATEWAY,
        GeneratorError::Io(_) | GeneratorError::NothingGenerated => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn provider_status(err: &ProviderError) -> StatusCode {
    match err {
        ProviderError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        ProviderError::Api { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ProviderError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
        ProviderError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        ProviderError::Network(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ProviderError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for InterfaceError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_a_server_error() {
        assert_eq!(
            InterfaceError::MissingCredential.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_input_errors_are_bad_requests() {
        let err = InterfaceError::Generator(GeneratorError::ImageTooLarge {
            size: 3_000_000,
            limit: 2_097_152,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err =
            InterfaceError::Generator(GeneratorError::UnsupportedImageType("image/tiff".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_timeout_maps_to_408() {
        let err = InterfaceError::Generator(GeneratorError::Provider(ProviderError::Timeout(540)));
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_upstream_status_passes_through() {
        let err = InterfaceError::Generator(GeneratorError::Provider(ProviderError::Api {
            status: 529,
            message: "Overloaded".into(),
        }));
        assert_eq!(err.status().as_u16(), 529);
    }

    #[test]
    fn test_shape_errors_are_bad_gateway() {
        let err = InterfaceError::Generator(GeneratorError::EmptyResponse);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
