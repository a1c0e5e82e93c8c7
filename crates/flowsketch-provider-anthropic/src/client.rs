//! HTTP client for the Messages API.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiRequest, ApiResponse};
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// An upstream response replayed verbatim.
#[derive(Debug, Clone)]
pub struct Relayed {
    pub status: u16,
    pub body: Value,
}

impl Relayed {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Messages API client with one wall-clock bound per call.
#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            http: reqwest::Client::new(),
        }
    }

    /// Point the client at a different endpoint (tests, gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Typed Messages call. Non-success upstream statuses become errors.
    pub async fn messages(&self, request: &ApiRequest) -> Result<ApiResponse, ProviderError> {
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or(body);
            warn!(status = status.as_u16(), "messages call failed");
            return Err(ProviderError::from_api_response(status.as_u16(), message));
        }

        response
            .json::<ApiResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    /// Verbatim relay: any JSON body in, upstream status and body out.
    ///
    /// Non-success statuses are part of the result, not errors; only
    /// transport failures and the timeout bound surface as errors.
    pub async fn relay(&self, body: &Value) -> Result<Relayed, ProviderError> {
        let response = self.send(body).await?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        debug!(status, "relayed messages call");
        Ok(Relayed { status, body })
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}{}", self.base_url, MESSAGES_PATH);
        let call = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send();

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(ProviderError::Network(e.to_string())),
            Err(_) => Err(ProviderError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// Pull the message out of an Anthropic error body:
/// `{"error": {"type": "...", "message": "..."}}`.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
