//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use flowsketch_config::Config;
use flowsketch_generator::WorkflowGenerator;
use flowsketch_provider_anthropic::AnthropicClient;

/// State shared by all routes.
///
/// Client and generator are absent when no API key is configured; the
/// routes report that as a server misconfiguration per request instead
/// of refusing to start.
pub struct AppState {
    pub config: Config,
    pub client: Option<AnthropicClient>,
    pub generator: Option<Arc<WorkflowGenerator>>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let client = config.anthropic.api_key.as_ref().map(|api_key| {
            AnthropicClient::new(
                api_key.clone(),
                Duration::from_secs(config.anthropic.timeout_seconds),
            )
            .with_base_url(config.anthropic.base_url.clone())
        });

        let generator = client.clone().map(|client| {
            Arc::new(WorkflowGenerator::new(
                client,
                config.anthropic.model.clone(),
                config.anthropic.max_tokens,
            ))
        });

        Self {
            config,
            client,
            generator,
        }
    }
}
