//! Anthropic Messages API integration.
//!
//! Two call shapes, both bounded by one wall-clock timeout: a typed
//! [`client::AnthropicClient::messages`] call used by the generation
//! pipeline, and a verbatim [`client::AnthropicClient::relay`] used by
//! the HTTP proxy route.

pub mod api;
pub mod client;
pub mod error;

pub use api::{ApiContent, ApiMessage, ApiRequest, ApiResponse, ApiUsage, ContentBlock, ImageSource};
pub use client::{AnthropicClient, Relayed};
pub use error::ProviderError;
