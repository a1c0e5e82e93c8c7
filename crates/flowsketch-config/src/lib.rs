//! Configuration for the flowsketch server and CLI.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{AnthropicConfig, Config, GeneratorConfig, ServerConfig};
