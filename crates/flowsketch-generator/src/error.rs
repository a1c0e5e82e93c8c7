//! Generation pipeline errors.

use thiserror::Error;

use flowsketch_core::DocumentError;
use flowsketch_provider_anthropic::ProviderError;

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Image over the size ceiling; rejected before any network call.
    #[error("image is {size} bytes, over the {limit} byte limit")]
    ImageTooLarge { size: usize, limit: usize },

    /// Not one of the accepted image types.
    #[error("unsupported image type: {0}")]
    UnsupportedImageType(String),

    /// Reading a local image file failed.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The outbound model call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The model response carried no text content.
    #[error("model returned no text content")]
    EmptyResponse,

    /// The model text is not JSON, even after stripping code fences.
    #[error("model output is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// The repaired document still does not decode into a workflow.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Export requested before any generation succeeded.
    #[error("no workflow generated yet")]
    NothingGenerated,
}

impl GeneratorError {
    /// Input errors are the caller's fault and never reach the network.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GeneratorError::ImageTooLarge { .. } | GeneratorError::UnsupportedImageType(_)
        )
    }
}
