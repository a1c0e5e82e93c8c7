//! The diagram-to-workflow generation pipeline.
//!
//! One generation is: validate the image, render the prompt, make one
//! Messages API call, parse the returned text as workflow JSON, repair
//! and type-correct it, validate, and estimate a preview layout. No
//! retries, no state between generations.

pub mod error;
pub mod generator;
pub mod image;
pub mod parser;
pub mod prompt;
pub mod session;

pub use error::GeneratorError;
pub use generator::{GeneratedWorkflow, WorkflowGenerator};
pub use image::{DiagramImage, MediaType, MAX_IMAGE_BYTES};
pub use prompt::{PromptOptions, WorkflowCategory};
pub use session::Session;
