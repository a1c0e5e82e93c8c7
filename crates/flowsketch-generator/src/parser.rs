//! Model output parsing.

use serde_json::Value;

use crate::error::GeneratorError;

/// Strip markdown code fences from model output, when present.
///
/// Handles ```json ... ``` and plain ``` ... ```; unfenced text passes
/// through untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };

    let Some(body) = rest.strip_suffix("```") else {
        // Opening fence without a closing one; keep what follows it.
        return rest.trim();
    };

    body.trim()
}

/// Parse model text into a raw workflow value.
pub fn parse_workflow_json(text: &str) -> Result<Value, GeneratorError> {
    let stripped = strip_code_fences(text);
    if stripped.is_empty() {
        return Err(GeneratorError::EmptyResponse);
    }
    serde_json::from_str(stripped).map_err(GeneratorError::MalformedJson)
}
