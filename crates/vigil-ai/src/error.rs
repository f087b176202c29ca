//! AI-layer error types.

use thiserror::Error;
use vigil_core::error::VigilError;

#[derive(Debug, Clone, Error)]
pub enum AiError {
    /// Malformed flow input. A caller bug: rejected immediately, never
    /// converted into a fallback payload.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The provider endpoint could not be reached or rejected the call.
    #[error("Provider request failed: {0}")]
    Provider(String),

    /// The provider answered, but the content does not conform to the
    /// declared output schema (missing content, not JSON, wrong shape,
    /// value outside a closed enum set).
    #[error("Provider response violates the output schema: {0}")]
    Schema(String),
}

impl From<AiError> for VigilError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Validation(message) => VigilError::Validation { message },
            other => VigilError::Provider(other.to_string()),
        }
    }
}
