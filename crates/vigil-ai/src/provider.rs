//! The provider seam.
//!
//! Flows are generic over [`ModelProvider`] so that tests can inject
//! failing or canned providers; production code resolves a
//! [`SelectedProvider`] per request via [`crate::select`].

use serde_json::Value;

use crate::error::AiError;
use crate::providers::cloud::CloudProvider;
use crate::providers::ollama::OllamaProvider;
use crate::providers::openrouter::OpenRouterProvider;

/// One JSON-producing generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fixed system instruction describing the assistant's role and the
    /// required output shape.
    pub system: String,
    /// The assembled user prompt.
    pub prompt: String,
    /// JSON schema of the required output. Structured-output providers
    /// enforce it server-side; JSON-mode providers receive it as prose in
    /// the system instruction only.
    pub schema: Value,
}

/// A language-model backend that produces one JSON value per request.
pub trait ModelProvider: Send + Sync {
    fn generate_json(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<Value, AiError>> + Send;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// The provider resolved for a single request. Selection is re-evaluated
/// on every flow invocation; nothing is cached.
pub enum SelectedProvider {
    Cloud(CloudProvider),
    Ollama(OllamaProvider),
    Openrouter(OpenRouterProvider),
}

impl ModelProvider for SelectedProvider {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<Value, AiError> {
        match self {
            Self::Cloud(p) => p.generate_json(request).await,
            Self::Ollama(p) => p.generate_json(request).await,
            Self::Openrouter(p) => p.generate_json(request).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::Cloud(p) => p.model(),
            Self::Ollama(p) => p.model(),
            Self::Openrouter(p) => p.model(),
        }
    }
}
