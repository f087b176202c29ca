//! Router provider — OpenAI-compatible chat completion via OpenRouter.
//!
//! JSON mode (`response_format: json_object`) plus custom headers
//! identifying the calling application. A parse failure or missing
//! content is a hard failure for the request; the flow converts it into
//! its fallback payload.

use serde_json::{Value, json};

use crate::error::AiError;
use crate::provider::{GenerationRequest, ModelProvider};

pub struct OpenRouterProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterProvider {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }
}

impl ModelProvider for OpenRouterProvider {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<Value, AiError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt},
            ],
            "response_format": {"type": "json_object"},
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://vigil-grc.example")
            .header("X-Title", "VIGIL GRC Console")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Provider(format!("openrouter request: {e}")))?
            .error_for_status()
            .map_err(|e| AiError::Provider(format!("openrouter request: {e}")))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| AiError::Provider(format!("openrouter response: {e}")))?;

        parse_completion(&body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

pub(crate) fn parse_completion(body: &Value) -> Result<Value, AiError> {
    let content = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| AiError::Schema("completion is missing message content".into()))?;
    serde_json::from_str(content)
        .map_err(|e| AiError::Schema(format!("completion content is not valid JSON: {e}")))
}
