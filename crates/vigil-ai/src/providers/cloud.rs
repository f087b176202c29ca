//! Cloud provider — structured generation against a Gemini-style API.
//!
//! The declared output schema is passed as `responseSchema`, so the
//! provider is expected to return data already conforming to the flow's
//! output shape.

use serde_json::{Value, json};

use crate::error::AiError;
use crate::provider::{GenerationRequest, ModelProvider};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct CloudProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl CloudProvider {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ModelProvider for CloudProvider {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<Value, AiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "systemInstruction": {"parts": [{"text": request.system}]},
            "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema,
            },
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_deref().unwrap_or_default())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Provider(format!("cloud request: {e}")))?
            .error_for_status()
            .map_err(|e| AiError::Provider(format!("cloud request: {e}")))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| AiError::Provider(format!("cloud response: {e}")))?;

        parse_candidate(&body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Extract the first candidate's text part and parse it as JSON.
pub(crate) fn parse_candidate(body: &Value) -> Result<Value, AiError> {
    let text = body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| AiError::Schema("response is missing candidate text".into()))?;
    serde_json::from_str(text)
        .map_err(|e| AiError::Schema(format!("candidate text is not valid JSON: {e}")))
}
