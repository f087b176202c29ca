//! Local provider — Ollama chat endpoint in JSON mode.

use serde_json::{Value, json};

use crate::error::AiError;
use crate::provider::{GenerationRequest, ModelProvider};

pub struct OllamaProvider {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            model,
        }
    }
}

impl ModelProvider for OllamaProvider {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<Value, AiError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt},
            ],
            "stream": false,
            "format": "json",
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Provider(format!("ollama request: {e}")))?
            .error_for_status()
            .map_err(|e| AiError::Provider(format!("ollama request: {e}")))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| AiError::Provider(format!("ollama response: {e}")))?;

        parse_message(&body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

pub(crate) fn parse_message(body: &Value) -> Result<Value, AiError> {
    let content = body["message"]["content"]
        .as_str()
        .ok_or_else(|| AiError::Schema("response is missing message content".into()))?;
    serde_json::from_str(content)
        .map_err(|e| AiError::Schema(format!("message content is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_content_is_parsed_as_json() {
        let body = json!({"message": {"content": "{\"ok\": true}"}});
        assert_eq!(parse_message(&body).unwrap(), json!({"ok": true}));
    }

    #[test]
    fn non_json_content_is_a_schema_error() {
        let body = json!({"message": {"content": "I cannot answer that."}});
        assert!(matches!(parse_message(&body), Err(AiError::Schema(_))));
    }
}
