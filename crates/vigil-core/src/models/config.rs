//! Tenant-owned configuration records.
//!
//! Each configuration collection follows first-row-wins semantics: the
//! active record is the first one returned by the store; an empty
//! collection means the hard-coded defaults apply. Consumers only ever
//! read these records.

use serde::{Deserialize, Serialize};

/// Default model used when no cloud model name is stored.
pub const DEFAULT_CLOUD_MODEL: &str = "gemini-2.0-flash";
/// Default model for the local Ollama provider.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default OpenRouter endpoint.
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";
/// Default model routed through OpenRouter.
pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";

/// Which language-model backend a tenant has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Cloud-hosted model with structured generation.
    #[default]
    Cloud,
    /// Locally hosted model served by Ollama.
    Ollama,
    /// Generic OpenAI-compatible router.
    Openrouter,
}

/// Active AI provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AiProviderConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    /// Gate for the Ollama path; the cloud path ignores it.
    #[serde(default)]
    pub enabled: bool,
    /// Model name override for the selected provider.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub cloud_api_key: Option<String>,
    #[serde(default)]
    pub ollama_url: Option<String>,
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
    #[serde(default)]
    pub openrouter_url: Option<String>,
}

/// Outbound mail settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MailConfig {
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

/// Documentation-export settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DocExportConfig {
    /// Export format tag (e.g. `pdf`, `docx`).
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub target_path: String,
    #[serde(default)]
    pub include_archived: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Configuration records come out of schemaless collections; partial
    // rows must fill with the defaults instead of failing.

    #[test]
    fn ai_config_from_empty_record_is_the_default() {
        let config: AiProviderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AiProviderConfig::default());
        assert_eq!(config.provider, ProviderKind::Cloud);
    }

    #[test]
    fn mail_config_fills_missing_fields() {
        let config: MailConfig = serde_json::from_str(r#"{"smtp_host": "mail.example.com"}"#).unwrap();
        assert_eq!(config.smtp_host, "mail.example.com");
        assert_eq!(config.smtp_port, 587);
        assert!(config.username.is_none());
    }

    #[test]
    fn export_config_fills_missing_fields() {
        let config: DocExportConfig = serde_json::from_str(r#"{"format": "pdf"}"#).unwrap();
        assert_eq!(config.format, "pdf");
        assert!(config.target_path.is_empty());
        assert!(!config.include_archived);
    }
}
