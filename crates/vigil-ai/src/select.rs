//! Per-request provider selection.
//!
//! The decision rule over the active configuration, evaluated in order:
//!
//! 1. router provider with a stored API key → OpenRouter path
//! 2. local provider, enabled → Ollama path
//! 3. everything else → cloud provider with the default model
//!
//! Selection runs on every flow invocation; a configuration that cannot
//! be fetched degrades to the defaults instead of failing the flow.

use tracing::debug;
use vigil_core::models::config::{
    AiProviderConfig, DEFAULT_CLOUD_MODEL, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_OPENROUTER_MODEL, DEFAULT_OPENROUTER_URL, ProviderKind,
};
use vigil_core::repository::ConfigRepository;
use vigil_core::settings::DataSource;

use crate::provider::SelectedProvider;
use crate::providers::cloud::CloudProvider;
use crate::providers::ollama::OllamaProvider;
use crate::providers::openrouter::OpenRouterProvider;

/// Deterministic resolution from a configuration record to a provider.
pub fn resolve(config: &AiProviderConfig) -> SelectedProvider {
    if config.provider == ProviderKind::Openrouter
        && let Some(key) = config.openrouter_api_key.as_deref()
        && !key.is_empty()
    {
        let base_url = config
            .openrouter_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENROUTER_URL.to_string());
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string());
        return SelectedProvider::Openrouter(OpenRouterProvider::new(
            base_url,
            key.to_string(),
            model,
        ));
    }

    if config.provider == ProviderKind::Ollama && config.enabled {
        let base_url = config
            .ollama_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
        return SelectedProvider::Ollama(OllamaProvider::new(base_url, model));
    }

    let model = config
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_CLOUD_MODEL.to_string());
    SelectedProvider::Cloud(CloudProvider::new(config.cloud_api_key.clone(), model))
}

/// Fetch the active configuration for this request and resolve it. Any
/// fetch failure or absent record means the hard-coded defaults.
pub async fn select<R: ConfigRepository>(
    repo: &R,
    source_hint: Option<DataSource>,
) -> SelectedProvider {
    let config = match repo.active_ai_config(source_hint).await {
        Ok(Some(config)) => config,
        Ok(None) => AiProviderConfig::default(),
        Err(e) => {
            debug!(error = %e, "AI configuration unavailable, using defaults");
            AiProviderConfig::default()
        }
    };
    resolve(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ModelProvider;

    #[test]
    fn ollama_enabled_selects_local_model() {
        let config = AiProviderConfig {
            provider: ProviderKind::Ollama,
            enabled: true,
            ..Default::default()
        };
        let provider = resolve(&config);
        assert!(matches!(provider, SelectedProvider::Ollama(_)));
        assert_eq!(provider.model(), DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn ollama_disabled_falls_back_to_cloud() {
        let config = AiProviderConfig {
            provider: ProviderKind::Ollama,
            enabled: false,
            ..Default::default()
        };
        assert!(matches!(resolve(&config), SelectedProvider::Cloud(_)));
    }

    #[test]
    fn openrouter_with_key_selects_router() {
        let config = AiProviderConfig {
            provider: ProviderKind::Openrouter,
            openrouter_api_key: Some("sk-or-x".into()),
            ..Default::default()
        };
        let provider = resolve(&config);
        assert!(matches!(provider, SelectedProvider::Openrouter(_)));
        assert_eq!(provider.model(), DEFAULT_OPENROUTER_MODEL);
    }

    #[test]
    fn openrouter_without_key_falls_back_to_cloud() {
        let config = AiProviderConfig {
            provider: ProviderKind::Openrouter,
            openrouter_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(resolve(&config), SelectedProvider::Cloud(_)));
    }

    #[test]
    fn absent_configuration_means_default_cloud_model() {
        let provider = resolve(&AiProviderConfig::default());
        assert!(matches!(provider, SelectedProvider::Cloud(_)));
        assert_eq!(provider.model(), DEFAULT_CLOUD_MODEL);
    }

    #[test]
    fn stored_model_name_overrides_the_default() {
        let config = AiProviderConfig {
            model: Some("gemini-2.5-pro".into()),
            ..Default::default()
        };
        assert_eq!(resolve(&config).model(), "gemini-2.5-pro");
    }
}
