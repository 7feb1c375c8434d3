//! Provider registry
//!
//! Resolves provider names from `[pipeline]` to configured endpoints and
//! builds one client per role. All clients share a single HTTP connection
//! pool carrying the configured request timeout.

use super::{ChatCompletionsClient, GenerativeLanguageClient, ProviderEndpoint, ProviderFamily};
use crate::config::{ConfigError, FileConfig, FilePipelineConfig, FileProviderConfig};
use prism_application::{PipelineProviders, ProviderClient};
use prism_domain::{ProviderId, ProviderRole};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub struct ProviderRegistry {
    providers: BTreeMap<String, FileProviderConfig>,
    http: reqwest::Client,
}

impl ProviderRegistry {
    pub fn new(config: &FileConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.pipeline.request_timeout())
            .build()?;
        Ok(Self {
            providers: config.providers.clone(),
            http,
        })
    }

    /// Build one client per active role of `pipeline`
    ///
    /// Fails on the first role whose provider is unknown or has no key, so
    /// no request is sent with an incomplete setup.
    pub fn pipeline_providers(
        &self,
        pipeline: &FilePipelineConfig,
    ) -> Result<PipelineProviders, ConfigError> {
        self.pipeline_providers_with(pipeline, |var| std::env::var(var).ok())
    }

    fn pipeline_providers_with(
        &self,
        pipeline: &FilePipelineConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<PipelineProviders, ConfigError> {
        let mut clients = BTreeMap::new();
        for role in pipeline.active_roles() {
            let client = self.client_with(pipeline.role(role), &lookup)?;
            debug!("{} -> {} ({})", role.as_str(), client.id(), client.model_id());
            clients.insert(role.as_str(), client);
        }

        let mut take = |role: ProviderRole| {
            clients
                .remove(role.as_str())
                .ok_or_else(|| ConfigError::UnknownProvider(pipeline.role(role).to_string()))
        };

        let providers = PipelineProviders::new(
            take(ProviderRole::Intent)?,
            take(ProviderRole::DraftA)?,
            take(ProviderRole::DraftB)?,
            take(ProviderRole::Synthesizer)?,
        );
        Ok(match take(ProviderRole::Escalation) {
            Ok(escalation) => providers.with_escalation(escalation),
            Err(_) => providers,
        })
    }

    fn client_with(
        &self,
        name: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Arc<dyn ProviderClient>, ConfigError> {
        let config = self
            .providers
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProvider(name.to_string()))?;
        let id =
            ProviderId::new(name).map_err(|_| ConfigError::InvalidProviderName(name.to_string()))?;
        let api_key = config
            .resolve_api_key(lookup)
            .ok_or_else(|| ConfigError::MissingApiKey {
                provider: name.to_string(),
                env: config.api_key_env.clone(),
            })?;

        let endpoint = ProviderEndpoint {
            id,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        let client: Arc<dyn ProviderClient> = match config.family {
            ProviderFamily::ChatCompletions => {
                Arc::new(ChatCompletionsClient::new(endpoint, self.http.clone()))
            }
            ProviderFamily::GenerativeLanguage => {
                Arc::new(GenerativeLanguageClient::new(endpoint, self.http.clone()))
            }
        };
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_keys(_: &str) -> Option<String> {
        Some("test-key".to_string())
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(&FileConfig::default()).unwrap()
    }

    #[test]
    fn test_client_binds_model() {
        let client = registry().client_with("gemini-flash", all_keys).unwrap();
        assert_eq!(client.id().as_str(), "gemini-flash");
        assert_eq!(client.model_id(), "gemini-1.5-flash");
    }

    #[test]
    fn test_unknown_provider() {
        let result = registry().client_with("claude", all_keys);
        assert!(matches!(result, Err(ConfigError::UnknownProvider(name)) if name == "claude"));
    }

    #[test]
    fn test_missing_key_reports_env_var() {
        let result = registry().client_with("grok", |_| None);
        match result {
            Err(ConfigError::MissingApiKey { provider, env }) => {
                assert_eq!(provider, "grok");
                assert_eq!(env.as_deref(), Some("XAI_API_KEY"));
            }
            _ => panic!("expected MissingApiKey"),
        }
    }

    #[test]
    fn test_pipeline_providers_default_roles() {
        let config = FileConfig::default();
        let providers = registry()
            .pipeline_providers_with(&config.pipeline, all_keys)
            .unwrap();

        let name = |role| providers.provider_for(role).map(|id| id.as_str().to_string());
        assert_eq!(name(ProviderRole::Intent).as_deref(), Some("groq"));
        assert_eq!(name(ProviderRole::DraftA).as_deref(), Some("gemini-flash"));
        assert_eq!(name(ProviderRole::DraftB).as_deref(), Some("gpt-4o"));
        assert_eq!(name(ProviderRole::Synthesizer).as_deref(), Some("grok"));
        assert_eq!(name(ProviderRole::Escalation), None);
    }

    #[test]
    fn test_pipeline_providers_with_escalation() {
        let mut config = FileConfig::default();
        config.pipeline.escalation_enabled = true;
        let providers = registry()
            .pipeline_providers_with(&config.pipeline, all_keys)
            .unwrap();
        assert_eq!(
            providers
                .provider_for(ProviderRole::Escalation)
                .map(ProviderId::as_str),
            Some("gpt-4o")
        );
    }

    #[test]
    fn test_escalation_key_only_needed_when_enabled() {
        let mut config = FileConfig::default();
        config.pipeline.escalation = "gpt-3.5-turbo".to_string();
        config
            .providers
            .get_mut("gpt-3.5-turbo")
            .unwrap()
            .api_key_env = Some("PRISM_TEST_UNSET_KEY".to_string());

        let lookup = |var: &str| (var != "PRISM_TEST_UNSET_KEY").then(|| "k".to_string());
        let registry = ProviderRegistry::new(&config).unwrap();
        assert!(registry.pipeline_providers_with(&config.pipeline, lookup).is_ok());

        config.pipeline.escalation_enabled = true;
        assert!(matches!(
            registry.pipeline_providers_with(&config.pipeline, lookup),
            Err(ConfigError::MissingApiKey { .. })
        ));
    }
}
