//! Provider configuration from TOML (`[providers.<name>]` tables)

use crate::providers::ProviderFamily;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named provider endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileProviderConfig {
    /// Wire format of the endpoint
    pub family: ProviderFamily,
    /// Full URL for chat completions; API base for generative language
    pub endpoint: String,
    /// Model identifier sent to the endpoint
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended, use env var instead).
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl FileProviderConfig {
    fn new(family: ProviderFamily, endpoint: &str, model: &str, api_key_env: &str) -> Self {
        Self {
            family,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key_env: Some(api_key_env.to_string()),
            api_key: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// The direct key if set, else the value of `api_key_env` from `lookup`.
    ///
    /// Empty values count as missing.
    pub fn resolve_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(present)
            .or_else(|| {
                self.api_key_env
                    .as_deref()
                    .and_then(&lookup)
                    .filter(present)
            })
    }
}

/// The providers every installation knows about
pub fn builtin_providers() -> BTreeMap<String, FileProviderConfig> {
    const OPENAI: &str = "https://api.openai.com/v1/chat/completions";

    let mut groq = FileProviderConfig::new(
        ProviderFamily::ChatCompletions,
        "https://api.groq.com/openai/v1/chat/completions",
        "llama3-8b-8192",
        "GROQ_API_KEY",
    );
    groq.max_tokens = Some(256);
    groq.temperature = Some(0.2);

    BTreeMap::from([
        ("groq".to_string(), groq),
        (
            "gemini-flash".to_string(),
            FileProviderConfig::new(
                ProviderFamily::GenerativeLanguage,
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-1.5-flash",
                "GOOGLE_API_KEY",
            ),
        ),
        (
            "gpt-4o".to_string(),
            FileProviderConfig::new(
                ProviderFamily::ChatCompletions,
                OPENAI,
                "gpt-4o",
                "OPENAI_API_KEY",
            ),
        ),
        (
            "gpt-3.5-turbo".to_string(),
            FileProviderConfig::new(
                ProviderFamily::ChatCompletions,
                OPENAI,
                "gpt-3.5-turbo",
                "OPENAI_API_KEY",
            ),
        ),
        (
            "grok".to_string(),
            FileProviderConfig::new(
                ProviderFamily::ChatCompletions,
                "https://api.x.ai/v1/chat/completions",
                "grok-beta",
                "XAI_API_KEY",
            ),
        ),
    ])
}
