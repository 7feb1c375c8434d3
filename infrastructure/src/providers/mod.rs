//! HTTP provider clients
//!
//! Two wire families cover every configured provider:
//!
//! - [`ChatCompletionsClient`]: OpenAI-compatible `chat/completions`
//!   endpoints (Groq, OpenAI, xAI)
//! - [`GenerativeLanguageClient`]: Google `generateContent` endpoints
//!   (Gemini)
//!
//! [`ProviderRegistry`] turns the `[providers]` configuration into
//! [`ProviderClient`](prism_application::ProviderClient) trait objects.

pub mod chat_completions;
pub mod generative_language;
mod http;
pub mod registry;

pub use chat_completions::ChatCompletionsClient;
pub use generative_language::GenerativeLanguageClient;
pub use registry::ProviderRegistry;

use prism_domain::ProviderId;
use serde::{Deserialize, Serialize};

/// Wire format spoken by a provider endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFamily {
    ChatCompletions,
    GenerativeLanguage,
}

impl ProviderFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFamily::ChatCompletions => "chat_completions",
            ProviderFamily::GenerativeLanguage => "generative_language",
        }
    }
}

/// Everything a client needs to reach one provider, with the API key
/// already resolved
#[derive(Clone)]
pub struct ProviderEndpoint {
    pub id: ProviderId,
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl std::fmt::Debug for ProviderEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEndpoint")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}
