//! Google `generateContent` client (Gemini)
//!
//! The configured endpoint is the API base; the request goes to
//! `{endpoint}/models/{model}:generateContent` with the key as a `key`
//! query parameter.

use super::ProviderEndpoint;
use super::http::send_json;
use async_trait::async_trait;
use prism_application::{ProviderClient, ProviderError};
use prism_domain::ProviderId;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct GenerativeLanguageClient {
    endpoint: ProviderEndpoint,
    http: reqwest::Client,
}

impl GenerativeLanguageClient {
    pub fn new(endpoint: ProviderEndpoint, http: reqwest::Client) -> Self {
        Self { endpoint, http }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.endpoint.trim_end_matches('/'),
            self.endpoint.model
        )
    }

    fn request_body(&self, system_instruction: &str, user_prompt: &str) -> Value {
        let mut body = json!({
            "contents": [{"parts": [{"text": user_prompt}]}]
        });
        if !system_instruction.is_empty() {
            body["systemInstruction"] = json!({"parts": [{"text": system_instruction}]});
        }

        let mut generation = Map::new();
        if let Some(max_tokens) = self.endpoint.max_tokens {
            generation.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if let Some(temperature) = self.endpoint.temperature {
            generation.insert("temperature".to_string(), json!(temperature));
        }
        if !generation.is_empty() {
            body["generationConfig"] = Value::Object(generation);
        }
        body
    }
}

/// Concatenated `candidates[0].content.parts[*].text`
///
/// Parts without text (e.g. inline data) contribute nothing.
fn candidate_text(provider: &ProviderId, response: &Value) -> Result<String, ProviderError> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::MalformedResponse {
            provider: provider.clone(),
        })?;

    Ok(parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect())
}

#[async_trait]
impl ProviderClient for GenerativeLanguageClient {
    fn id(&self) -> &ProviderId {
        &self.endpoint.id
    }

    fn model_id(&self) -> &str {
        &self.endpoint.model
    }

    async fn invoke(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        debug!("{} generateContent with model {}", self.endpoint.id, self.endpoint.model);
        let request = self
            .http
            .post(self.url())
            .query(&[("key", self.endpoint.api_key.as_str())])
            .json(&self.request_body(system_instruction, user_prompt));

        let response = send_json(&self.endpoint.id, request, cancel).await?;
        candidate_text(&self.endpoint.id, &response)
    }
}
