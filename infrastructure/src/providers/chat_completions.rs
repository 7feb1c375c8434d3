//! OpenAI-compatible `chat/completions` client
//!
//! Used for Groq, OpenAI and xAI. The full endpoint URL is configured; the
//! key travels as a bearer token.

use super::ProviderEndpoint;
use super::http::send_json;
use async_trait::async_trait;
use prism_application::{ProviderClient, ProviderError};
use prism_domain::ProviderId;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct ChatCompletionsClient {
    endpoint: ProviderEndpoint,
    http: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new(endpoint: ProviderEndpoint, http: reqwest::Client) -> Self {
        Self { endpoint, http }
    }

    fn request_body(&self, system_instruction: &str, user_prompt: &str) -> Value {
        let mut body = json!({
            "model": self.endpoint.model,
            "messages": [
                {"role": "system", "content": system_instruction},
                {"role": "user", "content": user_prompt}
            ]
        });
        if let Some(max_tokens) = self.endpoint.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.endpoint.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }
}

/// `choices[0].message.content`
fn completion_text(provider: &ProviderId, response: &Value) -> Result<String, ProviderError> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::MalformedResponse {
            provider: provider.clone(),
        })
}

#[async_trait]
impl ProviderClient for ChatCompletionsClient {
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
        debug!(
            "{} chat completion with model {}",
            self.endpoint.id, self.endpoint.model
        );
        let request = self
            .http
            .post(&self.endpoint.endpoint)
            .bearer_auth(&self.endpoint.api_key)
            .json(&self.request_body(system_instruction, user_prompt));

        let response = send_json(&self.endpoint.id, request, cancel).await?;
        completion_text(&self.endpoint.id, &response)
    }
}
