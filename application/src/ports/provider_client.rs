//! Provider client port
//!
//! Defines the interface for sending one prompt to one language-model
//! provider. Each provider family (chat completions, content parts) has an
//! adapter in the infrastructure layer; use cases only see this trait.

use async_trait::async_trait;
use prism_domain::ProviderId;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during a provider call
///
/// Every variant names the provider so a failure can be diagnosed without
/// retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{provider}: transport error: {message}")]
    Transport { provider: ProviderId, message: String },

    #[error("{provider}: HTTP {status}: {message}")]
    Status {
        provider: ProviderId,
        status: u16,
        message: String,
    },

    #[error("{provider}: malformed response")]
    MalformedResponse { provider: ProviderId },

    #[error("{provider}: request timed out")]
    Timeout { provider: ProviderId },

    #[error("{provider}: request cancelled")]
    Cancelled { provider: ProviderId },
}

impl ProviderError {
    /// The provider the failed call was sent to
    pub fn provider(&self) -> &ProviderId {
        match self {
            ProviderError::Transport { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::MalformedResponse { provider }
            | ProviderError::Timeout { provider }
            | ProviderError::Cancelled { provider } => provider,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::Cancelled { .. })
    }
}

/// A single language-model endpoint
///
/// Endpoint, credentials and model id are bound at construction. No
/// retries and no caching: one `invoke` is one network request.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Name the provider is configured under
    fn id(&self) -> &ProviderId;

    /// Model identifier sent to the endpoint
    fn model_id(&self) -> &str;

    /// Send one system instruction plus user prompt and return the
    /// primary completion text.
    ///
    /// Implementations must return [`ProviderError::Cancelled`] promptly
    /// once `cancel` fires.
    async fn invoke(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError>;
}
