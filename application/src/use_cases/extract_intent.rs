//! Intent extraction
//!
//! Asks the fast provider for a JSON-only [`IntentDescriptor`] and parses
//! it strictly.

use crate::ports::provider_client::{ProviderClient, ProviderError};
use prism_domain::{IntentDescriptor, IntentParseError, Prompt, PromptTemplate, parse_intent};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Parse(#[from] IntentParseError),
}

/// Produces the intent descriptor for a prompt
pub struct IntentExtractor {
    client: Arc<dyn ProviderClient>,
}

impl IntentExtractor {
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        Self { client }
    }

    pub fn provider(&self) -> &dyn ProviderClient {
        self.client.as_ref()
    }

    pub async fn extract(
        &self,
        prompt: &Prompt,
        cancel: &CancellationToken,
    ) -> Result<IntentDescriptor, IntentError> {
        let raw = self
            .client
            .invoke(PromptTemplate::intent_system(), prompt.content(), cancel)
            .await?;
        debug!("Intent response from {} ({} bytes)", self.client.id(), raw.len());

        parse_intent(&raw).map_err(|e| {
            warn!("Invalid intent JSON from {}: {}", self.client.id(), e.reason);
            IntentError::Parse(e)
        })
    }
}
