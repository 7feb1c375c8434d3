//! Synthesis
//!
//! Merges both drafts into one answer using the synthesizer provider. The
//! response is returned untouched; reading the confidence annotation is the
//! job of the [`ConfidenceGate`](super::confidence_gate::ConfidenceGate).

use crate::ports::provider_client::{ProviderClient, ProviderError};
use prism_domain::{Draft, IntentDescriptor, Prompt, PromptTemplate, SynthesisResult};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct Synthesizer {
    client: Arc<dyn ProviderClient>,
}

impl Synthesizer {
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        Self { client }
    }

    pub fn provider(&self) -> &dyn ProviderClient {
        self.client.as_ref()
    }

    pub async fn synthesize(
        &self,
        prompt: &Prompt,
        intent: &IntentDescriptor,
        draft_a: &Draft,
        draft_b: &Draft,
        cancel: &CancellationToken,
    ) -> Result<SynthesisResult, ProviderError> {
        let merge_prompt =
            PromptTemplate::synthesis_prompt(prompt.content(), intent, draft_a, draft_b);
        debug!(
            "Merge prompt for {}: {} bytes",
            self.client.id(),
            merge_prompt.len()
        );

        let text = self
            .client
            .invoke(PromptTemplate::synthesis_system(), &merge_prompt, cancel)
            .await?;
        Ok(SynthesisResult::new(self.client.id().clone(), text))
    }
}
