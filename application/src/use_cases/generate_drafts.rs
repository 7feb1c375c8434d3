//! Draft generation
//!
//! Sends the original prompt to two providers at once and waits for both.
//! Either failure fails the stage; the sibling call is dropped.

use crate::ports::provider_client::{ProviderClient, ProviderError};
use crate::ports::progress::ProgressNotifier;
use prism_domain::{Draft, Prompt, PromptTemplate, Stage};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Produces two independent candidate answers
pub struct DraftGenerator {
    draft_a: Arc<dyn ProviderClient>,
    draft_b: Arc<dyn ProviderClient>,
}

impl DraftGenerator {
    pub fn new(draft_a: Arc<dyn ProviderClient>, draft_b: Arc<dyn ProviderClient>) -> Self {
        Self { draft_a, draft_b }
    }

    /// Generate both drafts concurrently. Returns `(draft_a, draft_b)`.
    pub async fn generate(
        &self,
        prompt: &Prompt,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<(Draft, Draft), ProviderError> {
        let (a, b) = tokio::try_join!(
            Self::draft(self.draft_a.as_ref(), prompt, progress, cancel),
            Self::draft(self.draft_b.as_ref(), prompt, progress, cancel),
        )?;
        Ok((a, b))
    }

    async fn draft(
        client: &dyn ProviderClient,
        prompt: &Prompt,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<Draft, ProviderError> {
        match client
            .invoke(PromptTemplate::draft_system(), prompt.content(), cancel)
            .await
        {
            Ok(text) => {
                info!("Provider {} drafted an answer", client.id());
                debug!("Draft from {}: {} bytes", client.id(), text.len());
                progress.on_task_complete(Stage::Drafts, client.id(), true);
                Ok(Draft::new(client.id().clone(), text))
            }
            Err(e) => {
                warn!("Provider {} failed to draft: {}", client.id(), e);
                progress.on_task_complete(Stage::Drafts, client.id(), false);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::test_support::ScriptedProvider;
    use async_trait::async_trait;
    use prism_domain::ProviderId;
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn prompt() -> Prompt {
        Prompt::new("Summarize photosynthesis in one sentence.").unwrap()
    }

    /// Only answers once both draft calls are in flight.
    struct RendezvousProvider {
        id: ProviderId,
        barrier: Arc<Barrier>,
    }

    #[async_trait]
    impl ProviderClient for RendezvousProvider {
        fn id(&self) -> &ProviderId {
            &self.id
        }

        fn model_id(&self) -> &str {
            "rendezvous"
        }

        async fn invoke(
            &self,
            _system_instruction: &str,
            _user_prompt: &str,
            _cancel: &CancellationToken,
        ) -> Result<String, ProviderError> {
            self.barrier.wait().await;
            Ok(format!("from {}", self.id))
        }
    }

    #[tokio::test]
    async fn test_both_drafts_use_original_prompt() {
        let a = ScriptedProvider::replying("gemini-flash", "Plants convert light to energy.");
        let b = ScriptedProvider::replying(
            "gpt-4o",
            "Photosynthesis turns sunlight into chemical energy.",
        );
        let generator = DraftGenerator::new(a.clone(), b.clone());

        let (draft_a, draft_b) = generator
            .generate(&prompt(), &NoProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(draft_a.source_provider_id.as_str(), "gemini-flash");
        assert_eq!(draft_a.text, "Plants convert light to energy.");
        assert_eq!(draft_b.source_provider_id.as_str(), "gpt-4o");
        assert_eq!(
            draft_b.text,
            "Photosynthesis turns sunlight into chemical energy."
        );
        for provider in [&a, &b] {
            let calls = provider.calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].1, "Summarize photosynthesis in one sentence.");
        }
    }

    #[tokio::test]
    async fn test_drafts_run_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let generator = DraftGenerator::new(
            Arc::new(RendezvousProvider {
                id: ProviderId::new("a").unwrap(),
                barrier: barrier.clone(),
            }),
            Arc::new(RendezvousProvider {
                id: ProviderId::new("b").unwrap(),
                barrier,
            }),
        );

        // Sequential execution would never get past the barrier.
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            generator.generate(&prompt(), &NoProgress, &CancellationToken::new()),
        )
        .await
        .expect("drafts did not run concurrently")
        .unwrap();
        assert_eq!(result.0.text, "from a");
        assert_eq!(result.1.text, "from b");
    }

    #[tokio::test]
    async fn test_either_failure_fails_stage() {
        let generator = DraftGenerator::new(
            ScriptedProvider::replying("gemini-flash", "fine"),
            ScriptedProvider::failing("gpt-4o"),
        );
        let err = generator
            .generate(&prompt(), &NoProgress, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.provider().as_str(), "gpt-4o");

        let generator = DraftGenerator::new(
            ScriptedProvider::failing("gemini-flash"),
            ScriptedProvider::replying("gpt-4o", "fine"),
        );
        let err = generator
            .generate(&prompt(), &NoProgress, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.provider().as_str(), "gemini-flash");
    }
}
