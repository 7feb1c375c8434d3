//! Pipeline configuration.
//!
//! Built once at process start and handed to
//! [`RunPipelineUseCase`](crate::use_cases::run_pipeline::RunPipelineUseCase)
//! by value. Nothing inside the use cases reads configuration from ambient
//! state.

use crate::ports::provider_client::ProviderClient;
use prism_domain::{ConfidencePolicy, ProviderId, ProviderRole};
use std::sync::Arc;
use thiserror::Error;

/// Behavioral settings of the pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    /// Whether low-confidence answers are sent to the escalation provider
    pub escalation_enabled: bool,
    /// Threshold, fallback and post-escalation confidence values
    pub confidence: ConfidencePolicy,
}

impl PipelineConfig {
    pub fn with_escalation(mut self, enabled: bool) -> Self {
        self.escalation_enabled = enabled;
        self
    }

    pub fn with_confidence(mut self, policy: ConfidencePolicy) -> Self {
        self.confidence = policy;
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineSetupError {
    #[error("Both draft roles use provider '{0}'; drafts need two distinct providers")]
    DuplicateDraftProvider(ProviderId),

    #[error("Escalation is enabled but no escalation provider is configured")]
    MissingEscalationProvider,
}

/// Provider clients assigned to each pipeline role
#[derive(Clone)]
pub struct PipelineProviders {
    pub intent: Arc<dyn ProviderClient>,
    pub draft_a: Arc<dyn ProviderClient>,
    pub draft_b: Arc<dyn ProviderClient>,
    pub synthesizer: Arc<dyn ProviderClient>,
    /// Only required when escalation is enabled
    pub escalation: Option<Arc<dyn ProviderClient>>,
}

impl PipelineProviders {
    pub fn new(
        intent: Arc<dyn ProviderClient>,
        draft_a: Arc<dyn ProviderClient>,
        draft_b: Arc<dyn ProviderClient>,
        synthesizer: Arc<dyn ProviderClient>,
    ) -> Self {
        Self {
            intent,
            draft_a,
            draft_b,
            synthesizer,
            escalation: None,
        }
    }

    pub fn with_escalation(mut self, escalation: Arc<dyn ProviderClient>) -> Self {
        self.escalation = Some(escalation);
        self
    }

    /// The provider id filling `role`, if assigned
    pub fn provider_for(&self, role: ProviderRole) -> Option<&ProviderId> {
        match role {
            ProviderRole::Intent => Some(self.intent.id()),
            ProviderRole::DraftA => Some(self.draft_a.id()),
            ProviderRole::DraftB => Some(self.draft_b.id()),
            ProviderRole::Synthesizer => Some(self.synthesizer.id()),
            ProviderRole::Escalation => self.escalation.as_ref().map(|p| p.id()),
        }
    }

    /// Check the role assignment against `config`.
    pub fn validate(&self, config: &PipelineConfig) -> Result<(), PipelineSetupError> {
        if self.draft_a.id() == self.draft_b.id() {
            return Err(PipelineSetupError::DuplicateDraftProvider(
                self.draft_a.id().clone(),
            ));
        }
        if config.escalation_enabled && self.escalation.is_none() {
            return Err(PipelineSetupError::MissingEscalationProvider);
        }
        Ok(())
    }
}

impl std::fmt::Debug for PipelineProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineProviders")
            .field("intent", self.intent.id())
            .field("draft_a", self.draft_a.id())
            .field("draft_b", self.draft_b.id())
            .field("synthesizer", self.synthesizer.id())
            .field("escalation", &self.escalation.as_ref().map(|p| p.id()))
            .finish()
    }
}
