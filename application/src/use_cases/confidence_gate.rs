//! Confidence gate
//!
//! Reads the confidence annotation from the synthesizer output and, when the
//! score is low and escalation is enabled, asks the escalation provider to
//! improve the answer.
//!
//! A malformed annotation never fails a request: the policy fallback is
//! used instead. An escalation call that fails does fail the request.

use crate::ports::provider_client::{ProviderClient, ProviderError};
use prism_domain::{
    ConfidenceAnnotation, ConfidencePolicy, ConfidenceScore, PromptTemplate, extract_confidence,
    strip_confidence_annotation,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How the confidence score was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceSource {
    /// Read from a well-formed annotation
    Annotation,
    /// No annotation present; policy fallback used
    Missing,
    /// Annotation present but unreadable; policy fallback used
    Malformed,
}

impl ConfidenceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceSource::Annotation => "annotation",
            ConfidenceSource::Missing => "missing",
            ConfidenceSource::Malformed => "malformed",
        }
    }
}

/// Final text and score after the gate
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub final_text: String,
    pub confidence: ConfidenceScore,
    /// Score read before any escalation
    pub reported: ConfidenceScore,
    pub source: ConfidenceSource,
    pub escalated: bool,
}

/// Scoring decision for one synthesizer response, before any escalation
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Response with the trailing annotation removed
    pub answer: String,
    pub reported: ConfidenceScore,
    pub source: ConfidenceSource,
    pub escalate: bool,
}

pub struct ConfidenceGate {
    policy: ConfidencePolicy,
    escalator: Option<Arc<dyn ProviderClient>>,
}

impl ConfidenceGate {
    pub fn new(policy: ConfidencePolicy, escalator: Option<Arc<dyn ProviderClient>>) -> Self {
        Self { policy, escalator }
    }

    /// Score a synthesizer response, falling back to the policy default.
    pub fn score(&self, synthesis_text: &str) -> (ConfidenceScore, ConfidenceSource) {
        match extract_confidence(synthesis_text) {
            Ok(ConfidenceAnnotation::Parsed(value)) => {
                (ConfidenceScore::new(value), ConfidenceSource::Annotation)
            }
            Ok(ConfidenceAnnotation::NotFound) => {
                debug!("No confidence annotation; using {}", self.policy.fallback);
                (self.policy.fallback, ConfidenceSource::Missing)
            }
            Err(e) => {
                warn!("{}; using {}", e, self.policy.fallback);
                (self.policy.fallback, ConfidenceSource::Malformed)
            }
        }
    }

    /// Whether `score` would trigger an escalation call
    pub fn should_escalate(&self, score: ConfidenceScore, escalation_enabled: bool) -> bool {
        escalation_enabled && self.escalator.is_some() && self.policy.is_low(score)
    }

    pub fn escalation_provider(&self) -> Option<&dyn ProviderClient> {
        self.escalator.as_deref()
    }

    /// Score `synthesis_text` once and decide whether to escalate.
    pub fn assess(&self, synthesis_text: &str, escalation_enabled: bool) -> Assessment {
        let (reported, source) = self.score(synthesis_text);
        Assessment {
            answer: strip_confidence_annotation(synthesis_text),
            reported,
            source,
            escalate: self.should_escalate(reported, escalation_enabled),
        }
    }

    /// Carry out an assessment, calling the escalation provider when it
    /// asked for one.
    pub async fn resolve(
        &self,
        assessment: Assessment,
        cancel: &CancellationToken,
    ) -> Result<GateOutcome, ProviderError> {
        let Assessment {
            answer,
            reported,
            source,
            escalate,
        } = assessment;

        let escalator = match &self.escalator {
            Some(escalator) if escalate => escalator,
            _ => {
                return Ok(GateOutcome {
                    final_text: answer,
                    confidence: reported,
                    reported,
                    source,
                    escalated: false,
                });
            }
        };

        info!(
            "Confidence {} below {}; escalating to {}",
            reported,
            self.policy.threshold,
            escalator.id()
        );
        let improved = escalator
            .invoke(
                PromptTemplate::escalation_system(),
                &PromptTemplate::escalation_prompt(reported, &answer),
                cancel,
            )
            .await?;

        Ok(GateOutcome {
            final_text: strip_confidence_annotation(&improved),
            confidence: self.policy.escalated,
            reported,
            source,
            escalated: true,
        })
    }

    /// [`assess`](Self::assess) followed by [`resolve`](Self::resolve)
    pub async fn gate(
        &self,
        synthesis_text: &str,
        escalation_enabled: bool,
        cancel: &CancellationToken,
    ) -> Result<GateOutcome, ProviderError> {
        self.resolve(self.assess(synthesis_text, escalation_enabled), cancel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedProvider;

    fn gate_with(escalator: Option<Arc<ScriptedProvider>>) -> ConfidenceGate {
        ConfidenceGate::new(
            ConfidencePolicy::default(),
            escalator.map(|e| e as Arc<dyn ProviderClient>),
        )
    }

    #[tokio::test]
    async fn test_parsed_confidence_is_stripped() {
        let gate = gate_with(None);
        let outcome = gate
            .gate("Answer.\n{\"confidence\": 0.42}", false, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.final_text, "Answer.");
        assert_eq!(outcome.confidence.value(), 0.42);
        assert_eq!(outcome.source, ConfidenceSource::Annotation);
        assert!(!outcome.escalated);
    }

    #[tokio::test]
    async fn test_missing_annotation_defaults() {
        let gate = gate_with(None);
        let outcome = gate
            .gate("Answer without score.", true, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.confidence.value(), 0.9);
        assert_eq!(outcome.source, ConfidenceSource::Missing);
    }

    #[tokio::test]
    async fn test_malformed_annotation_defaults_and_is_stripped() {
        let escalator = ScriptedProvider::shared("gpt-4o");
        let gate = gate_with(Some(escalator.clone()));
        let outcome = gate
            .gate("Answer.\n{confidence: low}", true, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.final_text, "Answer.");
        assert_eq!(outcome.confidence.value(), 0.9);
        assert_eq!(outcome.source, ConfidenceSource::Malformed);
        assert_eq!(escalator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_low_confidence_escalates_when_enabled() {
        let escalator = ScriptedProvider::replying("gpt-4o", "Better answer.");
        let gate = gate_with(Some(escalator.clone()));

        let outcome = gate
            .gate("Weak answer.\n{\"confidence\":0.42}", true, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.final_text, "Better answer.");
        assert_eq!(outcome.confidence.value(), 1.0);
        assert_eq!(outcome.reported.value(), 0.42);
        assert!(outcome.escalated);

        let calls = escalator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, PromptTemplate::escalation_system());
        assert_eq!(
            calls[0].1,
            "Improve this low-confidence answer (0.42).\n\nWeak answer."
        );
    }

    #[tokio::test]
    async fn test_low_confidence_kept_when_disabled() {
        let escalator = ScriptedProvider::replying("gpt-4o", "Better answer.");
        let gate = gate_with(Some(escalator.clone()));

        let outcome = gate
            .gate("Weak answer.\n{\"confidence\":0.42}", false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.final_text, "Weak answer.");
        assert_eq!(outcome.confidence.value(), 0.42);
        assert!(!outcome.escalated);
        assert_eq!(escalator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let escalator = ScriptedProvider::shared("gpt-4o");
        let gate = gate_with(Some(escalator.clone()));
        let outcome = gate
            .gate("Ok.\n{\"confidence\":0.6}", true, &CancellationToken::new())
            .await
            .unwrap();
        assert!(!outcome.escalated);
        assert_eq!(escalator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_escalated_answer_is_stripped_too() {
        let escalator = ScriptedProvider::replying("gpt-4o", "Better.\n{\"confidence\": 0.99}");
        let gate = gate_with(Some(escalator));
        let outcome = gate
            .gate("Weak.\n{\"confidence\":0.1}", true, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.final_text, "Better.");
        assert_eq!(outcome.confidence.value(), 1.0);
    }

    #[tokio::test]
    async fn test_escalation_failure_is_fatal() {
        let gate = gate_with(Some(ScriptedProvider::failing("gpt-4o")));
        let err = gate
            .gate("Weak.\n{\"confidence\":0.1}", true, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.provider().as_str(), "gpt-4o");
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let escalator = ScriptedProvider::replying("gpt-4o", "Better.");
        let gate = ConfidenceGate::new(
            ConfidencePolicy::new(0.95, 0.5, 0.99),
            Some(escalator.clone() as Arc<dyn ProviderClient>),
        );
        // Missing annotation falls back to 0.5, which is below 0.95
        let outcome = gate
            .gate("No score.", true, &CancellationToken::new())
            .await
            .unwrap();
        assert!(outcome.escalated);
        assert_eq!(outcome.reported.value(), 0.5);
        assert_eq!(outcome.confidence.value(), 0.99);
    }

    #[tokio::test]
    async fn test_resolve_uses_the_assessed_score() {
        let escalator = ScriptedProvider::replying("gpt-4o", "Better.");
        let gate = gate_with(Some(escalator.clone()));

        let assessment = gate.assess("Weak.\n{\"confidence\":0.2}", true);
        assert_eq!(assessment.answer, "Weak.");
        assert_eq!(assessment.source, ConfidenceSource::Annotation);
        assert!(assessment.escalate);

        // The text is not scored again: an assessment that says "keep" is kept
        let keep = Assessment {
            escalate: false,
            ..assessment.clone()
        };
        let outcome = gate.resolve(keep, &CancellationToken::new()).await.unwrap();
        assert!(!outcome.escalated);
        assert_eq!(outcome.confidence.value(), 0.2);
        assert_eq!(escalator.call_count(), 0);

        let outcome = gate
            .resolve(assessment, &CancellationToken::new())
            .await
            .unwrap();
        assert!(outcome.escalated);
        assert_eq!(escalator.call_count(), 1);
    }
}
