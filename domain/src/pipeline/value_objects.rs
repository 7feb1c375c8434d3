//! Pipeline value objects - immutable results of each stage.
//!
//! - [`Draft`] - one provider's candidate answer
//! - [`SynthesisResult`] - the synthesizer's unmodified output
//! - [`PipelineResult`] - the envelope returned across the pipeline boundary

use crate::confidence::{
    ConfidenceScore, parsing::find_confidence_annotation, strip_confidence_annotation,
};
use crate::core::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Candidate answer from a single draft provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub source_provider_id: ProviderId,
    pub text: String,
}

impl Draft {
    pub fn new(source_provider_id: ProviderId, text: impl Into<String>) -> Self {
        Self {
            source_provider_id,
            text: text.into(),
        }
    }
}

/// Output of the synthesis stage, kept exactly as the provider returned it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// The provider that merged the drafts
    pub synthesizer: ProviderId,
    /// Raw response text, annotation included
    pub raw_text: String,
}

impl SynthesisResult {
    pub fn new(synthesizer: ProviderId, raw_text: impl Into<String>) -> Self {
        Self {
            synthesizer,
            raw_text: raw_text.into(),
        }
    }

    /// The answer with every confidence annotation removed
    pub fn merged_text(&self) -> String {
        strip_confidence_annotation(&self.raw_text)
    }

    /// The trailing confidence fragment, if the provider appended one
    pub fn raw_confidence_annotation(&self) -> Option<&str> {
        find_confidence_annotation(&self.raw_text)
    }
}

/// Complete result of a pipeline run
///
/// The only value exposed across the pipeline boundary. The two drafts are
/// kept for transparency; `final_answer` never contains a confidence
/// annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub flash_draft: String,
    pub turbo_draft: String,
    pub final_answer: String,
    pub confidence: ConfidenceScore,
    /// Provider behind `flash_draft`
    pub flash_provider: ProviderId,
    /// Provider behind `turbo_draft`
    pub turbo_provider: ProviderId,
    /// Whether the answer came from the escalation provider
    #[serde(default)]
    pub escalated: bool,
}

impl PipelineResult {
    pub fn new(
        flash: Draft,
        turbo: Draft,
        final_answer: impl Into<String>,
        confidence: ConfidenceScore,
        escalated: bool,
    ) -> Self {
        Self {
            flash_draft: flash.text,
            turbo_draft: turbo.text,
            final_answer: final_answer.into(),
            confidence,
            flash_provider: flash.source_provider_id,
            turbo_provider: turbo.source_provider_id,
            escalated,
        }
    }
}
