//! Domain layer for prism
//!
//! This crate contains the core entities, value objects and parsing rules
//! of the answer pipeline. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Pipeline
//!
//! A single prompt runs through four stages:
//!
//! 1. **Intent**: a fast provider summarizes the request as an [`IntentDescriptor`]
//! 2. **Drafts**: two providers answer the original prompt concurrently
//! 3. **Synthesis**: a third provider merges both drafts and reports confidence
//! 4. **Escalation** (conditional): a strong provider improves low-confidence answers
//!
//! ## Confidence
//!
//! The synthesizer appends `{"confidence": <0-1>}` to its answer.
//! [`extract_confidence`] reads it; [`strip_confidence_annotation`] removes it.

pub mod confidence;
pub mod config;
pub mod core;
pub mod history;
pub mod intent;
pub mod pipeline;
pub mod prompt;

// Re-export commonly used types
pub use confidence::{
    ConfidenceAnnotation, ConfidenceParseError, ConfidencePolicy, ConfidenceScore,
    extract_confidence, strip_confidence_annotation,
};
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    prompt::Prompt,
    provider::{ProviderId, ProviderRole},
};
pub use history::{RecordId, TranscriptRecord, UserId};
pub use intent::{IntentDescriptor, IntentParseError, parse_intent};
pub use pipeline::{Draft, PipelineResult, PipelineRun, PipelineState, Stage, SynthesisResult};
pub use prompt::PromptTemplate;
