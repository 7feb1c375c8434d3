//! Confidence domain: the advisory score attached to a merged answer.
//!
//! - [`ConfidenceScore`]: a value clamped into `[0, 1]`
//! - [`ConfidencePolicy`]: threshold, fallback and post-escalation values
//! - [`extract_confidence`] / [`strip_confidence_annotation`]: parsing of
//!   the trailing `{"confidence": …}` fragment the synthesizer appends

pub mod parsing;
pub mod policy;

pub use parsing::{
    ConfidenceAnnotation, ConfidenceParseError, extract_confidence, find_confidence_annotation,
    strip_confidence_annotation,
};
pub use policy::{ConfidencePolicy, ConfidenceScore};
