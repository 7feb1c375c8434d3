//! Confidence score and escalation policy value objects

use serde::{Deserialize, Serialize};

/// Self-reported confidence of a merged answer, always within `[0, 1]`.
///
/// This is an advisory heuristic reported by a model, not a calibrated
/// probability.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    pub const MAX: ConfidenceScore = ConfidenceScore(1.0);

    /// Create a score, clamping into `[0, 1]`. NaN becomes `0.0`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tunable constants of the confidence gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidencePolicy {
    /// Scores strictly below this trigger escalation (when enabled)
    pub threshold: ConfidenceScore,
    /// Score used when no annotation can be parsed
    pub fallback: ConfidenceScore,
    /// Score assigned after a successful escalation
    pub escalated: ConfidenceScore,
}

impl ConfidencePolicy {
    pub const DEFAULT_THRESHOLD: f64 = 0.6;
    pub const DEFAULT_FALLBACK: f64 = 0.9;
    pub const DEFAULT_ESCALATED: f64 = 1.0;

    pub fn new(threshold: f64, fallback: f64, escalated: f64) -> Self {
        Self {
            threshold: ConfidenceScore::new(threshold),
            fallback: ConfidenceScore::new(fallback),
            escalated: ConfidenceScore::new(escalated),
        }
    }

    /// Whether a score is low enough to warrant escalation.
    pub fn is_low(&self, score: ConfidenceScore) -> bool {
        score < self.threshold
    }
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_THRESHOLD,
            Self::DEFAULT_FALLBACK,
            Self::DEFAULT_ESCALATED,
        )
    }
}
