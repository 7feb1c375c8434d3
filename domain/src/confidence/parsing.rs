//! Confidence annotation parsing.
//!
//! The synthesizer is asked to end its answer with a line such as
//! `{"confidence": 0.85}`. Models do not always comply, so matching is
//! loose: any brace-delimited fragment (without nested braces) that
//! mentions `confidence` is a candidate, and the last one wins.
//!
//! | Input | [`extract_confidence`] |
//! |-------|------------------------|
//! | `answer\n{"confidence":0.85}` | `Ok(Parsed(0.85))` |
//! | `answer` | `Ok(NotFound)` |
//! | `answer {confidence: high}` | `Err(ConfidenceParseError)` |

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^{}]*confidence[^{}]*\}").expect("annotation pattern is valid")
});

/// Outcome of looking for a confidence annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceAnnotation {
    /// A well-formed annotation with this (unclamped) value
    Parsed(f64),
    /// No annotation-like fragment in the text
    NotFound,
}

/// An annotation-like fragment exists but does not yield a number.
///
/// Never surfaced to callers; the confidence gate falls back to the
/// policy default.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed confidence annotation {fragment:?}: {reason}")]
pub struct ConfidenceParseError {
    pub fragment: String,
    pub reason: String,
}

/// Find and parse the confidence annotation in a synthesizer response.
///
/// # Examples
///
/// ```
/// use prism_domain::confidence::{ConfidenceAnnotation, extract_confidence};
///
/// let text = "Plants make sugar from light.\n{\"confidence\": 0.42}";
/// assert_eq!(extract_confidence(text), Ok(ConfidenceAnnotation::Parsed(0.42)));
/// assert_eq!(extract_confidence("No annotation"), Ok(ConfidenceAnnotation::NotFound));
/// ```
pub fn extract_confidence(text: &str) -> Result<ConfidenceAnnotation, ConfidenceParseError> {
    let Some(fragment) = find_confidence_annotation(text) else {
        return Ok(ConfidenceAnnotation::NotFound);
    };

    let malformed = |reason: String| ConfidenceParseError {
        fragment: fragment.to_string(),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(fragment).map_err(|e| malformed(e.to_string()))?;

    let confidence = value
        .get("confidence")
        .ok_or_else(|| malformed("no \"confidence\" key".to_string()))?;

    let number = match confidence {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| malformed(format!("confidence is not a number: {}", confidence)))?;

    Ok(ConfidenceAnnotation::Parsed(number))
}

/// The last annotation-like fragment in `text`, unparsed.
pub fn find_confidence_annotation(text: &str) -> Option<&str> {
    ANNOTATION.find_iter(text).last().map(|m| m.as_str())
}

/// Remove the trailing confidence annotation and trailing whitespace from
/// `text`.
///
/// Only the last annotation-like fragment is removed, and only when nothing
/// but whitespace follows it. Fragments inside the answer are content.
///
/// ```
/// use prism_domain::confidence::strip_confidence_annotation;
///
/// let text = "The answer.\n{\"confidence\":0.85}\n";
/// assert_eq!(strip_confidence_annotation(text), "The answer.");
/// ```
pub fn strip_confidence_annotation(text: &str) -> String {
    match ANNOTATION.find_iter(text).last() {
        Some(m) if text[m.end()..].trim().is_empty() => text[..m.start()].trim_end().to_string(),
        _ => text.trim_end().to_string(),
    }
}
