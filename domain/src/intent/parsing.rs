//! Strict parsing of intent-provider output.
//!
//! The intent provider is instructed to answer with a bare JSON object. The
//! only cleanup applied is trimming and removing one enclosing markdown
//! code fence; anything else that is not a valid [`IntentDescriptor`] is an
//! [`IntentParseError`] that carries the raw text for diagnostics.

use super::descriptor::IntentDescriptor;
use thiserror::Error;

/// The intent payload was not a valid descriptor.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid intent descriptor: {reason}\nRaw response: {raw}")]
pub struct IntentParseError {
    pub reason: String,
    pub raw: String,
}

/// Parse an intent descriptor from provider output.
///
/// # Examples
///
/// ```
/// use prism_domain::intent::parse_intent;
///
/// let raw = r#"{"intent":"query","entities":[],"tone":"neutral","length":"short","constraints":[]}"#;
/// let intent = parse_intent(raw).unwrap();
/// assert_eq!(intent.intent, "query");
///
/// assert!(parse_intent("Sure! Here is the intent.").is_err());
/// ```
pub fn parse_intent(raw: &str) -> Result<IntentDescriptor, IntentParseError> {
    let body = strip_code_fence(raw.trim());
    serde_json::from_str(body).map_err(|e| IntentParseError {
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line, or right
    // after the fence when everything sits on one line
    match inner.split_once('\n') {
        Some((info, body)) if !info.contains('{') => body.trim(),
        _ => {
            let inner = inner.trim();
            inner
                .strip_prefix("json")
                .or_else(|| inner.strip_prefix("JSON"))
                .unwrap_or(inner)
                .trim()
        }
    }
}
