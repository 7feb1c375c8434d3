//! Provider identifier value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Name a provider is registered under (Value Object)
///
/// Provider ids are the keys of the `[providers]` configuration table
/// (e.g. `groq`, `gemini-flash`, `gpt-4o`). They label drafts and errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() || id.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidProviderId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProviderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::new(s)
    }
}

/// Pipeline slot a provider fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderRole {
    /// Fast model producing the intent descriptor
    Intent,
    /// First draft provider ("flash" draft)
    DraftA,
    /// Second draft provider ("turbo" draft)
    DraftB,
    /// Merges both drafts
    Synthesizer,
    /// Improves low-confidence answers
    Escalation,
}

impl ProviderRole {
    pub const ALL: [ProviderRole; 5] = [
        ProviderRole::Intent,
        ProviderRole::DraftA,
        ProviderRole::DraftB,
        ProviderRole::Synthesizer,
        ProviderRole::Escalation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderRole::Intent => "intent",
            ProviderRole::DraftA => "draft_a",
            ProviderRole::DraftB => "draft_b",
            ProviderRole::Synthesizer => "synthesizer",
            ProviderRole::Escalation => "escalation",
        }
    }
}

impl std::fmt::Display for ProviderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
