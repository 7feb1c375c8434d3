//! Transcript record entities

use crate::core::error::DomainError;
use crate::pipeline::PipelineResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of the user a record belongs to
///
/// Supplied by whatever authenticated the caller. Restricted to characters
/// that are safe as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id.len() <= 128
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
            && !id.starts_with('.');
        if !valid {
            return Err(DomainError::InvalidUserId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// System-generated identifier of a stored record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A finished pipeline run together with the prompt that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub prompt: String,
    pub result: PipelineResult,
    pub created_at: DateTime<Utc>,
}

impl TranscriptRecord {
    pub fn new(
        user_id: UserId,
        prompt: impl Into<String>,
        result: PipelineResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            user_id,
            prompt: prompt.into(),
            result,
            created_at,
        }
    }
}
