//! Transcript store port
//!
//! The persistence collaborator: stores finished pipeline results keyed by
//! user and lists them newest first.

use async_trait::async_trait;
use prism_domain::{RecordId, TranscriptRecord, UserId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscriptStoreError {
    #[error("Transcript storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transcript serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Persist a record and return its id
    async fn save(&self, record: TranscriptRecord) -> Result<RecordId, TranscriptStoreError>;

    /// All records of `user`, ordered by descending creation time
    async fn list(&self, user: &UserId) -> Result<Vec<TranscriptRecord>, TranscriptStoreError>;
}
