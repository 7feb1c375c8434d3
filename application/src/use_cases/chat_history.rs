//! Chat history use case
//!
//! Records finished pipeline runs per user and lists them back newest first.

use crate::ports::transcript_store::{TranscriptStore, TranscriptStoreError};
use chrono::Utc;
use prism_domain::{PipelineResult, Prompt, TranscriptRecord, UserId};
use std::sync::Arc;
use tracing::debug;

pub struct ChatHistoryUseCase {
    store: Arc<dyn TranscriptStore>,
}

impl ChatHistoryUseCase {
    pub fn new(store: Arc<dyn TranscriptStore>) -> Self {
        Self { store }
    }

    /// Persist a successful run, stamped with the current time
    pub async fn record(
        &self,
        user: &UserId,
        prompt: &Prompt,
        result: &PipelineResult,
    ) -> Result<TranscriptRecord, TranscriptStoreError> {
        let record = TranscriptRecord::new(
            user.clone(),
            prompt.content(),
            result.clone(),
            Utc::now(),
        );
        let id = self.store.save(record.clone()).await?;
        debug!("Stored transcript {} for {}", id, user);
        Ok(record)
    }

    /// Every record of `user`, newest first
    pub async fn list(&self, user: &UserId) -> Result<Vec<TranscriptRecord>, TranscriptStoreError> {
        self.store.list(user).await
    }
}
