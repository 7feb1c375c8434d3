//! JSONL transcript store.
//!
//! Each user gets `<dir>/<user>.jsonl`; every saved [`TranscriptRecord`] is
//! one line. Lines that fail to parse (for example a write cut short by a
//! crash) are skipped with a warning.

use async_trait::async_trait;
use prism_application::{TranscriptStore, TranscriptStoreError};
use prism_domain::{RecordId, TranscriptRecord, UserId};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct JsonlTranscriptStore {
    dir: PathBuf,
    // Serializes appends so concurrent saves never interleave lines.
    write_lock: Mutex<()>,
}

impl JsonlTranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `$XDG_DATA_HOME/prism/history` (or the platform data directory)
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("prism").join("history"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, user: &UserId) -> PathBuf {
        self.dir.join(format!("{}.jsonl", user.as_str()))
    }
}

#[async_trait]
impl TranscriptStore for JsonlTranscriptStore {
    async fn save(&self, record: TranscriptRecord) -> Result<RecordId, TranscriptStoreError> {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&record.user_id);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!("Appended transcript {} to {}", record.id, path.display());
        Ok(record.id)
    }

    async fn list(&self, user: &UserId) -> Result<Vec<TranscriptRecord>, TranscriptStoreError> {
        let path = self.path_for(user);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records: Vec<TranscriptRecord> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping line {} of {}: {}", index + 1, path.display(), e);
                    None
                }
            })
            .collect();

        // Newest first; later lines win ties.
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
