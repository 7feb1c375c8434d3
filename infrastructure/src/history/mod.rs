//! Transcript persistence
//!
//! Provides [`JsonlTranscriptStore`], an append-only JSONL file per user that
//! implements the [`TranscriptStore`](prism_application::TranscriptStore) port.

mod jsonl_store;

pub use jsonl_store::JsonlTranscriptStore;
