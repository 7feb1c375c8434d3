//! Chat history domain: finished runs as persisted by the transcript store.

pub mod record;

pub use record::{RecordId, TranscriptRecord, UserId};
