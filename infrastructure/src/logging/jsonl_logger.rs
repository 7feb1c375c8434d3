//! JSONL conversation log for pipeline runs.
//!
//! One line per [`ConversationEvent`]. Every line carries the run id, a
//! sequence number within the run and the milliseconds since the run
//! started, so several runs appended to the same file can be separated and
//! read back in order:
//!
//! ```text
//! {"run":"6f1c…","seq":0,"type":"intent_extracted","timestamp":"…","elapsed_ms":412,"provider":"groq","intent":{…}}
//! {"run":"6f1c…","seq":1,"type":"draft","timestamp":"…","elapsed_ms":1980,"provider":"gemini-flash",…}
//! ```
//!
//! Object payloads are flattened into the line; anything else lands under
//! `data`.

use prism_application::{ConversationEvent, ConversationLogger};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

/// Keys owned by the line envelope; payload keys with these names are dropped.
const ENVELOPE_KEYS: [&str; 5] = ["run", "seq", "type", "timestamp", "elapsed_ms"];

#[derive(Debug, Serialize)]
struct LogLine<'a> {
    run: &'a str,
    seq: u64,
    #[serde(rename = "type")]
    event_type: &'a str,
    timestamp: String,
    elapsed_ms: u64,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

struct RunWriter {
    out: BufWriter<File>,
    next_seq: u64,
}

/// Appends the events of one pipeline run to a JSONL file.
pub struct JsonlConversationLogger {
    writer: Mutex<RunWriter>,
    run_id: String,
    started: Instant,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for appending under a fresh run id.
    ///
    /// Creates parent directories as needed. Returns `None` (after a warning)
    /// when the file cannot be opened; a missing conversation log never stops
    /// a run.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open conversation log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(RunWriter {
                out: BufWriter::new(file),
                next_seq: 0,
            }),
            run_id: Uuid::new_v4().to_string(),
            started: Instant::now(),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id stamped on every line written by this logger
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn fields(payload: Value) -> Map<String, Value> {
        match payload {
            Value::Object(mut map) => {
                for key in ENVELOPE_KEYS {
                    map.remove(key);
                }
                map
            }
            Value::Null => Map::new(),
            other => Map::from_iter([("data".to_string(), other)]),
        }
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };

        let line = LogLine {
            run: &self.run_id,
            seq: writer.next_seq,
            event_type: event.event_type,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            elapsed_ms: self.started.elapsed().as_millis() as u64,
            fields: Self::fields(event.payload),
        };
        let Ok(json) = serde_json::to_string(&line) else {
            return;
        };

        writer.next_seq += 1;
        let _ = writeln!(writer.out, "{}", json);
        // A crash mid-run must not lose earlier stages
        let _ = writer.out.flush();
    }
}
