//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording pipeline events
//! (intent, drafts, synthesis, confidence decisions, escalation) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! stage payloads in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured pipeline event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "intent_extracted", "draft", "synthesis").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging pipeline events to a structured log.
///
/// The `log` method is synchronous and non-fallible; logging failures are
/// ignored so they never fail a request.
pub trait ConversationLogger: Send + Sync {
    /// Record a pipeline event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
