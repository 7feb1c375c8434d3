//! Application layer for prism
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{PipelineConfig, PipelineProviders, PipelineSetupError};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, ProgressNotifier},
    provider_client::{ProviderClient, ProviderError},
    transcript_store::{TranscriptStore, TranscriptStoreError},
};
pub use use_cases::chat_history::ChatHistoryUseCase;
pub use use_cases::confidence_gate::{Assessment, ConfidenceGate, ConfidenceSource, GateOutcome};
pub use use_cases::extract_intent::{IntentError, IntentExtractor};
pub use use_cases::generate_drafts::DraftGenerator;
pub use use_cases::run_pipeline::{PipelineError, RunPipelineUseCase};
pub use use_cases::synthesize::Synthesizer;
