//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod chat_history;
pub mod confidence_gate;
pub mod extract_intent;
pub mod generate_drafts;
pub mod run_pipeline;
pub mod synthesize;
