//! Infrastructure layer for prism
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod history;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig,
    FileOutputFormat, FilePipelineConfig, FileProviderConfig,
};
pub use history::JsonlTranscriptStore;
pub use logging::JsonlConversationLogger;
pub use providers::{
    ChatCompletionsClient, GenerativeLanguageClient, ProviderEndpoint, ProviderFamily,
    ProviderRegistry,
};
