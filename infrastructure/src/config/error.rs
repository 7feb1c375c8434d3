//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// A single problem found by [`FileConfig::validate`](super::FileConfig::validate)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("pipeline.{role}: unknown provider '{name}'")]
    UnknownProvider { role: &'static str, name: String },

    #[error("pipeline.draft_a and pipeline.draft_b both name '{0}'; drafts need two providers")]
    DuplicateDraftProvider(String),

    #[error("pipeline.confidence.{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("pipeline.request_timeout_secs cannot be 0")]
    ZeroTimeout,

    #[error("providers.{provider}.{field} cannot be empty")]
    EmptyField {
        provider: String,
        field: &'static str,
    },
}

/// Errors raised while loading configuration or building provider clients
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {}", join_issues(.0))]
    Invalid(Vec<ConfigValidationError>),

    #[error(
        "No API key for provider '{provider}' (set {} or providers.{provider}.api_key)",
        .env.as_deref().unwrap_or("an api_key_env variable")
    )]
    MissingApiKey {
        provider: String,
        env: Option<String>,
    },

    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("Invalid provider name '{0}'")]
    InvalidProviderName(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

fn join_issues(issues: &[ConfigValidationError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
