//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Invalid provider id: {0:?}")]
    InvalidProviderId(String),

    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),
}
