//! Core domain concepts shared across all subdomains.
//!
//! - [`prompt::Prompt`]: a validated user request submitted to the pipeline
//! - [`provider::ProviderId`]: the name a provider is configured under
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod prompt;
pub mod provider;
