//! Application-level configuration.
//!
//! - [`PipelineConfig`]: escalation switch and confidence policy
//! - [`PipelineProviders`]: the provider client filling each pipeline role

pub mod pipeline_config;

pub use pipeline_config::{PipelineConfig, PipelineProviders, PipelineSetupError};
