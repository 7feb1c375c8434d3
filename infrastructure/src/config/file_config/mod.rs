//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod output;
mod pipeline;
mod providers;

pub use output::{FileOutputConfig, FileOutputFormat};
pub use pipeline::{FileConfidenceConfig, FilePipelineConfig};
pub use providers::{FileProviderConfig, builtin_providers};

use super::error::ConfigValidationError;
use prism_domain::ProviderRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Role assignments and confidence settings
    pub pipeline: FilePipelineConfig,
    /// Named provider endpoints, merged over the built-in set
    pub providers: BTreeMap<String, FileProviderConfig>,
    /// Output settings
    pub output: FileOutputConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            pipeline: FilePipelineConfig::default(),
            providers: builtin_providers(),
            output: FileOutputConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// API keys are not checked here; they are resolved when the provider
    /// clients are built.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        // 1. Every role names a configured provider
        for role in ProviderRole::ALL {
            let name = self.pipeline.role(role);
            if !self.providers.contains_key(name) {
                issues.push(ConfigValidationError::UnknownProvider {
                    role: role.as_str(),
                    name: name.to_string(),
                });
            }
        }

        // 2. Drafts come from two different providers
        if self.pipeline.draft_a == self.pipeline.draft_b {
            issues.push(ConfigValidationError::DuplicateDraftProvider(
                self.pipeline.draft_a.clone(),
            ));
        }

        // 3. Confidence values are probabilities
        let confidence = &self.pipeline.confidence;
        for (field, value) in [
            ("threshold", confidence.threshold),
            ("default", confidence.default),
            ("escalated", confidence.escalated),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigValidationError::OutOfRange { field, value });
            }
        }

        if self.pipeline.request_timeout_secs == 0 {
            issues.push(ConfigValidationError::ZeroTimeout);
        }

        // 4. Provider tables are usable
        for (name, provider) in &self.providers {
            if provider.endpoint.trim().is_empty() {
                issues.push(ConfigValidationError::EmptyField {
                    provider: name.clone(),
                    field: "endpoint",
                });
            }
            if provider.model.trim().is_empty() {
                issues.push(ConfigValidationError::EmptyField {
                    provider: name.clone(),
                    field: "model",
                });
            }
        }

        issues
    }
}
