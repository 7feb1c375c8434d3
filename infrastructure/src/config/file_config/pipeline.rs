//! Pipeline configuration from TOML (`[pipeline]` section)

use prism_application::PipelineConfig;
use prism_domain::{ConfidencePolicy, ProviderRole};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw `[pipeline]` table: role assignments and behavior switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Send low-confidence answers to the escalation provider
    pub escalation_enabled: bool,
    /// Deadline for a single provider request
    pub request_timeout_secs: u64,
    /// Provider names per role (keys of `[providers]`)
    pub intent: String,
    pub draft_a: String,
    pub draft_b: String,
    pub synthesizer: String,
    pub escalation: String,
    pub confidence: FileConfidenceConfig,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            escalation_enabled: false,
            request_timeout_secs: 60,
            intent: "groq".to_string(),
            draft_a: "gemini-flash".to_string(),
            draft_b: "gpt-4o".to_string(),
            synthesizer: "grok".to_string(),
            escalation: "gpt-4o".to_string(),
            confidence: FileConfidenceConfig::default(),
        }
    }
}

impl FilePipelineConfig {
    /// Provider name assigned to `role`
    pub fn role(&self, role: ProviderRole) -> &str {
        match role {
            ProviderRole::Intent => &self.intent,
            ProviderRole::DraftA => &self.draft_a,
            ProviderRole::DraftB => &self.draft_b,
            ProviderRole::Synthesizer => &self.synthesizer,
            ProviderRole::Escalation => &self.escalation,
        }
    }

    /// Roles that need a working client for a run
    ///
    /// The escalation role only counts when escalation is enabled.
    pub fn active_roles(&self) -> impl Iterator<Item = ProviderRole> + '_ {
        ProviderRole::ALL
            .into_iter()
            .filter(|role| *role != ProviderRole::Escalation || self.escalation_enabled)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_escalation(self.escalation_enabled)
            .with_confidence(self.confidence.to_policy())
    }
}

/// Raw `[pipeline.confidence]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfidenceConfig {
    /// Scores strictly below this are low
    pub threshold: f64,
    /// Score used when the synthesizer reports none
    pub default: f64,
    /// Score assigned after escalation
    pub escalated: f64,
}

impl Default for FileConfidenceConfig {
    fn default() -> Self {
        Self {
            threshold: ConfidencePolicy::DEFAULT_THRESHOLD,
            default: ConfidencePolicy::DEFAULT_FALLBACK,
            escalated: ConfidencePolicy::DEFAULT_ESCALATED,
        }
    }
}

impl FileConfidenceConfig {
    pub fn to_policy(&self) -> ConfidencePolicy {
        ConfidencePolicy::new(self.threshold, self.default, self.escalated)
    }
}
