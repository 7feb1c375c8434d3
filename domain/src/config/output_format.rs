//! Output format value object

use serde::{Deserialize, Serialize};

/// How a pipeline result is rendered for the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the final answer (default)
    #[default]
    Answer,
    /// Both drafts, the final answer and the confidence line
    Full,
    /// The result envelope as JSON
    Json,
}
