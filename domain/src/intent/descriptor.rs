//! Intent descriptor value object

use serde::{Deserialize, Serialize};

/// Structured understanding of a user request (Value Object)
///
/// Produced once per pipeline run by the intent provider and used only as
/// context for synthesis. All five fields are required and no other fields
/// are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntentDescriptor {
    pub intent: String,
    pub entities: Vec<String>,
    pub tone: String,
    pub length: String,
    pub constraints: Vec<String>,
}

impl IntentDescriptor {
    /// Pretty-printed JSON form embedded in the synthesis prompt.
    pub fn to_pretty_json(&self) -> String {
        // Serializing plain strings and vectors cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
