//! Prompt templates for the pipeline flow

use crate::confidence::ConfidenceScore;
use crate::intent::IntentDescriptor;
use crate::pipeline::Draft;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System instruction for intent extraction
    pub fn intent_system() -> &'static str {
        r#"You MUST respond ONLY with valid JSON containing the keys intent, entities, tone, length, and constraints. Do not include any text outside the JSON object. Example: {"intent": "query", "entities": [], "tone": "neutral", "length": "short", "constraints": []}"#
    }

    /// System instruction for both draft providers
    pub fn draft_system() -> &'static str {
        "You are a helpful assistant."
    }

    /// System instruction for the synthesizer
    pub fn synthesis_system() -> &'static str {
        "You are a helpful assistant."
    }

    /// Merge prompt embedding the request, its intent and both drafts
    pub fn synthesis_prompt(
        request: &str,
        intent: &IntentDescriptor,
        candidate_a: &Draft,
        candidate_b: &Draft,
    ) -> String {
        format!(
            r#"
### USER REQUEST
{request}
---
### USER INTENT
{intent}
---
### CANDIDATE A ({a_source})
{a_text}
---
### CANDIDATE B ({b_source})
{b_text}
---
Merge into a single best answer. Then output {{"confidence":0-1}} on a new line."#,
            intent = intent.to_pretty_json(),
            a_source = candidate_a.source_provider_id,
            a_text = candidate_a.text,
            b_source = candidate_b.source_provider_id,
            b_text = candidate_b.text,
        )
    }

    /// System instruction for the escalation provider
    pub fn escalation_system() -> &'static str {
        "You are a senior researcher."
    }

    /// Improvement request for a low-confidence answer
    pub fn escalation_prompt(confidence: ConfidenceScore, answer: &str) -> String {
        format!("Improve this low-confidence answer ({confidence}).\n\n{answer}")
    }
}
