//! Console output formatter for pipeline results

use colored::Colorize;
use prism_domain::{ConfidencePolicy, PipelineResult, TranscriptRecord};

/// Formats pipeline results and history for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colored output on or off, regardless of terminal detection
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format the complete result: both drafts, the final answer and the
    /// confidence line, highlighted when `policy` considers it low
    pub fn format_full(
        prompt: &str,
        result: &PipelineResult,
        policy: &ConfidencePolicy,
    ) -> String {
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("Prism"));
        output.push('\n');

        // Prompt
        output.push_str(&format!("{} {}\n", "Prompt:".cyan().bold(), prompt));

        // Drafts
        output.push_str(&Self::section_header("Drafts"));
        for (provider, text) in [
            (&result.flash_provider, &result.flash_draft),
            (&result.turbo_provider, &result.turbo_draft),
        ] {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", provider).yellow().bold(),
                text
            ));
        }

        // Final answer
        output.push_str(&Self::section_header("Final Answer"));
        output.push_str(&format!("\n{}\n\n", result.final_answer));
        output.push_str(&Self::confidence_line(result, policy));
        output.push('\n');

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &PipelineResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    pub fn format_answer(result: &PipelineResult) -> String {
        result.final_answer.clone()
    }

    /// Format a user's history, newest first
    pub fn format_history(records: &[TranscriptRecord], policy: &ConfidencePolicy) -> String {
        if records.is_empty() {
            return format!("{}\n", "No history yet.".dimmed());
        }

        let mut output = String::new();
        for record in records {
            output.push_str(&format!(
                "{} {}\n",
                record
                    .created_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .dimmed(),
                record.prompt.bold()
            ));
            output.push_str(&Self::indent(&record.result.final_answer, "    "));
            output.push_str(&format!("\n    {}\n\n", Self::confidence_line(&record.result, policy)));
        }
        output
    }

    /// Format history records as a JSON array
    pub fn format_history_json(records: &[TranscriptRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }

    /// An escalated answer is never shown as low
    fn is_low(result: &PipelineResult, policy: &ConfidencePolicy) -> bool {
        !result.escalated && policy.is_low(result.confidence)
    }

    fn confidence_line(result: &PipelineResult, policy: &ConfidencePolicy) -> String {
        let value = format!("{:.2}", result.confidence.value());
        let value = if result.escalated {
            format!("{} (escalated)", value).green()
        } else if Self::is_low(result, policy) {
            value.yellow()
        } else {
            value.green()
        };
        format!("{} {}", "Confidence:".dimmed(), value)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
