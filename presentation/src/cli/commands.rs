//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for pipeline results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Answer,
    /// Both drafts, the final answer and its confidence
    Full,
    /// JSON output
    Json,
}

impl From<prism_domain::OutputFormat> for OutputFormat {
    fn from(format: prism_domain::OutputFormat) -> Self {
        match format {
            prism_domain::OutputFormat::Answer => OutputFormat::Answer,
            prism_domain::OutputFormat::Full => OutputFormat::Full,
            prism_domain::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for prism
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about = "Answer a prompt with two drafts, a merge and a confidence check")]
#[command(long_about = r#"
Prism answers a prompt by combining several language-model providers.

The pipeline has four stages:
1. Intent: a fast model summarizes what you are asking for as JSON
2. Drafts: two providers answer your prompt concurrently
3. Synthesis: a third provider merges both drafts and rates its confidence
4. Escalation: low-confidence answers go to a stronger model (if enabled)

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./prism.toml        Project-level config
3. ~/.config/prism/config.toml   Global config
4. PRISM_* environment variables (e.g. PRISM_PIPELINE__ESCALATION_ENABLED=true)

Example:
  prism "Summarize photosynthesis in one sentence."
  prism --escalate -o full "Compare TCP and QUIC congestion control"
  prism --history --user alice
"#)]
pub struct Cli {
    /// The prompt to answer (read from stdin when omitted)
    pub prompt: Option<String>,

    /// User the answer is recorded for
    #[arg(short, long, env = "PRISM_USER", default_value = "local")]
    pub user: String,

    /// Output format (overrides `output.format` from config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Escalate low-confidence answers
    #[arg(long, conflicts_with = "no_escalate")]
    pub escalate: bool,

    /// Never escalate, even if enabled in config
    #[arg(long)]
    pub no_escalate: bool,

    /// List past answers for the user, newest first, and exit
    #[arg(long)]
    pub history: bool,

    /// Maximum number of history entries to show
    #[arg(long, value_name = "N", requires = "history")]
    pub limit: Option<usize>,

    /// Do not record this answer in the user's history
    #[arg(long)]
    pub no_save: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Append every stage's inputs and outputs to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}

impl Cli {
    /// `Some(enabled)` when an escalation flag was given
    pub fn escalation_override(&self) -> Option<bool> {
        match (self.escalate, self.no_escalate) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
