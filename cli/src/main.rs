//! CLI entrypoint for prism
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use prism_application::{ChatHistoryUseCase, PipelineError, RunPipelineUseCase};
use prism_domain::{Prompt, UserId};
use prism_infrastructure::{
    ConfigError, ConfigLoader, FileConfig, JsonlConversationLogger, JsonlTranscriptStore,
    ProviderRegistry,
};
use prism_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressMode};
use std::io::{IsTerminal, Read};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&cli)?;

    info!("Starting prism");

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let mut config = load_config(&cli)?;
    if let Some(enabled) = cli.escalation_override() {
        config.pipeline.escalation_enabled = enabled;
    }
    let issues = config.validate();
    if !issues.is_empty() {
        return Err(ConfigError::Invalid(issues).into());
    }

    if !config.output.color {
        ConsoleFormatter::set_color(false);
    }
    let format = cli
        .output
        .or(config.output.format.map(OutputFormat::from))
        .unwrap_or(OutputFormat::Answer);

    let policy = config.pipeline.confidence.to_policy();

    let user = UserId::new(cli.user.as_str()).context("Invalid --user")?;
    let history_dir =
        JsonlTranscriptStore::default_dir().context("Could not determine the data directory")?;
    let history = ChatHistoryUseCase::new(Arc::new(JsonlTranscriptStore::new(history_dir)));

    // History mode
    if cli.history {
        let mut records = history.list(&user).await?;
        if let Some(limit) = cli.limit {
            records.truncate(limit);
        }
        let output = match format {
            OutputFormat::Json => ConsoleFormatter::format_history_json(&records),
            OutputFormat::Answer | OutputFormat::Full => {
                ConsoleFormatter::format_history(&records, &policy)
            }
        };
        println!("{}", output.trim_end());
        return Ok(());
    }

    // Single prompt mode
    let prompt = Prompt::new(read_prompt(cli.prompt.as_deref())?).map_err(PipelineError::from)?;

    // === Dependency Injection ===
    let registry = ProviderRegistry::new(&config)?;
    let providers = registry.pipeline_providers(&config.pipeline)?;
    let mut use_case = RunPipelineUseCase::new(providers, config.pipeline.to_pipeline_config())?;

    if let Some(path) = &cli.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!(
                    "Conversation log: {} (run {})",
                    logger.path().display(),
                    logger.run_id()
                );
                use_case = use_case.with_logger(Arc::new(logger));
            }
            None => warn!("Conversation logging disabled"),
        }
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight requests");
                cancel.cancel();
            }
        });
    }

    // Execute with or without progress reporting
    let progress = ProgressMode::select(
        config.output.show_progress,
        cli.quiet,
        std::io::stderr().is_terminal(),
    )
    .notifier();

    let result = use_case
        .execute_with_progress(&prompt, progress.as_ref(), &cancel)
        .await?;
    drop(progress);

    if !cli.no_save {
        match history.record(&user, &prompt, &result).await {
            Ok(record) => debug!("Saved transcript {}", record.id),
            Err(e) => warn!("Could not save history: {}", e),
        }
    }

    // Output results
    let output = match format {
        OutputFormat::Answer => ConsoleFormatter::format_answer(&result),
        OutputFormat::Full => ConsoleFormatter::format_full(prompt.content(), &result, &policy),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(())
}

fn env_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    }
}

/// Console logs go to stderr; `--log-dir` adds a daily-rotated file.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "prism.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter(cli.verbose.max(1)));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(cli.verbose));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<FileConfig, ConfigError> {
    if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
}

/// The prompt argument, or all of stdin when it is piped in
fn read_prompt(arg: Option<&str>) -> Result<String> {
    if let Some(prompt) = arg {
        return Ok(prompt.to_string());
    }
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("A prompt is required. Pass it as an argument or pipe it on stdin.");
    }
    let mut prompt = String::new();
    stdin
        .read_to_string(&mut prompt)
        .context("Failed to read prompt from stdin")?;
    Ok(prompt.trim_end_matches(['\r', '\n']).to_string())
}
