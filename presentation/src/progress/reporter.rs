//! Progress reporting for pipeline execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use prism_application::{NoProgress, ProgressNotifier};
use prism_domain::{ProviderId, Stage};
use std::sync::Mutex;

/// Reports progress during a pipeline run with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_label(stage: Stage) -> String {
        let number = match stage {
            Stage::Intent => 1,
            Stage::Drafts => 2,
            Stage::Synthesis => 3,
            Stage::Escalation => 4,
        };
        format!("Stage {}: {}", number, stage.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_label(stage));
        pb.set_message("Starting...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        if let Ok(mut slot) = self.stage_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _stage: Stage, provider: &ProviderId, success: bool) {
        if let Ok(slot) = self.stage_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), provider)
            } else {
                format!("{} {}", "x".red(), provider)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: Stage) {
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} complete!", stage.display_name().green()));
        }
    }

    fn on_escalation_decision(&self, confidence: f64, escalate: bool) {
        if escalate {
            let _ = self.multi.println(format!(
                "{} confidence {:.2} is low, escalating",
                "!".yellow(),
                confidence
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so piped stdout stays clean.
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::stage_label(stage).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _stage: Stage, provider: &ProviderId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), provider);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), provider);
        }
    }

    fn on_stage_complete(&self, _stage: Stage) {
        eprintln!();
    }

    fn on_escalation_decision(&self, confidence: f64, escalate: bool) {
        if escalate {
            eprintln!(
                "{} confidence {:.2} is low, escalating",
                "!".yellow(),
                confidence
            );
        }
    }
}

/// Which progress display a run gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Spinner and bar per stage (interactive stderr)
    Bars,
    /// One plain line per event (redirected stderr)
    Lines,
    Off,
}

impl ProgressMode {
    pub fn select(show_progress: bool, quiet: bool, stderr_is_terminal: bool) -> Self {
        match (show_progress && !quiet, stderr_is_terminal) {
            (false, _) => ProgressMode::Off,
            (true, true) => ProgressMode::Bars,
            (true, false) => ProgressMode::Lines,
        }
    }

    pub fn notifier(self) -> Box<dyn ProgressNotifier> {
        match self {
            ProgressMode::Bars => Box::new(ProgressReporter::new()),
            ProgressMode::Lines => Box::new(SimpleProgress),
            ProgressMode::Off => Box::new(NoProgress),
        }
    }
}
