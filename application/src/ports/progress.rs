//! Progress notification port
//!
//! Defines the interface for reporting progress during a pipeline run.

use prism_domain::{ProviderId, Stage};

/// Callback for progress updates during a pipeline run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage, total_tasks: usize);

    /// Called when a provider call within a stage finishes
    fn on_task_complete(&self, stage: Stage, provider: &ProviderId, success: bool);

    /// Called when a stage completes successfully
    fn on_stage_complete(&self, stage: Stage);

    /// Called when the gate decides on escalation (`true` = escalating)
    fn on_escalation_decision(&self, _confidence: f64, _escalate: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
    fn on_task_complete(&self, _stage: Stage, _provider: &ProviderId, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
