//! Pipeline entities: the stages of a run and its linear state machine.
//!
//! ```text
//! Start → IntentExtracted → DraftsReady → Synthesized ─┬─→ Done
//!                                                      └─→ Escalated → Done
//! (any stage) ──failure──→ Failed(stage)
//! ```

use serde::{Deserialize, Serialize};

/// A unit of work within a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Intent extraction by the fast provider
    Intent,
    /// Two concurrent draft calls
    Drafts,
    /// Merge of both drafts
    Synthesis,
    /// Low-confidence improvement pass
    Escalation,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Intent => "intent",
            Stage::Drafts => "drafts",
            Stage::Synthesis => "synthesis",
            Stage::Escalation => "escalation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Intent => "Intent Extraction",
            Stage::Drafts => "Draft Generation",
            Stage::Synthesis => "Synthesis",
            Stage::Escalation => "Escalation",
        }
    }

    /// Number of provider calls the stage issues
    pub fn task_count(&self) -> usize {
        match self {
            Stage::Drafts => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// State of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Start,
    IntentExtracted,
    DraftsReady,
    Synthesized,
    Escalated,
    Done,
    /// Terminal failure while running the given stage
    Failed(Stage),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }

    /// The stage that may run next from this state, if any
    pub fn next_stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Start => Some(Stage::Intent),
            PipelineState::IntentExtracted => Some(Stage::Drafts),
            PipelineState::DraftsReady => Some(Stage::Synthesis),
            PipelineState::Synthesized => Some(Stage::Escalation),
            _ => None,
        }
    }
}

/// Tracks the progress of a single pipeline run (Entity)
///
/// Stages can only complete in order; no state is revisited.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    state: PipelineState,
}

impl PipelineRun {
    pub fn new() -> Self {
        Self {
            state: PipelineState::Start,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Record that `stage` finished successfully.
    ///
    /// Returns the new state, or `None` if `stage` is not the one expected
    /// next (the state is left unchanged).
    pub fn complete(&mut self, stage: Stage) -> Option<PipelineState> {
        if self.state.next_stage() != Some(stage) {
            return None;
        }
        self.state = match stage {
            Stage::Intent => PipelineState::IntentExtracted,
            Stage::Drafts => PipelineState::DraftsReady,
            Stage::Synthesis => PipelineState::Synthesized,
            Stage::Escalation => PipelineState::Escalated,
        };
        Some(self.state)
    }

    /// Mark the run as done. Valid after synthesis or escalation.
    pub fn finish(&mut self) -> bool {
        match self.state {
            PipelineState::Synthesized | PipelineState::Escalated => {
                self.state = PipelineState::Done;
                true
            }
            _ => false,
        }
    }

    /// Mark the run as failed while running `stage`.
    pub fn fail(&mut self, stage: Stage) {
        if !self.state.is_terminal() {
            self.state = PipelineState::Failed(stage);
        }
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_run_without_escalation() {
        let mut run = PipelineRun::new();
        assert_eq!(run.complete(Stage::Intent), Some(PipelineState::IntentExtracted));
        assert_eq!(run.complete(Stage::Drafts), Some(PipelineState::DraftsReady));
        assert_eq!(run.complete(Stage::Synthesis), Some(PipelineState::Synthesized));
        assert!(run.finish());
        assert_eq!(run.state(), PipelineState::Done);
    }

    #[test]
    fn test_run_with_escalation() {
        let mut run = PipelineRun::new();
        run.complete(Stage::Intent);
        run.complete(Stage::Drafts);
        run.complete(Stage::Synthesis);
        assert_eq!(run.complete(Stage::Escalation), Some(PipelineState::Escalated));
        assert!(run.finish());
    }

    #[test]
    fn test_out_of_order_is_rejected() {
        let mut run = PipelineRun::new();
        assert_eq!(run.complete(Stage::Drafts), None);
        assert_eq!(run.state(), PipelineState::Start);
        assert!(!run.finish());

        run.complete(Stage::Intent);
        assert_eq!(run.complete(Stage::Intent), None);
    }

    #[test]
    fn test_failure_is_terminal() {
        let mut run = PipelineRun::new();
        run.complete(Stage::Intent);
        run.fail(Stage::Drafts);
        assert_eq!(run.state(), PipelineState::Failed(Stage::Drafts));
        assert!(run.state().is_terminal());
        assert_eq!(run.complete(Stage::Drafts), None);

        run.fail(Stage::Synthesis);
        assert_eq!(run.state(), PipelineState::Failed(Stage::Drafts));
    }

    #[test]
    fn test_stage_task_counts() {
        assert_eq!(Stage::Drafts.task_count(), 2);
        assert_eq!(Stage::Intent.task_count(), 1);
    }
}
