//! Run Pipeline use case
//!
//! Sequences the four stages of a request:
//!
//! ```text
//! prompt → intent → (draft A ∥ draft B) → synthesis → confidence gate → result
//! ```
//!
//! No stage is retried and there is no cross-stage fallback: the first
//! failure ends the run with an error naming the stage and provider.

use crate::config::{PipelineConfig, PipelineProviders, PipelineSetupError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::provider_client::ProviderError;
use crate::use_cases::confidence_gate::ConfidenceGate;
use crate::use_cases::extract_intent::{IntentError, IntentExtractor};
use crate::use_cases::generate_drafts::DraftGenerator;
use crate::use_cases::synthesize::Synthesizer;
use prism_domain::{DomainError, PipelineResult, PipelineRun, Prompt, ProviderId, Stage};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a pipeline run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Intent extraction failed: {0}")]
    Intent(IntentError),

    #[error("Draft generation failed: {0}")]
    Drafts(ProviderError),

    #[error("Synthesis failed: {0}")]
    Synthesis(ProviderError),

    #[error("Escalation failed: {0}")]
    Escalation(ProviderError),

    #[error("Cancelled during {0}")]
    Cancelled(Stage),

    #[error("Invalid prompt: {0}")]
    InvalidPrompt(#[from] DomainError),
}

impl PipelineError {
    /// Wrap a provider failure from `stage`, folding cancellations.
    fn at(stage: Stage, err: ProviderError) -> Self {
        if err.is_cancelled() {
            return PipelineError::Cancelled(stage);
        }
        match stage {
            Stage::Intent => PipelineError::Intent(IntentError::Provider(err)),
            Stage::Drafts => PipelineError::Drafts(err),
            Stage::Synthesis => PipelineError::Synthesis(err),
            Stage::Escalation => PipelineError::Escalation(err),
        }
    }

    fn from_intent(err: IntentError) -> Self {
        match err {
            IntentError::Provider(e) => Self::at(Stage::Intent, e),
            parse => PipelineError::Intent(parse),
        }
    }

    /// The stage that was running when the error occurred
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Intent(_) | PipelineError::InvalidPrompt(_) => Stage::Intent,
            PipelineError::Drafts(_) => Stage::Drafts,
            PipelineError::Synthesis(_) => Stage::Synthesis,
            PipelineError::Escalation(_) => Stage::Escalation,
            PipelineError::Cancelled(stage) => *stage,
        }
    }

    /// The provider whose call failed, if a provider call failed
    pub fn provider(&self) -> Option<&ProviderId> {
        match self {
            PipelineError::Intent(IntentError::Provider(e))
            | PipelineError::Drafts(e)
            | PipelineError::Synthesis(e)
            | PipelineError::Escalation(e) => Some(e.provider()),
            PipelineError::Intent(IntentError::Parse(_))
            | PipelineError::Cancelled(_)
            | PipelineError::InvalidPrompt(_) => None,
        }
    }

    pub fn is_intent_parse(&self) -> bool {
        matches!(self, PipelineError::Intent(IntentError::Parse(_)))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled(_))
    }
}

/// Use case for answering one prompt
pub struct RunPipelineUseCase {
    extractor: IntentExtractor,
    drafts: DraftGenerator,
    synthesizer: Synthesizer,
    gate: ConfidenceGate,
    config: PipelineConfig,
    logger: Arc<dyn ConversationLogger>,
}

impl RunPipelineUseCase {
    pub fn new(
        providers: PipelineProviders,
        config: PipelineConfig,
    ) -> Result<Self, PipelineSetupError> {
        providers.validate(&config)?;
        info!("Pipeline providers: {:?}", providers);

        Ok(Self {
            extractor: IntentExtractor::new(providers.intent),
            drafts: DraftGenerator::new(providers.draft_a, providers.draft_b),
            synthesizer: Synthesizer::new(providers.synthesizer),
            gate: ConfidenceGate::new(config.confidence, providers.escalation),
            config,
            logger: Arc::new(NoConversationLogger),
        })
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress and no cancellation
    pub async fn execute(&self, prompt: &Prompt) -> Result<PipelineResult, PipelineError> {
        self.execute_with_progress(prompt, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Validate raw prompt text, then run the pipeline on it
    ///
    /// Blank input fails with [`PipelineError::InvalidPrompt`] before any
    /// provider is called.
    pub async fn answer(
        &self,
        raw_prompt: &str,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<PipelineResult, PipelineError> {
        let prompt = Prompt::new(raw_prompt)?;
        self.execute_with_progress(&prompt, progress, cancel).await
    }

    /// Execute the use case with progress callbacks and a cancellation token
    pub async fn execute_with_progress(
        &self,
        prompt: &Prompt,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<PipelineResult, PipelineError> {
        let mut run = PipelineRun::new();
        let result = self.run_stages(&mut run, prompt, progress, cancel).await;

        if let Err(e) = &result {
            run.fail(e.stage());
            warn!("Pipeline failed during {}: {}", e.stage(), e);
            self.logger.log(ConversationEvent::new(
                "pipeline_failed",
                json!({
                    "stage": e.stage().as_str(),
                    "provider": e.provider().map(|p| p.as_str()),
                    "error": e.to_string(),
                }),
            ));
        }
        debug!("Pipeline finished in state {:?}", run.state());
        result
    }

    async fn run_stages(
        &self,
        run: &mut PipelineRun,
        prompt: &Prompt,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<PipelineResult, PipelineError> {
        // Stage 1: Intent
        Self::check_cancelled(Stage::Intent, cancel)?;
        info!("Stage 1: {}", Stage::Intent);
        progress.on_stage_start(Stage::Intent, Stage::Intent.task_count());

        let intent_provider = self.extractor.provider().id().clone();
        let intent = self.extractor.extract(prompt, cancel).await;
        progress.on_task_complete(Stage::Intent, &intent_provider, intent.is_ok());
        let intent = intent.map_err(PipelineError::from_intent)?;

        progress.on_stage_complete(Stage::Intent);
        run.complete(Stage::Intent);
        self.logger.log(ConversationEvent::new(
            "intent_extracted",
            json!({ "provider": intent_provider, "intent": intent }),
        ));

        // Stage 2: Drafts
        Self::check_cancelled(Stage::Drafts, cancel)?;
        info!("Stage 2: {}", Stage::Drafts);
        progress.on_stage_start(Stage::Drafts, Stage::Drafts.task_count());

        let (flash, turbo) = self
            .drafts
            .generate(prompt, progress, cancel)
            .await
            .map_err(|e| PipelineError::at(Stage::Drafts, e))?;

        progress.on_stage_complete(Stage::Drafts);
        run.complete(Stage::Drafts);
        for draft in [&flash, &turbo] {
            self.logger.log(ConversationEvent::new(
                "draft",
                json!({
                    "provider": draft.source_provider_id,
                    "bytes": draft.text.len(),
                    "text": draft.text,
                }),
            ));
        }

        // Stage 3: Synthesis
        Self::check_cancelled(Stage::Synthesis, cancel)?;
        info!("Stage 3: {}", Stage::Synthesis);
        progress.on_stage_start(Stage::Synthesis, Stage::Synthesis.task_count());

        let synthesizer = self.synthesizer.provider().id().clone();
        let synthesis = self
            .synthesizer
            .synthesize(prompt, &intent, &flash, &turbo, cancel)
            .await;
        progress.on_task_complete(Stage::Synthesis, &synthesizer, synthesis.is_ok());
        let synthesis = synthesis.map_err(|e| PipelineError::at(Stage::Synthesis, e))?;

        progress.on_stage_complete(Stage::Synthesis);
        run.complete(Stage::Synthesis);
        self.logger.log(ConversationEvent::new(
            "synthesis",
            json!({
                "provider": synthesis.synthesizer,
                "annotation": synthesis.raw_confidence_annotation(),
                "text": synthesis.raw_text,
            }),
        ));

        // Stage 4: Confidence gate (escalation is conditional)
        let assessment = self
            .gate
            .assess(&synthesis.raw_text, self.config.escalation_enabled);
        let escalate = assessment.escalate;
        progress.on_escalation_decision(assessment.reported.value(), escalate);
        self.logger.log(ConversationEvent::new(
            "confidence",
            json!({
                "value": assessment.reported.value(),
                "source": assessment.source.as_str(),
                "escalate": escalate,
            }),
        ));

        if escalate {
            Self::check_cancelled(Stage::Escalation, cancel)?;
            info!("Stage 4: {}", Stage::Escalation);
            progress.on_stage_start(Stage::Escalation, Stage::Escalation.task_count());
        }

        let outcome = self.gate.resolve(assessment, cancel).await;

        if escalate && let Some(escalator) = self.gate.escalation_provider() {
            progress.on_task_complete(Stage::Escalation, escalator.id(), outcome.is_ok());
        }
        let outcome = outcome.map_err(|e| PipelineError::at(Stage::Escalation, e))?;

        if outcome.escalated {
            progress.on_stage_complete(Stage::Escalation);
            run.complete(Stage::Escalation);
            self.logger.log(ConversationEvent::new(
                "escalation",
                json!({
                    "provider": self.gate.escalation_provider().map(|p| p.id().as_str()),
                    "text": outcome.final_text,
                }),
            ));
        }

        run.finish();
        info!(
            "Pipeline complete (confidence {}, escalated: {})",
            outcome.confidence, outcome.escalated
        );

        Ok(PipelineResult::new(
            flash,
            turbo,
            outcome.final_text,
            outcome.confidence,
            outcome.escalated,
        ))
    }

    fn check_cancelled(stage: Stage, cancel: &CancellationToken) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled(stage));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedProvider;
    use std::sync::Mutex;

    const INTENT: &str = r#"{"intent":"summarize","entities":["photosynthesis"],"tone":"neutral","length":"one sentence","constraints":[]}"#;
    const PROMPT: &str = "Summarize photosynthesis in one sentence.";

    struct Doubles {
        intent: Arc<ScriptedProvider>,
        draft_a: Arc<ScriptedProvider>,
        draft_b: Arc<ScriptedProvider>,
        synthesizer: Arc<ScriptedProvider>,
        escalation: Arc<ScriptedProvider>,
    }

    impl Doubles {
        fn healthy(synthesis: &str) -> Self {
            Self {
                intent: ScriptedProvider::replying("groq", INTENT),
                draft_a: ScriptedProvider::replying(
                    "gemini-flash",
                    "Plants convert light to energy.",
                ),
                draft_b: ScriptedProvider::replying(
                    "gpt-4o",
                    "Photosynthesis turns sunlight into chemical energy.",
                ),
                synthesizer: ScriptedProvider::replying("grok", synthesis),
                escalation: ScriptedProvider::replying("gpt-4o-escalation", "Improved answer."),
            }
        }

        fn use_case(&self, escalation_enabled: bool) -> RunPipelineUseCase {
            let providers = PipelineProviders::new(
                self.intent.clone(),
                self.draft_a.clone(),
                self.draft_b.clone(),
                self.synthesizer.clone(),
            )
            .with_escalation(self.escalation.clone());
            RunPipelineUseCase::new(
                providers,
                PipelineConfig::default().with_escalation(escalation_enabled),
            )
            .unwrap()
        }
    }

    fn prompt() -> Prompt {
        Prompt::new(PROMPT).unwrap()
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<(&'static str, serde_json::Value)>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {} {}", stage.as_str(), total_tasks));
        }

        fn on_task_complete(&self, stage: Stage, provider: &ProviderId, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("task {} {} {}", stage.as_str(), provider, success));
        }

        fn on_stage_complete(&self, stage: Stage) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {}", stage.as_str()));
        }
    }

    #[tokio::test]
    async fn test_photosynthesis_scenario() {
        let doubles = Doubles::healthy(
            "Photosynthesis converts light energy into chemical energy in plants.\n{\"confidence\":0.85}",
        );
        let result = doubles.use_case(true).execute(&prompt()).await.unwrap();

        assert_eq!(result.flash_draft, "Plants convert light to energy.");
        assert_eq!(
            result.turbo_draft,
            "Photosynthesis turns sunlight into chemical energy."
        );
        assert_eq!(
            result.final_answer,
            "Photosynthesis converts light energy into chemical energy in plants."
        );
        assert_eq!(result.confidence.value(), 0.85);
        assert!(!result.escalated);
        assert_eq!(result.flash_provider.as_str(), "gemini-flash");
        assert_eq!(result.turbo_provider.as_str(), "gpt-4o");
        assert_eq!(doubles.escalation.call_count(), 0);
    }

    #[tokio::test]
    async fn test_each_stage_called_once_with_expected_inputs() {
        let doubles = Doubles::healthy("Merged.\n{\"confidence\":0.85}");
        doubles.use_case(false).execute(&prompt()).await.unwrap();

        assert_eq!(doubles.intent.calls()[0].1, PROMPT);
        assert_eq!(doubles.draft_a.calls()[0].1, PROMPT);
        assert_eq!(doubles.draft_b.calls()[0].1, PROMPT);

        let merge = &doubles.synthesizer.calls()[0].1;
        assert!(merge.contains("\"intent\": \"summarize\""));
        assert!(merge.contains("Plants convert light to energy."));
        assert!(merge.contains("Photosynthesis turns sunlight into chemical energy."));
    }

    #[tokio::test]
    async fn test_missing_annotation_defaults_to_fallback() {
        let doubles = Doubles::healthy("Merged answer with no score.");
        let result = doubles.use_case(true).execute(&prompt()).await.unwrap();
        assert_eq!(result.confidence.value(), 0.9);
        assert_eq!(result.final_answer, "Merged answer with no score.");
        assert_eq!(doubles.escalation.call_count(), 0);
    }

    #[tokio::test]
    async fn test_low_confidence_escalates_when_enabled() {
        let doubles = Doubles::healthy("Shaky answer.\n{\"confidence\": 0.42}");
        let result = doubles.use_case(true).execute(&prompt()).await.unwrap();

        assert_eq!(result.confidence.value(), 1.0);
        assert_eq!(result.final_answer, "Improved answer.");
        assert!(result.escalated);
        assert_eq!(doubles.escalation.call_count(), 1);
        assert!(doubles.escalation.calls()[0].1.contains("(0.42)"));
    }

    #[tokio::test]
    async fn test_low_confidence_kept_when_disabled() {
        let doubles = Doubles::healthy("Shaky answer.\n{\"confidence\": 0.42}");
        let result = doubles.use_case(false).execute(&prompt()).await.unwrap();

        assert_eq!(result.confidence.value(), 0.42);
        assert_eq!(result.final_answer, "Shaky answer.");
        assert!(!result.escalated);
        assert_eq!(doubles.escalation.call_count(), 0);
    }

    #[tokio::test]
    async fn test_draft_failure_skips_synthesis() {
        let doubles = Doubles::healthy("unused");
        let doubles = Doubles {
            draft_b: ScriptedProvider::failing("gpt-4o"),
            ..doubles
        };
        let err = doubles.use_case(true).execute(&prompt()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Drafts(_)));
        assert_eq!(err.stage(), Stage::Drafts);
        assert_eq!(err.provider().map(|p| p.as_str()), Some("gpt-4o"));
        assert_eq!(doubles.synthesizer.call_count(), 0);
        assert_eq!(doubles.escalation.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_json_intent_fails_before_drafts() {
        let doubles = Doubles::healthy("unused");
        let doubles = Doubles {
            intent: ScriptedProvider::replying("groq", "The user wants a summary."),
            ..doubles
        };
        let err = doubles.use_case(true).execute(&prompt()).await.unwrap_err();

        assert!(err.is_intent_parse());
        assert_eq!(err.stage(), Stage::Intent);
        assert_eq!(doubles.draft_a.call_count(), 0);
        assert_eq!(doubles.draft_b.call_count(), 0);
        assert_eq!(doubles.synthesizer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_fatal() {
        let doubles = Doubles::healthy("unused");
        let doubles = Doubles {
            synthesizer: ScriptedProvider::failing("grok"),
            ..doubles
        };
        let err = doubles.use_case(true).execute(&prompt()).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Synthesis);
        assert_eq!(doubles.escalation.call_count(), 0);
    }

    #[tokio::test]
    async fn test_escalation_failure_is_fatal() {
        let doubles = Doubles::healthy("Shaky.\n{\"confidence\":0.2}");
        let doubles = Doubles {
            escalation: ScriptedProvider::failing("gpt-4o-escalation"),
            ..doubles
        };
        let err = doubles.use_case(true).execute(&prompt()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Escalation(_)));
        assert_eq!(
            err.to_string(),
            "Escalation failed: gpt-4o-escalation: HTTP 500: internal error"
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let doubles = Doubles::healthy("unused");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = doubles
            .use_case(true)
            .execute_with_progress(&prompt(), &NoProgress, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, PipelineError::Cancelled(Stage::Intent));
        assert_eq!(doubles.intent.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_cancellation_maps_to_stage() {
        let doubles = Doubles::healthy("unused");
        let synthesizer = ScriptedProvider::shared("grok");
        synthesizer.push_err(ProviderError::Cancelled {
            provider: ProviderId::new("grok").unwrap(),
        });
        let doubles = Doubles {
            synthesizer,
            ..doubles
        };
        let err = doubles.use_case(true).execute(&prompt()).await.unwrap_err();
        assert_eq!(err, PipelineError::Cancelled(Stage::Synthesis));
    }

    #[tokio::test]
    async fn test_events_are_logged_in_order() {
        let doubles = Doubles::healthy("Shaky.\n{\"confidence\":0.3}");
        let logger = Arc::new(RecordingLogger::default());
        let use_case = doubles.use_case(true).with_logger(logger.clone());
        use_case.execute(&prompt()).await.unwrap();

        let events = logger.events.lock().unwrap();
        let types: Vec<_> = events.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            types,
            [
                "intent_extracted",
                "draft",
                "draft",
                "synthesis",
                "confidence",
                "escalation"
            ]
        );
        assert_eq!(events[4].1["value"], 0.3);
        assert_eq!(events[4].1["source"], "annotation");
        assert_eq!(events[3].1["annotation"], "{\"confidence\":0.3}");
    }

    #[tokio::test]
    async fn test_failure_is_logged() {
        let doubles = Doubles::healthy("unused");
        let doubles = Doubles {
            draft_a: ScriptedProvider::failing("gemini-flash"),
            ..doubles
        };
        let logger = Arc::new(RecordingLogger::default());
        let use_case = doubles.use_case(false).with_logger(logger.clone());
        assert!(use_case.execute(&prompt()).await.is_err());

        let events = logger.events.lock().unwrap();
        let (event_type, payload) = events.last().unwrap();
        assert_eq!(*event_type, "pipeline_failed");
        assert_eq!(payload["stage"], "drafts");
        assert_eq!(payload["provider"], "gemini-flash");
    }

    #[tokio::test]
    async fn test_progress_reports_every_stage() {
        let doubles = Doubles::healthy("Merged.\n{\"confidence\":0.85}");
        let progress = RecordingProgress::default();
        doubles
            .use_case(false)
            .execute_with_progress(&prompt(), &progress, &CancellationToken::new())
            .await
            .unwrap();

        let events = progress.events.lock().unwrap();
        assert_eq!(events[0], "start intent 1");
        assert_eq!(events[1], "task intent groq true");
        assert_eq!(events[2], "done intent");
        assert_eq!(events[3], "start drafts 2");
        assert!(events.contains(&"task drafts gemini-flash true".to_string()));
        assert!(events.contains(&"task drafts gpt-4o true".to_string()));
        assert_eq!(events[6], "done drafts");
        assert_eq!(events.last().unwrap(), "done synthesis");
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_without_calls() {
        let doubles = Doubles::healthy("unused");
        let err = doubles
            .use_case(true)
            .answer("   \n", &NoProgress, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPrompt(_)));
        assert_eq!(doubles.intent.call_count(), 0);
    }

    #[test]
    fn test_duplicate_draft_providers_rejected() {
        let providers = PipelineProviders::new(
            ScriptedProvider::shared("groq"),
            ScriptedProvider::shared("gpt-4o"),
            ScriptedProvider::shared("gpt-4o"),
            ScriptedProvider::shared("grok"),
        );
        assert!(RunPipelineUseCase::new(providers, PipelineConfig::default()).is_err());
    }
}
