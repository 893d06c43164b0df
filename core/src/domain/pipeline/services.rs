use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{
    common::{generate_uuid_v7, services::Service},
    explanation::{ports::ReasoningService, services::synthesize},
    label::ports::TextExtractionService,
    pipeline::{
        entities::{
            AbortReason, LabelAnalysis, PipelineFailure, PipelineOutcome, PipelineState,
        },
        ports::LabelPipelineService,
        value_objects::AnalyzeLabelInput,
    },
};

/// Bookkeeping for a single invocation: current state, visited states and
/// the optional progress listener.
struct PipelineRun {
    id: Uuid,
    started_at: DateTime<Utc>,
    state: PipelineState,
    transitions: Vec<PipelineState>,
    progress: Option<UnboundedSender<PipelineState>>,
}

impl PipelineRun {
    fn start(progress: Option<UnboundedSender<PipelineState>>) -> Self {
        let run = Self {
            id: generate_uuid_v7(),
            started_at: Utc::now(),
            state: PipelineState::Idle,
            transitions: vec![PipelineState::Idle],
            progress,
        };
        run.publish(PipelineState::Idle);
        run
    }

    fn advance(&mut self, next: PipelineState) {
        if !self.state.can_transition_to(next) {
            error!(
                analysis_id = %self.id,
                from = self.state.as_str(),
                to = next.as_str(),
                "illegal pipeline transition"
            );
        }
        debug_assert!(self.state.can_transition_to(next));

        debug!(
            analysis_id = %self.id,
            from = self.state.as_str(),
            to = next.as_str(),
            "pipeline transition"
        );
        self.state = next;
        self.transitions.push(next);
        self.publish(next);
    }

    fn publish(&self, state: PipelineState) {
        if let Some(progress) = &self.progress {
            // Listener may have gone away; the run still completes.
            let _ = progress.send(state);
        }
    }

    fn finish(self, outcome: PipelineOutcome) -> LabelAnalysis {
        info!(
            analysis_id = %self.id,
            state = outcome.state().as_str(),
            "label analysis finished"
        );

        LabelAnalysis {
            id: self.id,
            transitions: self.transitions,
            outcome,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

impl<TE, RS> Service<TE, RS>
where
    TE: TextExtractionService,
    RS: ReasoningService,
{
    async fn run_pipeline(
        &self,
        input: AnalyzeLabelInput,
        progress: Option<UnboundedSender<PipelineState>>,
    ) -> LabelAnalysis {
        let mut run = PipelineRun::start(progress);
        run.advance(PipelineState::TextSourcing);

        let AnalyzeLabelInput { text, image } = input;
        let mut raw_text = text.unwrap_or_default();
        let mut extracted_text = None;

        // 1. Extraction overwrites whatever text was typed
        if let Some(image) = image {
            run.advance(PipelineState::Extracting);

            match self.text_extractor.extract(image).await {
                Ok(text) => {
                    raw_text = text.clone();
                    extracted_text = Some(text);
                }
                Err(e) => {
                    warn!(analysis_id = %run.id, error = %e, "label text extraction failed");
                    run.advance(PipelineState::Failed);
                    return run.finish(PipelineOutcome::Failed {
                        extracted_text: None,
                        raw_text: None,
                        evidence: Vec::new(),
                        failure: PipelineFailure::extraction(e),
                    });
                }
            }

            run.advance(PipelineState::TextReady);
        } else if !raw_text.trim().is_empty() {
            run.advance(PipelineState::TextReady);
        }

        // 2. Nothing usable to reason about
        if raw_text.trim().is_empty() {
            info!(analysis_id = %run.id, "no ingredient text available, aborting");
            run.advance(PipelineState::Aborted);
            return run.finish(PipelineOutcome::Aborted {
                extracted_text,
                reason: AbortReason::NoIngredientText,
            });
        }

        // 3. Matching
        run.advance(PipelineState::Matching);
        let evidence = self.evidence_store.lookup(&raw_text);
        debug!(analysis_id = %run.id, matched = evidence.len(), "evidence matched");

        // 4. Synthesis
        run.advance(PipelineState::Synthesizing);
        match synthesize(&self.reasoning_service, &raw_text, &evidence).await {
            Ok(explanation) => {
                run.advance(PipelineState::Done);
                run.finish(PipelineOutcome::Done {
                    extracted_text,
                    raw_text,
                    evidence,
                    explanation,
                })
            }
            Err(e) => {
                warn!(analysis_id = %run.id, error = %e, "explanation synthesis failed");
                run.advance(PipelineState::Failed);
                run.finish(PipelineOutcome::Failed {
                    extracted_text,
                    raw_text: Some(raw_text),
                    evidence,
                    failure: PipelineFailure::synthesis(e),
                })
            }
        }
    }
}

impl<TE, RS> LabelPipelineService for Service<TE, RS>
where
    TE: TextExtractionService,
    RS: ReasoningService,
{
    async fn analyze_label(&self, input: AnalyzeLabelInput) -> LabelAnalysis {
        self.run_pipeline(input, None).await
    }

    async fn analyze_label_with_progress(
        &self,
        input: AnalyzeLabelInput,
        progress: UnboundedSender<PipelineState>,
    ) -> LabelAnalysis {
        self.run_pipeline(input, Some(progress)).await
    }
}
