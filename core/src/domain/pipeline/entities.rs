use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    evidence::entities::IngredientRecord,
    explanation::entities::{DISCLAIMER, Explanation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    TextSourcing,
    Extracting,
    TextReady,
    Matching,
    Synthesizing,
    Done,
    Aborted,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::TextSourcing => "text_sourcing",
            PipelineState::Extracting => "extracting",
            PipelineState::TextReady => "text_ready",
            PipelineState::Matching => "matching",
            PipelineState::Synthesizing => "synthesizing",
            PipelineState::Done => "done",
            PipelineState::Aborted => "aborted",
            PipelineState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Done | PipelineState::Aborted | PipelineState::Failed
        )
    }

    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (*self, next),
            (Idle, TextSourcing)
                | (TextSourcing, Extracting)
                | (TextSourcing, TextReady)
                | (TextSourcing, Aborted)
                | (Extracting, TextReady)
                | (Extracting, Failed)
                | (TextReady, Matching)
                | (TextReady, Aborted)
                | (Matching, Synthesizing)
                | (Synthesizing, Done)
                | (Synthesizing, Failed)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    NoIngredientText,
}

impl AbortReason {
    pub fn message(&self) -> &'static str {
        match self {
            AbortReason::NoIngredientText => "could not obtain ingredient text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Extraction,
    Synthesis,
}

impl FailureKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::Extraction => "We could not read your image",
            FailureKind::Synthesis => "The reasoning service is unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PipelineFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl PipelineFailure {
    pub fn extraction(error: CoreError) -> Self {
        Self {
            kind: FailureKind::Extraction,
            message: error.to_string(),
        }
    }

    pub fn synthesis(error: CoreError) -> Self {
        Self {
            kind: FailureKind::Synthesis,
            message: error.to_string(),
        }
    }
}

/// Terminal result of one invocation. Nothing partial is produced on
/// `Aborted` or `Failed` beyond what is needed for display.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Done {
        extracted_text: Option<String>,
        raw_text: String,
        evidence: Vec<IngredientRecord>,
        explanation: Explanation,
    },
    Aborted {
        extracted_text: Option<String>,
        reason: AbortReason,
    },
    Failed {
        extracted_text: Option<String>,
        raw_text: Option<String>,
        evidence: Vec<IngredientRecord>,
        failure: PipelineFailure,
    },
}

impl PipelineOutcome {
    pub fn state(&self) -> PipelineState {
        match self {
            PipelineOutcome::Done { .. } => PipelineState::Done,
            PipelineOutcome::Aborted { .. } => PipelineState::Aborted,
            PipelineOutcome::Failed { .. } => PipelineState::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnalysis {
    pub id: Uuid,
    pub transitions: Vec<PipelineState>,
    pub outcome: PipelineOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl LabelAnalysis {
    pub fn state(&self) -> PipelineState {
        self.outcome.state()
    }

    pub fn extracted_text(&self) -> Option<&str> {
        match &self.outcome {
            PipelineOutcome::Done { extracted_text, .. }
            | PipelineOutcome::Aborted { extracted_text, .. }
            | PipelineOutcome::Failed { extracted_text, .. } => extracted_text.as_deref(),
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match &self.outcome {
            PipelineOutcome::Done { raw_text, .. } => Some(raw_text),
            PipelineOutcome::Failed { raw_text, .. } => raw_text.as_deref(),
            PipelineOutcome::Aborted { .. } => None,
        }
    }

    pub fn evidence(&self) -> &[IngredientRecord] {
        match &self.outcome {
            PipelineOutcome::Done { evidence, .. } | PipelineOutcome::Failed { evidence, .. } => {
                evidence
            }
            PipelineOutcome::Aborted { .. } => &[],
        }
    }

    pub fn explanation(&self) -> Option<&Explanation> {
        match &self.outcome {
            PipelineOutcome::Done { explanation, .. } => Some(explanation),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&PipelineFailure> {
        match &self.outcome {
            PipelineOutcome::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Text shown to the end user: extracted text first when extraction ran,
    /// then the explanation verbatim and the disclaimer, or the failure message.
    pub fn render(&self) -> String {
        let mut rendered = String::new();

        if let Some(extracted) = self.extracted_text() {
            rendered.push_str("Extracted ingredient text:\n");
            rendered.push_str(extracted);
            rendered.push_str("\n\n");
        }

        match &self.outcome {
            PipelineOutcome::Done { explanation, .. } => {
                rendered.push_str(&explanation.text);
                rendered.push_str("\n\n");
                rendered.push_str(DISCLAIMER);
            }
            PipelineOutcome::Aborted { reason, .. } => {
                rendered.push_str(&format!(
                    "We could not read your image or text: {}. \
                     Please type or paste the ingredient list and try again.",
                    reason.message()
                ));
            }
            // Provider details stay in `failure.message`
            PipelineOutcome::Failed { failure, .. } => {
                rendered.push_str(&format!(
                    "{}. Please try again.",
                    failure.kind.user_message()
                ));
            }
        }

        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(outcome: PipelineOutcome) -> LabelAnalysis {
        let now = Utc::now();
        LabelAnalysis {
            id: Uuid::nil(),
            transitions: vec![],
            outcome,
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn test_happy_path_transitions_are_legal() {
        use PipelineState::*;
        let path = [
            Idle,
            TextSourcing,
            Extracting,
            TextReady,
            Matching,
            Synthesizing,
            Done,
        ];

        assert!(path.windows(2).all(|pair| pair[0].can_transition_to(pair[1])));
    }

    #[test]
    fn test_abort_and_failure_edges() {
        use PipelineState::*;

        assert!(TextSourcing.can_transition_to(Aborted));
        assert!(TextReady.can_transition_to(Aborted));
        assert!(Extracting.can_transition_to(Failed));
        assert!(Synthesizing.can_transition_to(Failed));

        assert!(!Matching.can_transition_to(Aborted));
        assert!(!TextSourcing.can_transition_to(Matching));
        assert!(!TextReady.can_transition_to(Synthesizing));
        assert!(!Done.can_transition_to(Idle));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use PipelineState::*;
        let all = [
            Idle,
            TextSourcing,
            Extracting,
            TextReady,
            Matching,
            Synthesizing,
            Done,
            Aborted,
            Failed,
        ];

        for state in all.iter().filter(|s| s.is_terminal()) {
            assert!(all.iter().all(|next| !state.can_transition_to(*next)));
        }
    }

    #[test]
    fn test_render_done_appends_disclaimer() {
        let analysis = analysis(PipelineOutcome::Done {
            extracted_text: None,
            raw_text: "sugar".to_string(),
            evidence: vec![],
            explanation: Explanation::new("Bottom line: fine".to_string()),
        });

        assert_eq!(
            analysis.render(),
            format!("Bottom line: fine\n\n{}", DISCLAIMER)
        );
    }

    #[test]
    fn test_render_shows_extracted_text_first() {
        let analysis = analysis(PipelineOutcome::Done {
            extracted_text: Some("sugar, salt".to_string()),
            raw_text: "sugar, salt".to_string(),
            evidence: vec![],
            explanation: Explanation::new("Bottom line: fine".to_string()),
        });

        assert!(
            analysis
                .render()
                .starts_with("Extracted ingredient text:\nsugar, salt\n\nBottom line: fine")
        );
    }

    #[test]
    fn test_render_distinguishes_failures() {
        let aborted = analysis(PipelineOutcome::Aborted {
            extracted_text: None,
            reason: AbortReason::NoIngredientText,
        });
        let failed = analysis(PipelineOutcome::Failed {
            extracted_text: Some("sugar".to_string()),
            raw_text: Some("sugar".to_string()),
            evidence: vec![],
            failure: PipelineFailure::synthesis(CoreError::SynthesisError(
                "provider returned 503: upstream overloaded".to_string(),
            )),
        });

        assert!(aborted.render().contains("could not obtain ingredient text"));
        assert!(!aborted.render().contains(DISCLAIMER));
        assert!(failed.render().starts_with("Extracted ingredient text:\nsugar"));
        assert!(failed.render().contains("The reasoning service is unavailable"));
        assert!(!failed.render().contains("upstream overloaded"));
    }
}
