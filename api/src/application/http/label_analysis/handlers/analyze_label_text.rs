use axum::extract::State;
use chrono::{DateTime, Utc};
use ingredient_copilot_core::domain::{
    evidence::entities::IngredientRecord,
    explanation::entities::DISCLAIMER,
    pipeline::{
        entities::{LabelAnalysis, PipelineFailure, PipelineState},
        ports::LabelPipelineService,
        value_objects::AnalyzeLabelInput,
    },
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::http::{
    label_analysis::validators::AnalyzeLabelTextRequest,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

/// One finished pipeline invocation as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LabelAnalysisResponse {
    pub id: Uuid,
    /// Terminal state: `done`, `aborted` or `failed`.
    pub status: PipelineState,
    pub transitions: Vec<PipelineState>,
    /// Present only when an image was transcribed.
    pub extracted_text: Option<String>,
    /// Text used for matching and synthesis.
    pub raw_text: Option<String>,
    pub evidence: Vec<IngredientRecord>,
    /// Reasoning service output, unmodified.
    pub explanation: Option<String>,
    pub missing_sections: Vec<String>,
    pub failure: Option<PipelineFailure>,
    /// Full text for display, including the disclaimer on success.
    pub rendered: String,
    pub disclaimer: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl From<LabelAnalysis> for LabelAnalysisResponse {
    fn from(analysis: LabelAnalysis) -> Self {
        let explanation = analysis.explanation().cloned();

        Self {
            id: analysis.id,
            status: analysis.state(),
            extracted_text: analysis.extracted_text().map(str::to_string),
            raw_text: analysis.raw_text().map(str::to_string),
            evidence: analysis.evidence().to_vec(),
            missing_sections: explanation
                .as_ref()
                .map(|e| e.missing_sections.clone())
                .unwrap_or_default(),
            explanation: explanation.map(|e| e.text),
            failure: analysis.failure().cloned(),
            rendered: analysis.render(),
            disclaimer: DISCLAIMER.to_string(),
            transitions: analysis.transitions,
            started_at: analysis.started_at,
            finished_at: analysis.finished_at,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeLabelResponse {
    pub data: LabelAnalysisResponse,
}

#[utoipa::path(
    post,
    path = "/analyze/text",
    tag = "labels",
    summary = "Explain an ingredient list given as text",
    description = "Matches the text against the evidence table and asks the reasoning service for a structured explanation. Aborted and failed analyses are reported in the body.",
    responses(
        (status = 200, body = AnalyzeLabelResponse),
        (status = 400, description = "Malformed or oversized body")
    ),
    request_body = AnalyzeLabelTextRequest
)]
pub async fn analyze_label_text(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<AnalyzeLabelTextRequest>,
) -> Result<Response<AnalyzeLabelResponse>, ApiError> {
    let analysis = state
        .service
        .analyze_label(AnalyzeLabelInput::from_text(payload.text))
        .await;

    Ok(Response::OK(AnalyzeLabelResponse {
        data: analysis.into(),
    }))
}
