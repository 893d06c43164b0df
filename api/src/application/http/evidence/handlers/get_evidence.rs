use axum::extract::State;
use ingredient_copilot_core::domain::evidence::entities::IngredientRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GetEvidenceResponse {
    pub data: Vec<IngredientRecord>,
}

#[utoipa::path(
    get,
    path = "",
    tag = "evidence",
    summary = "List evidence records",
    description = "Returns the curated ingredient reference table in load order",
    responses(
        (status = 200, body = GetEvidenceResponse)
    ),
)]
pub async fn get_evidence(
    State(state): State<AppState>,
) -> Result<Response<GetEvidenceResponse>, ApiError> {
    let data = state.service.evidence_store().records().to_vec();

    Ok(Response::OK(GetEvidenceResponse { data }))
}
