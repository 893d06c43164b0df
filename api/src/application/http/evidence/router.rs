use super::handlers::get_evidence::{__path_get_evidence, get_evidence};
use crate::application::http::server::app_state::AppState;
use axum::{Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(get_evidence))]
pub struct EvidenceApiDoc;

pub fn evidence_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/evidence", state.args.server.root_path),
        get(get_evidence),
    )
}
