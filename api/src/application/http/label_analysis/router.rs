use super::handlers::{
    analyze_label::{__path_analyze_label, analyze_label},
    analyze_label_stream::{__path_analyze_label_stream, analyze_label_stream},
    analyze_label_text::{__path_analyze_label_text, analyze_label_text},
};
use super::validators::MAX_IMAGE_SIZE;
use crate::application::http::server::app_state::AppState;
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(analyze_label_text, analyze_label, analyze_label_stream))]
pub struct LabelAnalysisApiDoc;

pub fn label_analysis_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/labels/analyze/text", state.args.server.root_path),
            post(analyze_label_text),
        )
        .route(
            &format!("{}/labels/analyze", state.args.server.root_path),
            post(analyze_label),
        )
        .route(
            &format!("{}/labels/analyze/stream", state.args.server.root_path),
            post(analyze_label_stream),
        )
        // room for the multipart envelope around a maximum-size image
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024))
}
