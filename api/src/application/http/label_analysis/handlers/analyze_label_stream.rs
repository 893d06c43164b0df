use std::convert::Infallible;

use axum::{
    extract::{Multipart, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, stream};
use ingredient_copilot_core::domain::pipeline::{
    entities::{LabelAnalysis, PipelineState},
    ports::LabelPipelineService,
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    task::JoinHandle,
};

use crate::application::http::{
    label_analysis::{
        handlers::{analyze_label::read_label_form, analyze_label_text::LabelAnalysisResponse},
        validators::AnalyzeLabelForm,
    },
    server::{api_entities::api_error::ApiError, app_state::AppState},
};

type PipelineTask = (UnboundedReceiver<PipelineState>, JoinHandle<LabelAnalysis>);

fn state_event(state: PipelineState) -> Event {
    Event::default().event("state").data(state.as_str())
}

fn result_event(analysis: LabelAnalysis) -> Event {
    match Event::default()
        .event("result")
        .json_data(LabelAnalysisResponse::from(analysis))
    {
        Ok(event) => event,
        Err(e) => {
            tracing::error!("Failed to serialize analysis result: {}", e);
            error_event("Failed to serialize analysis result")
        }
    }
}

fn error_event(message: &str) -> Event {
    Event::default().event("error").data(message)
}

#[utoipa::path(
    post,
    path = "/analyze/stream",
    tag = "labels",
    summary = "Explain an ingredient label, streaming progress",
    description = "Same input as /analyze. Emits a `state` event for every pipeline transition, then a single `result` event carrying the analysis.",
    responses(
        (status = 200, body = String, content_type = "text/event-stream", description = "`state` events followed by one `result` event"),
        (status = 400, description = "Missing fields, oversized or undecodable image")
    ),
    request_body(content = AnalyzeLabelForm, content_type = "multipart/form-data")
)]
pub async fn analyze_label_stream(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let input = read_label_form(multipart).await?;

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let service = state.service.clone();
    // Runs to completion even if the client disconnects.
    let handle = tokio::spawn(async move {
        service
            .analyze_label_with_progress(input, progress_tx)
            .await
    });

    let events = stream::unfold(
        Some((progress_rx, handle)),
        |task: Option<PipelineTask>| async move {
            let (mut progress_rx, handle) = task?;

            match progress_rx.recv().await {
                Some(state) => Some((
                    Ok::<Event, Infallible>(state_event(state)),
                    Some((progress_rx, handle)),
                )),
                None => {
                    let event = match handle.await {
                        Ok(analysis) => result_event(analysis),
                        Err(e) => {
                            tracing::error!("Label analysis task failed: {}", e);
                            error_event("Label analysis failed unexpectedly")
                        }
                    };
                    Some((Ok(event), None))
                }
            }
        },
    );

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
