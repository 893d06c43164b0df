use axum::extract::{Multipart, State};
use ingredient_copilot_core::domain::{
    label::entities::LabelImage,
    pipeline::{ports::LabelPipelineService, value_objects::AnalyzeLabelInput},
};
use validator::Validate;

use crate::application::http::{
    label_analysis::{
        handlers::analyze_label_text::AnalyzeLabelResponse,
        validators::{AnalyzeLabelForm, AnalyzeLabelTextRequest, MAX_IMAGE_SIZE},
    },
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

/// Reads the optional `image` and `text` fields. An empty image field counts
/// as no image; at least one of the two fields must be present.
pub async fn read_label_form(mut multipart: Multipart) -> Result<AnalyzeLabelInput, ApiError> {
    let mut text: Option<String> = None;
    let mut image_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "text" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read text: {}", e)))?;

                // Same limits as the JSON endpoint
                let request = AnalyzeLabelTextRequest { text: value };
                request
                    .validate()
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                text = Some(request.text);
            }
            "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;

                if data.len() > MAX_IMAGE_SIZE {
                    return Err(ApiError::BadRequest(format!(
                        "Image too large. Max size is {} bytes",
                        MAX_IMAGE_SIZE
                    )));
                }

                if !data.is_empty() {
                    image_data = Some(data.to_vec());
                }
            }
            _ => {}
        }
    }

    if text.is_none() && image_data.is_none() {
        return Err(ApiError::BadRequest(
            "Provide an ingredient label image or ingredient text".to_string(),
        ));
    }

    let image = match image_data {
        Some(bytes) => Some(
            tokio::task::spawn_blocking(move || LabelImage::decode(&bytes))
                .await
                .map_err(|e| {
                    tracing::error!("Image decoding task failed: {}", e);
                    ApiError::InternalServerError("Failed to decode image".to_string())
                })??,
        ),
        None => None,
    };

    Ok(AnalyzeLabelInput { text, image })
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "labels",
    summary = "Explain an ingredient label from a photo and/or text",
    description = "When an image is sent its transcription replaces any typed text. Aborted and failed analyses are reported in the body.",
    responses(
        (status = 200, body = AnalyzeLabelResponse),
        (status = 400, description = "Missing fields, oversized or undecodable image")
    ),
    request_body(content = AnalyzeLabelForm, content_type = "multipart/form-data")
)]
pub async fn analyze_label(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response<AnalyzeLabelResponse>, ApiError> {
    let input = read_label_form(multipart).await?;

    let analysis = state.service.analyze_label(input).await;

    Ok(Response::OK(AnalyzeLabelResponse {
        data: analysis.into(),
    }))
}
