use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Largest accepted label photo.
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct AnalyzeLabelTextRequest {
    /// Ingredient list as typed or pasted. Blank text is accepted and aborts
    /// the analysis.
    #[validate(length(max = 10000, message = "text must be at most 10000 characters"))]
    pub text: String,
}

/// Multipart form accepted by the image endpoints. Documentation only.
#[derive(Debug, ToSchema)]
pub struct AnalyzeLabelForm {
    /// PNG or JPEG photo of the ingredient label.
    #[schema(format = Binary, value_type = Option<String>)]
    pub image: Option<Vec<u8>>,
    /// Typed ingredient text; replaced by the extracted text when an image is sent.
    pub text: Option<String>,
}
