use crate::domain::label::entities::LabelImage;

/// Whatever the caller has for one analysis: typed text, a photo, or both.
///
/// When both are present a successful extraction replaces `text`.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeLabelInput {
    pub text: Option<String>,
    pub image: Option<LabelImage>,
}

impl AnalyzeLabelInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn from_image(image: LabelImage) -> Self {
        Self {
            text: None,
            image: Some(image),
        }
    }

    pub fn with_image(mut self, image: LabelImage) -> Self {
        self.image = Some(image);
        self
    }
}
