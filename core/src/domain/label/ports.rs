use std::future::Future;

use crate::domain::{common::entities::app_errors::CoreError, label::entities::LabelImage};

/// Instruction sent alongside the label photo.
pub const EXTRACTION_INSTRUCTION: &str = "\
You are reading a photograph of a packaged food label.
Transcribe ONLY the ingredient list, verbatim, exactly as printed.
If part of the list is illegible, make your best guess for that part.
Do not add commentary, explanations, headings or summaries.
Return the ingredient text and nothing else.";

pub const EXTRACTION_TEMPERATURE: f32 = 0.0;

/// Vision-capable service that turns a label photo into ingredient text.
///
/// The returned text is not validated; an empty string is a successful
/// result and callers decide what to do with it.
#[cfg_attr(test, mockall::automock)]
pub trait TextExtractionService: Send + Sync {
    fn extract(&self, image: LabelImage)
    -> impl Future<Output = Result<String, CoreError>> + Send;
}
