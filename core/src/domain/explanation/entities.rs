use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Section headings the reasoning service is instructed to emit, in order.
pub const SECTION_HEADINGS: [&str; 5] = [
    "What stands out",
    "Why it matters",
    "Why this might not matter",
    "What is uncertain",
    "Bottom line",
];

pub const DISCLAIMER: &str =
    "This is evidence-aware decision support, not medical or dietary advice.";

/// Synthesized explanation, kept exactly as the reasoning service returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Explanation {
    pub text: String,
    /// Headings from [`SECTION_HEADINGS`] not found in `text`. Informational only.
    pub missing_sections: Vec<String>,
}

impl Explanation {
    pub fn new(text: String) -> Self {
        let missing_sections = missing_sections(&text);
        Self {
            text,
            missing_sections,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_sections.is_empty()
    }
}

fn missing_sections(text: &str) -> Vec<String> {
    let folded = text.to_lowercase();

    SECTION_HEADINGS
        .iter()
        .filter(|heading| !folded.contains(&heading.to_lowercase()))
        .map(|heading| heading.to_string())
        .collect()
}
