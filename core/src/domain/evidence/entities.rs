use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single curated fact about an ingredient.
///
/// `name` is matched as a case-insensitive substring of label text, so short
/// names such as `soy` also match `soybean oil`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientRecord {
    pub name: String,
    pub consensus: String,
}

impl IngredientRecord {
    pub fn new(name: impl Into<String>, consensus: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            consensus: consensus.into(),
        }
    }
}

/// Records whose names occur in a piece of label text, in store order.
pub type MatchedEvidence = Vec<IngredientRecord>;

/// Immutable reference table of ingredient facts.
///
/// Insertion order is kept and duplicate names are allowed; every matching
/// duplicate is returned by a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceStore {
    records: Vec<IngredientRecord>,
}

impl EvidenceStore {
    pub fn new(records: Vec<IngredientRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[IngredientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn lookup(&self, text: &str) -> MatchedEvidence {
        super::services::lookup(self, text)
    }
}
