use std::sync::Arc;

use crate::domain::{
    evidence::entities::EvidenceStore, explanation::ports::ReasoningService,
    label::ports::TextExtractionService,
};

/// Holds the process-wide evidence table and the two external collaborators.
///
/// The evidence store is read-only after construction, so clones share it
/// without any locking.
#[derive(Clone)]
pub struct Service<TE, RS>
where
    TE: TextExtractionService,
    RS: ReasoningService,
{
    pub(crate) evidence_store: Arc<EvidenceStore>,
    pub(crate) text_extractor: TE,
    pub(crate) reasoning_service: RS,
}

impl<TE, RS> Service<TE, RS>
where
    TE: TextExtractionService,
    RS: ReasoningService,
{
    pub fn new(evidence_store: Arc<EvidenceStore>, text_extractor: TE, reasoning_service: RS) -> Self {
        Self {
            evidence_store,
            text_extractor,
            reasoning_service,
        }
    }

    pub fn evidence_store(&self) -> &EvidenceStore {
        &self.evidence_store
    }
}
