use std::future::Future;

use crate::domain::common::entities::app_errors::CoreError;

/// Single-turn request to a language-reasoning service.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

#[cfg_attr(test, mockall::automock)]
pub trait ReasoningService: Send + Sync {
    /// Returns the full textual response, unmodified.
    fn complete(
        &self,
        request: ReasoningRequest,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}
