use std::future::Future;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::pipeline::{
    entities::{LabelAnalysis, PipelineState},
    value_objects::AnalyzeLabelInput,
};

/// Runs the extraction → matching → synthesis pipeline for one user action.
///
/// Request-time failures are part of the returned [`LabelAnalysis`] outcome,
/// never an `Err`.
pub trait LabelPipelineService: Send + Sync {
    fn analyze_label(&self, input: AnalyzeLabelInput)
    -> impl Future<Output = LabelAnalysis> + Send;

    /// Same as [`LabelPipelineService::analyze_label`], publishing every state
    /// transition to `progress` as it happens.
    fn analyze_label_with_progress(
        &self,
        input: AnalyzeLabelInput,
        progress: UnboundedSender<PipelineState>,
    ) -> impl Future<Output = LabelAnalysis> + Send;
}
