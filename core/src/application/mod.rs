use std::sync::Arc;

use crate::{
    domain::common::{CopilotConfig, services::Service},
    infrastructure::{evidence::load_evidence_store, llm::LlmClient},
};

pub type CopilotService = Service<LlmClient, LlmClient>;

/// Loads the evidence table and wires the configured model provider.
///
/// Fails with a configuration error when the reference file is unusable or
/// the provider credential is missing; the process must not serve requests
/// in that case.
pub fn create_service(config: CopilotConfig) -> Result<CopilotService, anyhow::Error> {
    let evidence_store = load_evidence_store(&config.evidence.path)?;
    let llm_client = LlmClient::from_config(&config.llm)?;

    Ok(Service::new(
        Arc::new(evidence_store),
        llm_client.clone(),
        llm_client,
    ))
}
