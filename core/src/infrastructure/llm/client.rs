use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::{
    domain::{
        common::{LLMConfig, LLMProvider, entities::app_errors::CoreError},
        explanation::ports::{ReasoningRequest, ReasoningService},
        label::{entities::LabelImage, ports::TextExtractionService},
    },
    infrastructure::llm::{gemini_client::GeminiLLMClient, openai_client::OpenAiLLMClient},
};

/// Transport-level failure talking to a model provider.
#[derive(Debug, Error)]
pub enum LlmTransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse provider response: {0}")]
    Decode(String),

    #[error("provider response contained no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmTransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmTransportError::Timeout(e.to_string())
        } else if e.is_decode() {
            LlmTransportError::Decode(e.to_string())
        } else {
            LlmTransportError::Request(e.to_string())
        }
    }
}

/// Model provider selected at startup. Serves as both the text extractor and
/// the reasoning service.
#[derive(Clone)]
pub enum LlmClient {
    OpenAi(OpenAiLLMClient),
    Gemini(GeminiLLMClient),
}

impl LlmClient {
    pub fn from_config(config: &LLMConfig) -> Result<Self, CoreError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CoreError::ConfigError(format!(
                    "missing API key for the {} provider",
                    config.provider
                ))
            })?
            .to_string();

        if config.timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "LLM timeout must be at least one second".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        let provider = config.provider;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string());
        let model_name = config
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());
        let vision_model_name = config
            .vision_model
            .clone()
            .unwrap_or_else(|| model_name.clone());

        tracing::info!(
            provider = %provider,
            model = %model_name,
            vision_model = %vision_model_name,
            timeout_secs = config.timeout_secs,
            "Initializing LLM client"
        );

        Ok(match provider {
            LLMProvider::OpenAi => LlmClient::OpenAi(OpenAiLLMClient::new(
                http,
                api_key,
                base_url,
                model_name,
                vision_model_name,
            )),
            LLMProvider::Gemini => LlmClient::Gemini(GeminiLLMClient::new(
                http,
                api_key,
                base_url,
                model_name,
                vision_model_name,
            )),
        })
    }
}

impl TextExtractionService for LlmClient {
    async fn extract(&self, image: LabelImage) -> Result<String, CoreError> {
        match self {
            LlmClient::OpenAi(client) => client.extract(image).await,
            LlmClient::Gemini(client) => client.extract(image).await,
        }
    }
}

impl ReasoningService for LlmClient {
    async fn complete(&self, request: ReasoningRequest) -> Result<String, CoreError> {
        match self {
            LlmClient::OpenAi(client) => client.complete(request).await,
            LlmClient::Gemini(client) => client.complete(request).await,
        }
    }
}
