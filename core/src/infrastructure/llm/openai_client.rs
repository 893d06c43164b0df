use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        explanation::ports::{ReasoningRequest, ReasoningService},
        label::{
            entities::LabelImage,
            ports::{EXTRACTION_INSTRUCTION, EXTRACTION_TEMPERATURE, TextExtractionService},
        },
    },
    infrastructure::llm::client::LlmTransportError,
};

#[derive(Clone)]
pub struct OpenAiLLMClient {
    api_key: String,
    base_url: String,
    model_name: String,
    vision_model_name: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiLLMClient {
    pub fn new(
        client: Client,
        api_key: String,
        base_url: String,
        model_name: String,
        vision_model_name: String,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_name,
            vision_model_name,
            client,
        }
    }

    fn extraction_request(&self, data_url: String) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.vision_model_name.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: EXTRACTION_INSTRUCTION.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ]),
            }],
            temperature: EXTRACTION_TEMPERATURE,
        }
    }

    fn reasoning_request(&self, request: ReasoningRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(request.system),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Text(request.user),
                },
            ],
            temperature: request.temperature,
        }
    }

    async fn call_chat_api(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<String, LlmTransportError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI API request failed: {}", e);
                LlmTransportError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI API error: {} - {}", status, error_text);
            return Err(LlmTransportError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}", e);
            LlmTransportError::Decode(e.to_string())
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmTransportError::EmptyResponse)
    }
}

impl TextExtractionService for OpenAiLLMClient {
    #[instrument(skip(self, image), fields(model = %self.vision_model_name))]
    async fn extract(&self, image: LabelImage) -> Result<String, CoreError> {
        let data_url = image.to_data_url()?;

        self.call_chat_api(self.extraction_request(data_url))
            .await
            .map_err(|e| CoreError::ExtractionError(e.to_string()))
    }
}

impl ReasoningService for OpenAiLLMClient {
    #[instrument(skip(self, request), fields(model = %self.model_name))]
    async fn complete(&self, request: ReasoningRequest) -> Result<String, CoreError> {
        self.call_chat_api(self.reasoning_request(request))
            .await
            .map_err(|e| CoreError::SynthesisError(e.to_string()))
    }
}
