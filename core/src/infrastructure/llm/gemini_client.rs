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
pub struct GeminiLLMClient {
    api_key: String,
    base_url: String,
    model_name: String,
    vision_model_name: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl GeminiLLMClient {
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

    fn extraction_request(&self, base64_png: String) -> GeminiRequest {
        GeminiRequest {
            system_instruction: None,
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: EXTRACTION_INSTRUCTION.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: base64_png,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: EXTRACTION_TEMPERATURE,
            },
        }
    }

    fn reasoning_request(&self, request: ReasoningRequest) -> GeminiRequest {
        GeminiRequest {
            system_instruction: Some(Content {
                parts: vec![Part::Text {
                    text: request.system,
                }],
            }),
            contents: vec![Content {
                parts: vec![Part::Text { text: request.user }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }

    async fn call_gemini_api(
        &self,
        model_name: &str,
        request: GeminiRequest,
    ) -> Result<String, LlmTransportError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model_name);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini API request failed: {}", e);
                LlmTransportError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(LlmTransportError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            LlmTransportError::Decode(e.to_string())
        })?;

        // One answer may arrive split over several parts
        let texts: Vec<String> = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if texts.is_empty() {
            return Err(LlmTransportError::EmptyResponse);
        }

        Ok(texts.concat())
    }
}

impl TextExtractionService for GeminiLLMClient {
    #[instrument(skip(self, image), fields(model = %self.vision_model_name))]
    async fn extract(&self, image: LabelImage) -> Result<String, CoreError> {
        let base64_png = image.to_base64_png()?;

        self.call_gemini_api(&self.vision_model_name, self.extraction_request(base64_png))
            .await
            .map_err(|e| CoreError::ExtractionError(e.to_string()))
    }
}

impl ReasoningService for GeminiLLMClient {
    #[instrument(skip(self, request), fields(model = %self.model_name))]
    async fn complete(&self, request: ReasoningRequest) -> Result<String, CoreError> {
        self.call_gemini_api(&self.model_name, self.reasoning_request(request))
            .await
            .map_err(|e| CoreError::SynthesisError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode, Uri},
    };
    use image::{DynamicImage, RgbImage};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Debug, Clone)]
    struct SeenRequest {
        path: String,
        api_key: Option<String>,
        body: Value,
    }

    #[derive(Clone)]
    struct FakeGemini {
        status: StatusCode,
        reply: Value,
        seen: Arc<Mutex<Vec<SeenRequest>>>,
    }

    async fn generate_content(
        State(fake): State<FakeGemini>,
        uri: Uri,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        fake.seen.lock().unwrap().push(SeenRequest {
            path: uri.path().to_string(),
            api_key: headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });

        (fake.status, Json(fake.reply.clone()))
    }

    /// Serves `reply` with `status` for every request and returns a client
    /// pointed at it along with the recorded requests.
    async fn fake_gemini(
        status: StatusCode,
        reply: Value,
    ) -> (GeminiLLMClient, Arc<Mutex<Vec<SeenRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(generate_content).with_state(FakeGemini {
            status,
            reply,
            seen: seen.clone(),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = GeminiLLMClient::new(
            Client::new(),
            "g-test".to_string(),
            format!("http://{}/v1beta/", addr),
            "gemini-text".to_string(),
            "gemini-vision".to_string(),
        );

        (client, seen)
    }

    fn text_parts(parts: &[&str]) -> Value {
        let parts: Vec<Value> = parts.iter().map(|text| json!({ "text": text })).collect();
        json!({ "candidates": [{ "content": { "parts": parts } }] })
    }

    fn reasoning_request() -> ReasoningRequest {
        ReasoningRequest {
            system: "be brief".to_string(),
            user: "sugar".to_string(),
            temperature: 0.2,
        }
    }

    fn label_image() -> LabelImage {
        LabelImage::from_image(DynamicImage::ImageRgb8(RgbImage::new(2, 2)))
    }

    #[tokio::test]
    async fn test_complete_joins_every_text_part() {
        let (client, seen) = fake_gemini(
            StatusCode::OK,
            text_parts(&["What stands out\n", "Bottom line\nfine"]),
        )
        .await;

        let text = client.complete(reasoning_request()).await.unwrap();

        assert_eq!(text, "What stands out\nBottom line\nfine");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "/v1beta/models/gemini-text:generateContent");
        assert_eq!(seen[0].api_key.as_deref(), Some("g-test"));
        assert_eq!(
            seen[0].body["system_instruction"]["parts"][0]["text"],
            "be brief"
        );
    }

    #[tokio::test]
    async fn test_extract_uses_vision_model() {
        let (client, seen) = fake_gemini(StatusCode::OK, text_parts(&["sugar, salt"])).await;

        let text = client.extract(label_image()).await.unwrap();

        assert_eq!(text, "sugar, salt");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path, "/v1beta/models/gemini-vision:generateContent");
        assert_eq!(
            seen[0].body["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
    }

    #[tokio::test]
    async fn test_error_status_maps_to_step_failure() {
        let (client, _) = fake_gemini(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": { "message": "overloaded" } }),
        )
        .await;

        let synthesis = client.complete(reasoning_request()).await;
        let extraction = client.extract(label_image()).await;

        assert!(matches!(synthesis, Err(CoreError::SynthesisError(ref m)) if m.contains("503")));
        assert!(matches!(extraction, Err(CoreError::ExtractionError(ref m)) if m.contains("503")));
    }

    #[tokio::test]
    async fn test_candidate_without_text_is_empty_response() {
        let (client, _) = fake_gemini(
            StatusCode::OK,
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
        )
        .await;

        let result = client.complete(reasoning_request()).await;

        assert!(matches!(result, Err(CoreError::SynthesisError(ref m)) if m.contains("no text")));
    }

    fn client() -> GeminiLLMClient {
        GeminiLLMClient::new(
            Client::new(),
            "g-test".to_string(),
            "https://generativelanguage.googleapis.com/v1beta".to_string(),
            "gemini-2.0-flash".to_string(),
            "gemini-2.0-flash".to_string(),
        )
    }

    #[test]
    fn test_reasoning_request_uses_system_instruction() {
        let request = client().reasoning_request(ReasoningRequest {
            system: "be brief".to_string(),
            user: "sugar".to_string(),
            temperature: 0.5,
        });

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["system_instruction"],
            json!({ "parts": [{ "text": "be brief" }] })
        );
        assert_eq!(value["contents"], json!([{ "parts": [{ "text": "sugar" }] }]));
        assert_eq!(value["generation_config"]["temperature"], 0.5);
    }

    #[test]
    fn test_extraction_request_inlines_png() {
        let request = client().extraction_request("AAAA".to_string());

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("system_instruction").is_none());
        assert_eq!(
            value["contents"][0]["parts"][1],
            json!({ "inline_data": { "mime_type": "image/png", "data": "AAAA" } })
        );
    }

    #[test]
    fn test_response_without_candidates_parses() {
        let parsed: GeminiResponse = serde_json::from_value(json!({})).unwrap();

        assert!(parsed.candidates.is_empty());
    }
}
