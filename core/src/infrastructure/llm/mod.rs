pub mod client;
pub mod gemini_client;
pub mod openai_client;

pub use client::LlmClient;
pub use gemini_client::GeminiLLMClient;
pub use openai_client::OpenAiLLMClient;
