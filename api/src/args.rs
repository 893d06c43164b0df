use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ingredient_copilot_core::domain::common::{
    CopilotConfig, EvidenceConfig, LLMConfig, LLMProvider,
};

#[derive(Clone, Parser)]
#[command(name = "ingredient-copilot", version, about = "Ingredient Co-Pilot API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub evidence: EvidenceArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5555"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(
        long = "metrics-enabled",
        env = "METRICS_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub metrics_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LlmProviderArg {
    Openai,
    Gemini,
}

impl From<LlmProviderArg> for LLMProvider {
    fn from(value: LlmProviderArg) -> Self {
        match value {
            LlmProviderArg::Openai => LLMProvider::OpenAi,
            LlmProviderArg::Gemini => LLMProvider::Gemini,
        }
    }
}

#[derive(Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "llm-provider", env = "LLM_PROVIDER", value_enum, default_value_t = LlmProviderArg::Openai)]
    pub provider: LlmProviderArg,

    #[arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long = "llm-model", env = "LLM_MODEL")]
    pub model: Option<String>,

    #[arg(long = "llm-vision-model", env = "LLM_VISION_MODEL")]
    pub vision_model: Option<String>,

    #[arg(long = "llm-base-url", env = "LLM_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long = "llm-timeout-secs", env = "LLM_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct EvidenceArgs {
    #[arg(
        long = "evidence-path",
        env = "EVIDENCE_PATH",
        default_value = "data/ingredients.json"
    )]
    pub path: PathBuf,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Used when `RUST_LOG` is not set.
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for CopilotConfig {
    fn from(args: Args) -> Self {
        let provider = LLMProvider::from(args.llm.provider);
        let api_key = match provider {
            LLMProvider::OpenAi => args.llm.openai_api_key,
            LLMProvider::Gemini => args.llm.gemini_api_key,
        };

        CopilotConfig {
            llm: LLMConfig {
                provider,
                api_key,
                model: args.llm.model,
                vision_model: args.llm.vision_model,
                base_url: args.llm.base_url,
                timeout_secs: args.llm.timeout_secs,
            },
            evidence: EvidenceConfig {
                path: args.evidence.path,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_uses_gemini_key() {
        let args = Args::try_parse_from([
            "ingredient-copilot",
            "--llm-provider",
            "gemini",
            "--openai-api-key",
            "sk-openai",
            "--gemini-api-key",
            "g-key",
            "--evidence-path",
            "/tmp/evidence.json",
        ])
        .unwrap();

        let config = CopilotConfig::from(args);
        assert_eq!(config.llm.provider, LLMProvider::Gemini);
        assert_eq!(config.llm.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.evidence.path, PathBuf::from("/tmp/evidence.json"));
    }

    #[test]
    fn test_metrics_can_be_disabled() {
        let args = Args::try_parse_from([
            "ingredient-copilot",
            "--metrics-enabled",
            "false",
            "--allowed-origins",
            "http://a.test,http://b.test",
        ])
        .unwrap();

        assert!(!args.server.metrics_enabled);
        assert_eq!(args.server.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }
}
