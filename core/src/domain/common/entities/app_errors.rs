use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Startup-time failure: reference data or credentials are unusable.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Text extraction failed: {0}")]
    ExtractionError(String),

    #[error("Explanation synthesis failed: {0}")]
    SynthesisError(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),
}
