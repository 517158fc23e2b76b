use async_trait::async_trait;
use rizzroast_model::GenerationMode;
use thiserror::Error;

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::build_prompt;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Generator answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed generator response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Generator response has no candidate text")]
    MissingCandidate,
}

/// Turns user input into exactly one generated line.
#[async_trait]
pub trait LineGenerator: Send + Sync {
    async fn generate(&self, mode: GenerationMode, input: &str) -> Result<String, GenerationError>;
}
