use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rizzroast_model::GenerationMode;
use serde::{Deserialize, Serialize};

use crate::prompt::build_prompt;
use crate::{GenerationError, LineGenerator};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// API key travels in this header, never in the request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        GeminiConfig {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            api_key: api_key.into(),
        }
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn single_prompt(text: &'a str) -> Self {
        GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text }],
            }],
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Reads `candidates[0].content.parts[0].text` from a `generateContent` response body.
pub fn extract_line(body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or(GenerationError::MissingCandidate)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::MissingCandidate);
    }
    Ok(text.to_string())
}

pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        GeminiClient {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl LineGenerator for GeminiClient {
    async fn generate(&self, mode: GenerationMode, input: &str) -> Result<String, GenerationError> {
        if self.config.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        let prompt = build_prompt(mode, input);
        debug!("Requesting {mode:?} line from {}", self.config.model);
        let response = self
            .client
            .post(self.config.generate_content_url())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&GenerateContentRequest::single_prompt(&prompt))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Gemini answered with {status}");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }
        extract_line(&body)
    }
}

#[cfg(test)]
mod tests;
