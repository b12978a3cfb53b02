//! Gemini `generateContent` client.
//!
//! Requests a JSON response (`responseMimeType: application/json`) and
//! returns the concatenated text parts of the first candidate.

use async_trait::async_trait;
use orator_core::provider::{ProviderError, TextGenerator};
use serde::Deserialize;
use serde_json::json;

const PROVIDER: &str = "gemini";

/// Errors from the Gemini API layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The reply carried no text (blocked prompt, empty candidate list).
    #[error("Unexpected Gemini response: {0}")]
    Parse(String),
}

impl From<GeminiError> for ProviderError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Parse(message) => ProviderError::InvalidResponse {
                provider: PROVIDER,
                message,
            },
            other => ProviderError::Upstream {
                provider: PROVIDER,
                message: other.to_string(),
            },
        }
    }
}

/// Connection settings for Gemini.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub api_url: String,
    pub model: String,
}

/// HTTP client for a single Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, GeminiError> {
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {"responseMimeType": "application/json"},
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.api_url, self.config.model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body: crate::error_body(response).await,
            });
        }

        let reply: GenerateContentResponse = response.json().await?;
        extract_text(reply)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let text = self.generate_content(prompt).await?;
        tracing::debug!(model = %self.config.model, chars = text.len(), "Generation complete");
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn extract_text(reply: GenerateContentResponse) -> Result<String, GeminiError> {
    let candidate = reply
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GeminiError::Parse("no candidates".into()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(GeminiError::Parse(format!(
            "empty candidate (finish reason: {reason})"
        )));
    }
    Ok(text)
}
