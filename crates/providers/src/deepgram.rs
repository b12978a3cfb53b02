//! Deepgram pre-recorded transcription client.
//!
//! Sends the raw audio body to `POST {api_url}/listen` and reduces the reply
//! to a [`TranscriptionResult`] (first channel, best alternative).

use async_trait::async_trait;
use orator_core::metrics::TimedWord;
use orator_core::provider::{AudioInput, ProviderError, TranscriptionResult, Transcriber};
use orator_core::types::Language;
use serde::Deserialize;

const PROVIDER: &str = "deepgram";

/// Errors from the Deepgram API layer.
#[derive(Debug, thiserror::Error)]
pub enum DeepgramError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Deepgram returned a non-2xx status code.
    #[error("Deepgram API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The reply did not contain a transcript.
    #[error("Unexpected Deepgram response: {0}")]
    Parse(String),
}

impl From<DeepgramError> for ProviderError {
    fn from(err: DeepgramError) -> Self {
        match err {
            DeepgramError::Parse(message) => ProviderError::InvalidResponse {
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

/// Connection settings for Deepgram.
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    pub api_key: String,
    /// Base URL, e.g. `https://api.deepgram.com/v1`.
    pub api_url: String,
    pub model: String,
}

/// HTTP client for the Deepgram `/listen` endpoint.
pub struct DeepgramClient {
    client: reqwest::Client,
    config: DeepgramConfig,
}

impl DeepgramClient {
    pub fn new(config: DeepgramConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: DeepgramConfig) -> Self {
        Self { client, config }
    }

    async fn listen(
        &self,
        audio: AudioInput,
        language: Language,
    ) -> Result<TranscriptionResult, DeepgramError> {
        let response = self
            .client
            .post(format!("{}/listen", self.config.api_url))
            .query(&[
                ("model", self.config.model.as_str()),
                ("language", language.code()),
                ("smart_format", "true"),
                ("punctuate", "true"),
            ])
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.config.api_key),
            )
            .header(reqwest::header::CONTENT_TYPE, audio.content_type)
            .body(audio.bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeepgramError::Api {
                status: status.as_u16(),
                body: crate::error_body(response).await,
            });
        }

        let body: ListenResponse = response.json().await?;
        parse_listen_response(body)
    }
}

#[async_trait]
impl Transcriber for DeepgramClient {
    async fn transcribe(
        &self,
        audio: AudioInput,
        language: Language,
    ) -> Result<TranscriptionResult, ProviderError> {
        let bytes = audio.bytes.len();
        let result = self.listen(audio, language).await?;
        tracing::info!(
            bytes,
            language = %language,
            duration_seconds = result.duration_seconds,
            word_count = result.words.len(),
            "Audio transcribed"
        );
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListenResponse {
    metadata: ListenMetadata,
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenMetadata {
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
    confidence: f64,
    #[serde(default)]
    words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
struct Word {
    word: String,
    punctuated_word: Option<String>,
    start: f64,
    end: f64,
    confidence: f64,
}

fn parse_listen_response(body: ListenResponse) -> Result<TranscriptionResult, DeepgramError> {
    let alternative = body
        .results
        .channels
        .into_iter()
        .next()
        .and_then(|channel| channel.alternatives.into_iter().next())
        .ok_or_else(|| DeepgramError::Parse("no transcription alternatives".into()))?;

    let words = alternative
        .words
        .into_iter()
        .map(|w| TimedWord {
            word: w.punctuated_word.unwrap_or(w.word),
            start: w.start,
            end: w.end,
            confidence: w.confidence,
        })
        .collect();

    Ok(TranscriptionResult {
        transcript: alternative.transcript,
        words,
        confidence: alternative.confidence,
        duration_seconds: body.metadata.duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<TranscriptionResult, DeepgramError> {
        parse_listen_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn extracts_first_alternative() {
        let result = parse(json!({
            "metadata": {"duration": 12.0, "request_id": "abc"},
            "results": {"channels": [{"alternatives": [{
                "transcript": "I built it",
                "confidence": 0.97,
                "words": [
                    {"word": "i", "punctuated_word": "I", "start": 0.1, "end": 0.3, "confidence": 0.99},
                    {"word": "built", "start": 0.3, "end": 0.6, "confidence": 0.95},
                    {"word": "it", "punctuated_word": "it.", "start": 0.6, "end": 0.8, "confidence": 0.97}
                ]
            }]}]}
        }))
        .unwrap();

        assert_eq!(result.transcript, "I built it");
        assert_eq!(result.duration_seconds, 12.0);
        assert_eq!(result.confidence, 0.97);
        let words: Vec<_> = result.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["I", "built", "it."]);
        assert_eq!(result.words[1].start, 0.3);
    }

    #[test]
    fn missing_words_yield_empty_sequence() {
        let result = parse(json!({
            "metadata": {"duration": 0.0},
            "results": {"channels": [{"alternatives": [{"transcript": "", "confidence": 0.0}]}]}
        }))
        .unwrap();
        assert!(result.words.is_empty());
    }

    #[test]
    fn no_channels_is_a_parse_error() {
        assert_matches!(
            parse(json!({"metadata": {"duration": 1.0}, "results": {"channels": []}})),
            Err(DeepgramError::Parse(_))
        );
    }

    #[test]
    fn api_errors_map_to_upstream() {
        let err: ProviderError = DeepgramError::Api {
            status: 401,
            body: "bad key".into(),
        }
        .into();
        assert_matches!(err, ProviderError::Upstream { provider: "deepgram", .. });
    }
}
