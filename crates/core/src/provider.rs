//! Contracts for the external speech-to-text and text-generation services.
//!
//! Concrete HTTP clients live in `orator-providers`; tests substitute
//! in-process stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::metrics::TimedWord;
use crate::types::Language;

/// Output of a speech-to-text call, reduced to what the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub transcript: String,
    /// Word sequence in spoken order.
    pub words: Vec<TimedWord>,
    /// Aggregate confidence reported by the provider.
    pub confidence: f64,
    /// Total audio duration from provider metadata.
    pub duration_seconds: f64,
}

/// Audio submitted for transcription.
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    /// MIME type of the upload, e.g. `audio/webm`.
    pub content_type: String,
}

/// Failure of an external provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The call could not be completed (network, non-2xx status).
    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    /// The call completed but the reply did not have the expected shape.
    #[error("{provider} returned an unexpected response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
}

/// Speech-to-text collaborator.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: AudioInput,
        language: Language,
    ) -> Result<TranscriptionResult, ProviderError>;
}

/// Generative-language collaborator: one prompt in, one text reply out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
