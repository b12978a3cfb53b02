//! HTTP clients for the external speech-to-text and generation services.
//!
//! Each client implements the matching `orator_core::provider` trait so the
//! rest of the workspace never depends on a vendor API directly.

pub mod deepgram;
pub mod gemini;

pub use deepgram::{DeepgramClient, DeepgramConfig};
pub use gemini::{GeminiClient, GeminiConfig};

/// HTTP client type shared by every provider.
pub use reqwest::Client as HttpClient;

/// Read the body of a non-2xx response for error reporting.
async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read body>".to_string())
}
