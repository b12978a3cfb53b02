#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use orator_api::auth::jwt::{generate_access_token, JwtConfig};
use orator_api::config::{ServerConfig, StorageConfig};
use orator_api::router::build_app_router;
use orator_api::state::AppState;
use orator_core::metrics::{TimedWord, DEFAULT_PAUSE_THRESHOLD_SECS};
use orator_core::provider::{
    AudioInput, ProviderError, TextGenerator, Transcriber, TranscriptionResult,
};
use orator_core::types::Language;
use orator_db::memory::MemorySessionBackend;
use orator_providers::{DeepgramConfig, GeminiConfig};

pub const BOUNDARY: &str = "orator-test-boundary";

/// Generator reply matching the feedback schema (score 72, passed).
pub const FEEDBACK_REPLY: &str = r#"{
    "oratory_expert": {
        "score": 72,
        "summary": "Clear but hesitant.",
        "strengths": ["Structure"],
        "weaknesses": ["Hedging"],
        "pacing_feedback": "Slightly slow."
    },
    "recruiter_verdict": {
        "passed": true,
        "decision_rationale": "Shows ownership.",
        "star_method_check": "Partial STAR.",
        "soft_skills": ["Communication"],
        "red_flags": []
    },
    "improvement_plan": {
        "immediate_action": "Drop 'I think'.",
        "long_term_advice": "Practise system design stories."
    }
}"#;

/// Build a test `ServerConfig` backed by in-memory storage.
///
/// Provider credentials are dummies; tests inject stub collaborators.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_audio_bytes: 1024 * 1024,
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_mins: 5,
        },
        storage: StorageConfig::Memory,
        deepgram: DeepgramConfig {
            api_key: "unused".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
            model: "nova-2".to_string(),
        },
        gemini: GeminiConfig {
            api_key: "unused".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
            model: "gemini-2.0-flash".to_string(),
        },
        pause_threshold_secs: DEFAULT_PAUSE_THRESHOLD_SECS,
    }
}

// ---------------------------------------------------------------------------
// Stub providers
// ---------------------------------------------------------------------------

/// Transcriber returning a fixed result (or failure) and counting calls.
pub struct StubTranscriber {
    result: Result<TranscriptionResult, String>,
    pub calls: AtomicUsize,
}

impl StubTranscriber {
    pub fn returning(result: TranscriptionResult) -> Self {
        Self {
            result: Ok(result),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(
        &self,
        _audio: AudioInput,
        _language: Language,
    ) -> Result<TranscriptionResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(|message| ProviderError::Upstream {
            provider: "stub",
            message,
        })
    }
}

/// Generator returning a fixed reply (or failure) and counting calls.
pub struct StubGenerator {
    reply: Result<String, String>,
    pub calls: AtomicUsize,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(|message| ProviderError::Upstream {
            provider: "stub",
            message,
        })
    }
}

/// Eight words over twelve seconds with a two-second gap after "I".
pub fn sample_transcription() -> TranscriptionResult {
    let timings = [
        ("I", 0.0, 0.3),
        ("led", 2.3, 2.6),
        ("the", 2.6, 2.8),
        ("migration", 2.8, 3.5),
        ("to", 3.5, 3.7),
        ("a", 3.7, 3.8),
        ("new", 3.8, 4.1),
        ("platform", 4.1, 4.8),
    ];
    TranscriptionResult {
        transcript: "I led the migration to a new platform".to_string(),
        words: timings
            .iter()
            .map(|(word, start, end)| TimedWord {
                word: word.to_string(),
                start: *start,
                end: *end,
                confidence: 0.93,
            })
            .collect(),
        confidence: 0.93,
        duration_seconds: 12.0,
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// The full router plus handles on the stubs behind it.
pub struct TestApp {
    pub router: Router,
    pub backend: Arc<MemorySessionBackend>,
    pub transcriber: Arc<StubTranscriber>,
    pub generator: Arc<StubGenerator>,
    jwt: JwtConfig,
}

impl TestApp {
    /// App whose providers both succeed.
    pub fn new() -> Self {
        Self::with_providers(
            StubTranscriber::returning(sample_transcription()),
            StubGenerator::replying(FEEDBACK_REPLY),
        )
    }

    /// Build the full application router with the production middleware
    /// stack around the given stub providers.
    pub fn with_providers(transcriber: StubTranscriber, generator: StubGenerator) -> Self {
        let config = test_config();
        let jwt = config.jwt.clone();
        let backend = Arc::new(MemorySessionBackend::new());
        let transcriber = Arc::new(transcriber);
        let generator = Arc::new(generator);

        let state = AppState::from_parts(
            config,
            backend.clone(),
            transcriber.clone(),
            generator.clone(),
        );

        Self {
            router: build_app_router(state),
            backend,
            transcriber,
            generator,
            jwt,
        }
    }

    pub fn token(&self, user_id: &str) -> String {
        generate_access_token(user_id, &self.jwt).unwrap()
    }

    /// Send a request, optionally authenticated as `user_id`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
        body: Option<MultipartBody>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header("authorization", format!("Bearer {}", self.token(user_id)));
        }
        let request = match body {
            Some(body) => builder
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body.finish()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, user_id: &str) -> Response<Body> {
        self.send(Method::GET, uri, Some(user_id), None).await
    }

    pub async fn delete(&self, uri: &str, user_id: &str) -> Response<Body> {
        self.send(Method::DELETE, uri, Some(user_id), None).await
    }

    pub async fn create(&self, user_id: &str, body: MultipartBody) -> Response<Body> {
        self.send(Method::POST, "/api/sessions", Some(user_id), Some(body))
            .await
    }

    /// Create a session that must succeed and return its id.
    pub async fn create_ok(&self, user_id: &str) -> String {
        let response = self.create(user_id, MultipartBody::with_audio()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["sessionId"].as_str().unwrap().to_string()
    }
}

// ---------------------------------------------------------------------------
// Request / response helpers
// ---------------------------------------------------------------------------

/// Hand-assembled `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body carrying a small fake audio clip.
    pub fn with_audio() -> Self {
        Self::new().file("audio", "answer.webm", "audio/webm", b"RIFF fake audio")
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
