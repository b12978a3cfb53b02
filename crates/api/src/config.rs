use orator_core::metrics::DEFAULT_PAUSE_THRESHOLD_SECS;
use orator_providers::{DeepgramConfig, GeminiConfig};

use crate::auth::jwt::JwtConfig;

/// Where session documents are persisted.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Postgres via `DATABASE_URL`.
    Postgres { database_url: String },
    /// Process memory; contents are lost on restart.
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// Most fields have defaults suitable for local development. Credentials
/// have no default and must be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body, which bounds the audio upload.
    pub max_audio_bytes: usize,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub deepgram: DeepgramConfig,
    pub gemini: GeminiConfig,
    /// Minimum inter-word silence counted as a pause.
    pub pause_threshold_secs: f64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                             |
    /// |------------------------|-----------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                           |
    /// | `PORT`                 | `3000`                                              |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                             |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                                               |
    /// | `MAX_AUDIO_BYTES`      | `26214400`                                          |
    /// | `STORAGE_BACKEND`      | `postgres` (or `memory`)                            |
    /// | `DATABASE_URL`         | required for `postgres`                             |
    /// | `DEEPGRAM_API_KEY`     | required                                            |
    /// | `DEEPGRAM_API_URL`     | `https://api.deepgram.com/v1`                       |
    /// | `DEEPGRAM_MODEL`       | `nova-2`                                            |
    /// | `GEMINI_API_KEY`       | required                                            |
    /// | `GEMINI_API_URL`       | `https://generativelanguage.googleapis.com/v1beta`  |
    /// | `GEMINI_MODEL`         | `gemini-2.0-flash`                                  |
    /// | `PAUSE_THRESHOLD_SECS` | `0.5`                                               |
    ///
    /// # Panics
    ///
    /// Panics on a missing credential or an unparsable value, so
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "120")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_audio_bytes: usize = env_or("MAX_AUDIO_BYTES", "26214400")
            .parse()
            .expect("MAX_AUDIO_BYTES must be a valid usize");

        let storage = match env_or("STORAGE_BACKEND", "postgres").as_str() {
            "postgres" => StorageConfig::Postgres {
                database_url: required("DATABASE_URL"),
            },
            "memory" => StorageConfig::Memory,
            other => panic!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let deepgram = DeepgramConfig {
            api_key: required("DEEPGRAM_API_KEY"),
            api_url: env_or("DEEPGRAM_API_URL", "https://api.deepgram.com/v1"),
            model: env_or("DEEPGRAM_MODEL", "nova-2"),
        };

        let gemini = GeminiConfig {
            api_key: required("GEMINI_API_KEY"),
            api_url: env_or(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            model: env_or("GEMINI_MODEL", "gemini-2.0-flash"),
        };

        let pause_threshold_secs: f64 =
            env_or("PAUSE_THRESHOLD_SECS", &DEFAULT_PAUSE_THRESHOLD_SECS.to_string())
                .parse()
                .expect("PAUSE_THRESHOLD_SECS must be a number");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_audio_bytes,
            jwt: JwtConfig::from_env(),
            storage,
            deepgram,
            gemini,
            pause_threshold_secs,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn required(key: &str) -> String {
    let value = std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"));
    assert!(!value.trim().is_empty(), "{key} must not be empty");
    value
}
