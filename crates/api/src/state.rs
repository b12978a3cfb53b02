use std::sync::Arc;

use orator_core::feedback::FeedbackRequester;
use orator_core::provider::{TextGenerator, Transcriber};
use orator_core::session::SessionComposer;
use orator_db::backend::SessionBackend;
use orator_db::memory::MemorySessionBackend;
use orator_db::pg::PgSessionBackend;
use orator_db::store::SessionStore;
use orator_providers::{DeepgramClient, GeminiClient};

use crate::config::{ServerConfig, StorageConfig};

/// Failures while wiring up services at startup.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Speech-to-text provider.
    pub transcriber: Arc<dyn Transcriber>,
    /// Builds session records from transcriptions.
    pub composer: SessionComposer,
    /// Owner-scoped session persistence.
    pub store: SessionStore,
}

impl AppState {
    /// Construct every service from configuration. Called once at startup.
    ///
    /// For Postgres storage this connects the pool, checks health, and
    /// applies migrations before returning.
    pub async fn initialize(config: ServerConfig) -> Result<Self, InitError> {
        let backend: Arc<dyn SessionBackend> = match &config.storage {
            StorageConfig::Postgres { database_url } => {
                let pool = orator_db::create_pool(database_url).await?;
                tracing::info!("Database connection pool created");

                orator_db::health_check(&pool).await?;
                tracing::info!("Database health check passed");

                orator_db::run_migrations(&pool).await?;
                tracing::info!("Database migrations applied");

                Arc::new(PgSessionBackend::new(pool))
            }
            StorageConfig::Memory => {
                tracing::warn!("Using in-memory session storage; data is lost on restart");
                Arc::new(MemorySessionBackend::new())
            }
        };

        // One connection pool shared by both providers.
        let http = orator_providers::HttpClient::new();
        let transcriber = Arc::new(DeepgramClient::with_client(
            http.clone(),
            config.deepgram.clone(),
        ));
        let generator = Arc::new(GeminiClient::with_client(http, config.gemini.clone()));

        Ok(Self::from_parts(config, backend, transcriber, generator))
    }

    /// Assemble state from already-constructed collaborators.
    pub fn from_parts(
        config: ServerConfig,
        backend: Arc<dyn SessionBackend>,
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let composer = SessionComposer::new(
            FeedbackRequester::new(generator),
            config.pause_threshold_secs,
        );

        Self {
            config: Arc::new(config),
            transcriber,
            composer,
            store: SessionStore::new(backend),
        }
    }
}
