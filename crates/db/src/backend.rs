//! Storage backend abstraction.
//!
//! The store never implements atomicity itself; it relies on
//! [`SessionBackend::commit`] applying a [`WriteBatch`] all-or-nothing.

use async_trait::async_trait;
use orator_core::types::SessionId;

use crate::batch::WriteBatch;
use crate::models::session::{SessionDocument, SessionSummary};

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session {0} already exists")]
    AlreadyExists(SessionId),

    #[error("Session {0} does not exist")]
    MissingParent(SessionId),

    /// A fault armed on the in-memory backend fired.
    #[error("Injected fault at operation {0}")]
    InjectedFault(usize),
}

/// Persistence primitive shared by the Postgres and in-memory backends.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Apply every operation in `batch`, or none of them.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StorageError>;

    async fn find_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SessionDocument>, StorageError>;

    async fn find_document(
        &self,
        session_id: SessionId,
        name: &str,
    ) -> Result<Option<serde_json::Value>, StorageError>;

    /// Names of every sub-document stored under a session.
    async fn document_names(&self, session_id: SessionId) -> Result<Vec<String>, StorageError>;

    /// A user's sessions, newest first, ties broken by latest arrival.
    async fn list_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<SessionSummary>, StorageError>;

    async fn health_check(&self) -> Result<(), StorageError>;
}
