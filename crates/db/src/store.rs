//! Owner-scoped session persistence.
//!
//! [`SessionStore`] writes a [`SessionRecord`] as one root document plus the
//! `feedback` and `technical` sub-documents in a single batch, and enforces
//! that only the owning user can read or delete a session.

use std::sync::Arc;

use orator_core::session::SessionRecord;
use orator_core::types::SessionId;

use crate::backend::{SessionBackend, StorageError};
use crate::batch::WriteBatch;
use crate::models::session::{
    SessionDocument, SessionSummary, SessionView, TechnicalDocument, FEEDBACK_DOCUMENT,
    TECHNICAL_DOCUMENT,
};

/// Errors surfaced by [`SessionStore`].
///
/// `NotFound` and `AccessDenied` are distinct here so logs can tell them
/// apart; the HTTP layer renders both identically.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Session {0} not found")]
    NotFound(SessionId),

    #[error("Access denied to session {0}")]
    AccessDenied(SessionId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Session persistence service, constructed once at startup and shared by
/// handle.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// Persist a composed record as one atomic batch.
    pub async fn create(&self, record: &SessionRecord) -> Result<SessionId, StoreError> {
        let session_id = record.session_id;
        let feedback = serde_json::to_value(&record.feedback).map_err(StorageError::from)?;
        let technical = serde_json::to_value(TechnicalDocument::from_record(record))
            .map_err(StorageError::from)?;

        let mut batch = WriteBatch::new();
        batch
            .put_session(SessionDocument::from_record(record))
            .put_document(session_id, FEEDBACK_DOCUMENT, feedback)
            .put_document(session_id, TECHNICAL_DOCUMENT, technical);

        self.backend.commit(batch).await?;

        tracing::info!(
            %session_id,
            user_id = %record.user_id,
            degraded = record.feedback.is_degraded(),
            "Session persisted"
        );
        Ok(session_id)
    }

    /// Fetch a session with both sub-documents, if `user_id` owns it.
    pub async fn get(&self, session_id: SessionId, user_id: &str) -> Result<SessionView, StoreError> {
        let session = self.find_owned(session_id, user_id).await?;

        let (feedback, technical) = tokio::try_join!(
            self.backend.find_document(session_id, FEEDBACK_DOCUMENT),
            self.backend.find_document(session_id, TECHNICAL_DOCUMENT),
        )?;

        if feedback.is_none() || technical.is_none() {
            tracing::warn!(%session_id, "Session is missing a sub-document");
        }

        Ok(SessionView {
            session,
            feedback,
            technical,
        })
    }

    /// A user's sessions, newest first, at most `limit` entries.
    pub async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<SessionSummary>, StoreError> {
        let sessions = self.backend.list_by_user(user_id, limit).await?;
        tracing::debug!(count = sessions.len(), user_id, "Listed sessions");
        Ok(sessions)
    }

    /// Delete a session and every sub-document under it, if `user_id` owns it.
    pub async fn delete(&self, session_id: SessionId, user_id: &str) -> Result<(), StoreError> {
        self.find_owned(session_id, user_id).await?;

        let mut batch = WriteBatch::new();
        for name in self.backend.document_names(session_id).await? {
            batch.delete_document(session_id, &name);
        }
        batch.delete_session(session_id);

        self.backend.commit(batch).await?;

        tracing::info!(%session_id, user_id, "Session deleted");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        Ok(self.backend.health_check().await?)
    }

    /// Load the root document and check ownership.
    async fn find_owned(
        &self,
        session_id: SessionId,
        user_id: &str,
    ) -> Result<SessionDocument, StoreError> {
        let session = self
            .backend
            .find_session(session_id)
            .await?
            .ok_or(StoreError::NotFound(session_id))?;

        if session.user_id != user_id {
            tracing::warn!(%session_id, user_id, "Rejected access to another user's session");
            return Err(StoreError::AccessDenied(session_id));
        }
        Ok(session)
    }
}
