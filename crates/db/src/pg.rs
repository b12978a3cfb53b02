//! Postgres-backed [`SessionBackend`].

use async_trait::async_trait;
use orator_core::types::SessionId;

use crate::backend::{SessionBackend, StorageError};
use crate::batch::{WriteBatch, WriteOp};
use crate::models::session::{SessionDocument, SessionSummary};
use crate::repositories::SessionRepo;
use crate::DbPool;

/// Applies each batch inside a single transaction.
#[derive(Clone)]
pub struct PgSessionBackend {
    pool: DbPool,
}

impl PgSessionBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionBackend for PgSessionBackend {
    async fn commit(&self, batch: WriteBatch) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        // Any `?` below drops `tx` uncommitted, which rolls the batch back.
        for op in batch.ops() {
            match op {
                WriteOp::PutSession(doc) => SessionRepo::insert(&mut tx, doc).await?,
                WriteOp::PutDocument {
                    session_id,
                    name,
                    body,
                } => SessionRepo::upsert_document(&mut tx, *session_id, name, body).await?,
                WriteOp::DeleteDocument { session_id, name } => {
                    SessionRepo::delete_document(&mut tx, *session_id, name).await?;
                }
                WriteOp::DeleteSession(session_id) => {
                    SessionRepo::delete(&mut tx, *session_id).await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SessionDocument>, StorageError> {
        Ok(SessionRepo::find_by_id(&self.pool, session_id).await?)
    }

    async fn find_document(
        &self,
        session_id: SessionId,
        name: &str,
    ) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(SessionRepo::find_document(&self.pool, session_id, name).await?)
    }

    async fn document_names(&self, session_id: SessionId) -> Result<Vec<String>, StorageError> {
        Ok(SessionRepo::document_names(&self.pool, session_id).await?)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<SessionSummary>, StorageError> {
        Ok(SessionRepo::list_by_user(&self.pool, user_id, limit).await?)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
