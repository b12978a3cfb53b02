//! In-process [`SessionBackend`] for local development and tests.
//!
//! A batch is applied to a staged copy of the state, which replaces the live
//! state only after every operation succeeded. [`MemorySessionBackend::fail_next_commit_at`]
//! arms a one-shot fault so callers can observe that a failed batch leaves
//! nothing behind.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use orator_core::types::SessionId;
use tokio::sync::RwLock;

use crate::backend::{SessionBackend, StorageError};
use crate::batch::{WriteBatch, WriteOp};
use crate::models::session::{SessionDocument, SessionSummary};

#[derive(Debug, Clone)]
struct StoredSession {
    /// Arrival order, used to break `created_at` ties.
    seq: u64,
    root: SessionDocument,
    documents: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    sessions: HashMap<SessionId, StoredSession>,
    next_seq: u64,
}

impl MemoryState {
    fn apply(&mut self, op: &WriteOp) -> Result<(), StorageError> {
        match op {
            WriteOp::PutSession(doc) => {
                if self.sessions.contains_key(&doc.session_id) {
                    return Err(StorageError::AlreadyExists(doc.session_id));
                }
                self.next_seq += 1;
                self.sessions.insert(
                    doc.session_id,
                    StoredSession {
                        seq: self.next_seq,
                        root: doc.clone(),
                        documents: BTreeMap::new(),
                    },
                );
            }
            WriteOp::PutDocument {
                session_id,
                name,
                body,
            } => {
                let session = self
                    .sessions
                    .get_mut(session_id)
                    .ok_or(StorageError::MissingParent(*session_id))?;
                session.documents.insert(name.clone(), body.clone());
            }
            WriteOp::DeleteDocument { session_id, name } => {
                if let Some(session) = self.sessions.get_mut(session_id) {
                    session.documents.remove(name);
                }
            }
            WriteOp::DeleteSession(session_id) => {
                self.sessions.remove(session_id);
            }
        }
        Ok(())
    }
}

/// Keeps all sessions in memory behind a [`RwLock`].
#[derive(Debug, Default)]
pub struct MemorySessionBackend {
    state: RwLock<MemoryState>,
    fault_at: Mutex<Option<usize>>,
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next commit fail when it reaches operation `index` (0-based).
    pub fn fail_next_commit_at(&self, index: usize) {
        *self.fault_at.lock().unwrap_or_else(|e| e.into_inner()) = Some(index);
    }

    fn take_fault(&self) -> Option<usize> {
        self.fault_at.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn commit(&self, batch: WriteBatch) -> Result<(), StorageError> {
        let fault = self.take_fault();
        let mut state = self.state.write().await;
        let mut staged = state.clone();

        for (index, op) in batch.ops().iter().enumerate() {
            if fault == Some(index) {
                return Err(StorageError::InjectedFault(index));
            }
            staged.apply(op)?;
        }

        *state = staged;
        Ok(())
    }

    async fn find_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SessionDocument>, StorageError> {
        let state = self.state.read().await;
        Ok(state.sessions.get(&session_id).map(|s| s.root.clone()))
    }

    async fn find_document(
        &self,
        session_id: SessionId,
        name: &str,
    ) -> Result<Option<serde_json::Value>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .get(&session_id)
            .and_then(|s| s.documents.get(name).cloned()))
    }

    async fn document_names(&self, session_id: SessionId) -> Result<Vec<String>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .get(&session_id)
            .map(|s| s.documents.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<SessionSummary>, StorageError> {
        let state = self.state.read().await;
        let mut owned: Vec<&StoredSession> = state
            .sessions
            .values()
            .filter(|s| s.root.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| {
            b.root
                .created_at
                .cmp(&a.root.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(owned
            .into_iter()
            .take(limit)
            .map(|s| SessionSummary::from(&s.root))
            .collect())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
