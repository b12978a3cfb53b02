//! Atomic write batches.
//!
//! A [`WriteBatch`] collects every mutation of one logical write. Backends
//! apply it all-or-nothing; a logical write must never be split across two
//! batches.

use orator_core::types::SessionId;

use crate::models::session::SessionDocument;

/// A single mutation inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert a root document. Fails if the session already exists.
    PutSession(SessionDocument),
    /// Insert or replace a named sub-document under an existing session.
    PutDocument {
        session_id: SessionId,
        name: String,
        body: serde_json::Value,
    },
    DeleteDocument {
        session_id: SessionId,
        name: String,
    },
    DeleteSession(SessionId),
}

/// Ordered list of mutations applied as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_session(&mut self, doc: SessionDocument) -> &mut Self {
        self.ops.push(WriteOp::PutSession(doc));
        self
    }

    pub fn put_document(
        &mut self,
        session_id: SessionId,
        name: &str,
        body: serde_json::Value,
    ) -> &mut Self {
        self.ops.push(WriteOp::PutDocument {
            session_id,
            name: name.to_string(),
            body,
        });
        self
    }

    pub fn delete_document(&mut self, session_id: SessionId, name: &str) -> &mut Self {
        self.ops.push(WriteOp::DeleteDocument {
            session_id,
            name: name.to_string(),
        });
        self
    }

    pub fn delete_session(&mut self, session_id: SessionId) -> &mut Self {
        self.ops.push(WriteOp::DeleteSession(session_id));
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
