//! Integration tests for the Postgres backend.
//!
//! Exercises the repository layer against a real database to verify that:
//! - A create batch writes the root row and both sub-documents
//! - A batch that fails part-way leaves nothing behind
//! - Listing is owner-scoped and newest first
//! - Deleting cascades to every sub-document
//!
//! Run with `DATABASE_URL` pointing at a disposable Postgres instance and
//! `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use orator_db::backend::SessionBackend;
use orator_db::batch::WriteBatch;
use orator_db::models::session::{SessionDocument, FEEDBACK_DOCUMENT, TECHNICAL_DOCUMENT};
use orator_db::pg::PgSessionBackend;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_session(user_id: &str, offset_secs: i64) -> SessionDocument {
    SessionDocument {
        session_id: uuid::Uuid::new_v4(),
        user_id: user_id.to_string(),
        language: "es".into(),
        created_at: Utc::now() + Duration::seconds(offset_secs),
        transcript: "Implementé la capa de caché".into(),
        wpm: 95.5,
        duration_seconds: 20.0,
        summary_score: 64.0,
        summary_verdict: false,
    }
}

fn create_batch(doc: &SessionDocument) -> WriteBatch {
    let mut batch = WriteBatch::new();
    batch
        .put_session(doc.clone())
        .put_document(doc.session_id, FEEDBACK_DOCUMENT, json!({"oratory_expert": {}}))
        .put_document(doc.session_id, TECHNICAL_DOCUMENT, json!({"words": []}));
    batch
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn create_batch_writes_all_documents(pool: PgPool) {
    let backend = PgSessionBackend::new(pool);
    let doc = new_session("alice", 0);

    backend.commit(create_batch(&doc)).await.unwrap();

    let found = backend.find_session(doc.session_id).await.unwrap().unwrap();
    assert_eq!(found, doc_with_db_precision(&doc, &found));
    assert_eq!(
        backend.document_names(doc.session_id).await.unwrap(),
        vec![FEEDBACK_DOCUMENT.to_string(), TECHNICAL_DOCUMENT.to_string()]
    );
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn failing_statement_rolls_back_batch(pool: PgPool) {
    let backend = PgSessionBackend::new(pool);
    let doc = new_session("alice", 0);
    backend.commit(create_batch(&doc)).await.unwrap();

    // Second batch: a fresh root, then a duplicate root that violates the PK.
    let fresh = new_session("alice", 1);
    let mut batch = create_batch(&fresh);
    batch.put_session(doc.clone());

    assert!(backend.commit(batch).await.is_err());
    assert!(backend.find_session(fresh.session_id).await.unwrap().is_none());
    assert!(backend
        .document_names(fresh.session_id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn list_is_owner_scoped_and_newest_first(pool: PgPool) {
    let backend = PgSessionBackend::new(pool);
    let older = new_session("alice", 0);
    let newer = new_session("alice", 10);
    let other = new_session("bob", 20);
    for doc in [&older, &newer, &other] {
        backend.commit(create_batch(doc)).await.unwrap();
    }

    let listed = backend.list_by_user("alice", 10).await.unwrap();

    let ids: Vec<_> = listed.iter().map(|s| s.session_id).collect();
    assert_eq!(ids, vec![newer.session_id, older.session_id]);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn delete_batch_removes_everything(pool: PgPool) {
    let backend = PgSessionBackend::new(pool);
    let doc = new_session("alice", 0);
    backend.commit(create_batch(&doc)).await.unwrap();

    let mut batch = WriteBatch::new();
    batch
        .delete_document(doc.session_id, FEEDBACK_DOCUMENT)
        .delete_document(doc.session_id, TECHNICAL_DOCUMENT)
        .delete_session(doc.session_id);
    backend.commit(batch).await.unwrap();

    assert!(backend.find_session(doc.session_id).await.unwrap().is_none());
    assert!(backend
        .find_document(doc.session_id, TECHNICAL_DOCUMENT)
        .await
        .unwrap()
        .is_none());
}

/// Postgres stores microsecond timestamps; align the expected value.
fn doc_with_db_precision(expected: &SessionDocument, found: &SessionDocument) -> SessionDocument {
    SessionDocument {
        created_at: found.created_at,
        ..expected.clone()
    }
}
