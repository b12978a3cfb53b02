//! Repository for the `sessions` and `session_documents` tables.

use orator_core::types::SessionId;
use sqlx::{PgConnection, PgPool};

use crate::models::session::{SessionDocument, SessionSummary};

/// Column list shared across root-document queries.
const COLUMNS: &str = "session_id, user_id, language, created_at, transcript, \
                       wpm, duration_seconds, summary_score, summary_verdict";

/// Columns returned by listings.
const SUMMARY_COLUMNS: &str =
    "session_id, language, transcript, created_at, summary_score, summary_verdict";

/// Provides SQL operations for session documents.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a root document.
    pub async fn insert(conn: &mut PgConnection, doc: &SessionDocument) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sessions
                (session_id, user_id, language, created_at, transcript,
                 wpm, duration_seconds, summary_score, summary_verdict)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(doc.session_id)
        .bind(&doc.user_id)
        .bind(&doc.language)
        .bind(doc.created_at)
        .bind(&doc.transcript)
        .bind(doc.wpm)
        .bind(doc.duration_seconds)
        .bind(doc.summary_score)
        .bind(doc.summary_verdict)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Insert or replace a named sub-document.
    pub async fn upsert_document(
        conn: &mut PgConnection,
        session_id: SessionId,
        name: &str,
        body: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO session_documents (session_id, name, body)
             VALUES ($1, $2, $3)
             ON CONFLICT (session_id, name) DO UPDATE SET body = EXCLUDED.body",
        )
        .bind(session_id)
        .bind(name)
        .bind(body)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Delete one sub-document. Returns `true` if a row was removed.
    pub async fn delete_document(
        conn: &mut PgConnection,
        session_id: SessionId,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM session_documents WHERE session_id = $1 AND name = $2")
                .bind(session_id)
                .bind(name)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a root document. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, session_id: SessionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a root document by its session id.
    pub async fn find_by_id(
        pool: &PgPool,
        session_id: SessionId,
    ) -> Result<Option<SessionDocument>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE session_id = $1");
        sqlx::query_as::<_, SessionDocument>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the body of a named sub-document.
    pub async fn find_document(
        pool: &PgPool,
        session_id: SessionId,
        name: &str,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT body FROM session_documents WHERE session_id = $1 AND name = $2",
        )
        .bind(session_id)
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Names of all sub-documents under a session.
    pub async fn document_names(
        pool: &PgPool,
        session_id: SessionId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM session_documents WHERE session_id = $1 ORDER BY name",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }

    /// List a user's sessions, newest first. Equal timestamps are ordered by
    /// arrival, latest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<SessionSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM sessions
             WHERE user_id = $1
             ORDER BY created_at DESC, seq DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, SessionSummary>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
