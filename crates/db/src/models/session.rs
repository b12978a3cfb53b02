//! Session root document, sub-documents, and read views.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use orator_core::metrics::{TechnicalMetrics, TimedWord};
use orator_core::session::SessionRecord;
use orator_core::types::{SessionId, Timestamp, UserId};

/// Name of the sub-document holding the full feedback payload.
pub const FEEDBACK_DOCUMENT: &str = "feedback";

/// Name of the sub-document holding metrics and word timings.
pub const TECHNICAL_DOCUMENT: &str = "technical";

/// A row from the `sessions` table.
///
/// `summary_score` and `summary_verdict` duplicate two scalars from the
/// feedback document. They are derived once, in [`SessionDocument::from_record`].
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub language: String,
    pub created_at: Timestamp,
    pub transcript: String,
    pub wpm: f64,
    pub duration_seconds: f64,
    pub summary_score: f64,
    pub summary_verdict: bool,
}

impl SessionDocument {
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            session_id: record.session_id,
            user_id: record.user_id.clone(),
            language: record.language.code().to_string(),
            created_at: record.created_at,
            transcript: record.transcript.clone(),
            wpm: record.metrics.wpm,
            duration_seconds: record.metrics.duration_seconds,
            summary_score: record.feedback.summary_score(),
            summary_verdict: record.feedback.summary_verdict(),
        }
    }
}

/// Body of the `technical` sub-document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalDocument {
    pub metrics: TechnicalMetrics,
    pub words: Vec<TimedWord>,
    pub context_used: Vec<String>,
}

impl TechnicalDocument {
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            metrics: record.metrics.clone(),
            words: record.words.clone(),
            context_used: record.context_used.clone(),
        }
    }
}

/// Lightweight listing entry; excludes word-level detail.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub language: String,
    pub transcript: String,
    pub created_at: Timestamp,
    pub summary_score: f64,
    pub summary_verdict: bool,
}

impl From<&SessionDocument> for SessionSummary {
    fn from(doc: &SessionDocument) -> Self {
        Self {
            session_id: doc.session_id,
            language: doc.language.clone(),
            transcript: doc.transcript.clone(),
            created_at: doc.created_at,
            summary_score: doc.summary_score,
            summary_verdict: doc.summary_verdict,
        }
    }
}

/// Root document joined with both sub-documents.
///
/// A missing sub-document is reported as `null`, not as an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: SessionDocument,
    pub feedback: Option<serde_json::Value>,
    pub technical: Option<serde_json::Value>,
}
