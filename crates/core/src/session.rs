//! Session records and the composer that assembles them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::feedback::{ConversationTurn, FeedbackOutcome, FeedbackRequester};
use crate::metrics::{self, TechnicalMetrics, TimedWord};
use crate::provider::TranscriptionResult;
use crate::types::{Language, SessionId, Timestamp, UserId};

/// The complete analysis of one recorded answer, ready to persist.
///
/// Records are write-once: nothing mutates a record after composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub language: Language,
    pub created_at: Timestamp,
    pub transcript: String,
    pub words: Vec<TimedWord>,
    pub metrics: TechnicalMetrics,
    pub feedback: FeedbackOutcome,
    /// Context snippets the client used when asking the question.
    pub context_used: Vec<String>,
}

/// Caller-supplied inputs for one composition.
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub user_id: UserId,
    pub language: Language,
    pub transcription: TranscriptionResult,
    /// Earlier turns, oldest first. The new transcript is appended here.
    pub history: Vec<ConversationTurn>,
    pub context_used: Vec<String>,
}

/// Turns a transcription plus conversation context into a [`SessionRecord`].
///
/// Does not persist anything; callers hand the record to the session store.
#[derive(Clone)]
pub struct SessionComposer {
    requester: FeedbackRequester,
    pause_threshold_secs: f64,
}

impl SessionComposer {
    pub fn new(requester: FeedbackRequester, pause_threshold_secs: f64) -> Self {
        Self {
            requester,
            pause_threshold_secs,
        }
    }

    /// Derive metrics, request feedback, and assign the session id.
    ///
    /// Fails only on invalid transcription data; a failed feedback call
    /// still produces a record carrying [`FeedbackOutcome::Degraded`].
    pub async fn compose(&self, request: CompositionRequest) -> Result<SessionRecord, CoreError> {
        let CompositionRequest {
            user_id,
            language,
            transcription,
            mut history,
            context_used,
        } = request;

        let metrics = metrics::derive_metrics(
            &transcription.words,
            transcription.duration_seconds,
            transcription.confidence,
            self.pause_threshold_secs,
        )?;

        history.push(ConversationTurn::student(transcription.transcript.clone()));

        let feedback = self.requester.request(&history, &metrics, language).await;

        let record = SessionRecord {
            session_id: uuid::Uuid::new_v4(),
            user_id,
            language,
            created_at: chrono::Utc::now(),
            transcript: transcription.transcript,
            words: transcription.words,
            metrics,
            feedback,
            context_used,
        };

        tracing::debug!(
            session_id = %record.session_id,
            user_id = %record.user_id,
            word_count = record.metrics.word_count,
            degraded = record.feedback.is_degraded(),
            "Session composed"
        );

        Ok(record)
    }
}
