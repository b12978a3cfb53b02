//! Handlers for interview answer sessions.
//!
//! Creating a session runs the whole pipeline for one request: transcribe
//! the uploaded audio, compose the record (metrics, then feedback), and
//! persist it in one atomic write. Reads and deletes are owner-scoped.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use orator_core::error::CoreError;
use orator_core::feedback::{ConversationTurn, FeedbackOutcome};
use orator_core::provider::AudioInput;
use orator_core::session::CompositionRequest;
use orator_core::types::{Language, SessionId};
use orator_db::repositories::clamp_limit;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Content type assumed when the upload does not declare one.
const DEFAULT_AUDIO_CONTENT_TYPE: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Fields collected from the multipart create request.
#[derive(Debug, Default)]
struct CreateSessionForm {
    audio: Option<AudioInput>,
    language: Option<String>,
    conversation_history: Option<String>,
    context_used: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub success: bool,
    pub session_id: SessionId,
    pub data: CreatedSession,
}

#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub transcript: String,
    pub feedback: FeedbackOutcome,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn read_form(mut multipart: Multipart) -> AppResult<CreateSessionForm> {
    let mut form = CreateSessionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "audio" => {
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.audio = Some(AudioInput {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            "language" | "conversationHistory" | "contextUsed" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "language" => form.language = Some(text),
                    "conversationHistory" => form.conversation_history = Some(text),
                    _ => form.context_used = Some(text),
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}

/// Parse the serialized conversation history. Malformed history is treated
/// as empty rather than failing the request.
fn parse_history(raw: Option<&str>) -> Vec<ConversationTurn> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring malformed conversation history");
        Vec::new()
    })
}

fn parse_context_used(raw: Option<&str>) -> AppResult<Vec<String>> {
    match raw.filter(|s| !s.trim().is_empty()) {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw).map_err(|_| {
            AppError::Core(CoreError::Validation(
                "contextUsed must be a JSON array of strings".into(),
            ))
        }),
    }
}

fn parse_language(raw: Option<&str>) -> AppResult<Language> {
    match raw.filter(|s| !s.trim().is_empty()) {
        None => Ok(Language::default()),
        Some(code) => Ok(code.parse()?),
    }
}

fn parse_session_id(raw: &str) -> AppResult<SessionId> {
    raw.parse()
        .map_err(|_| AppError::Core(CoreError::Validation("Invalid session id".into())))
}

// ---------------------------------------------------------------------------
// POST /sessions
// ---------------------------------------------------------------------------

/// Analyze an uploaded answer and persist the resulting session.
///
/// Multipart fields: `audio` (required), `language` (`en` | `es`, default
/// `en`), `conversationHistory` (JSON array of `{role, text}`), and
/// `contextUsed` (JSON array of strings).
pub async fn create_session(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_form(multipart).await?;

    // Validate everything before calling out to any provider.
    let audio = form
        .audio
        .ok_or_else(|| AppError::BadRequest("No audio file provided".into()))?;
    if audio.bytes.is_empty() {
        return Err(AppError::BadRequest("Audio file is empty".into()));
    }
    let language = parse_language(form.language.as_deref())?;
    let context_used = parse_context_used(form.context_used.as_deref())?;
    let history = parse_history(form.conversation_history.as_deref());

    let transcription = state.transcriber.transcribe(audio, language).await?;

    let record = state
        .composer
        .compose(CompositionRequest {
            user_id: auth.user_id,
            language,
            transcription,
            history,
            context_used,
        })
        .await?;

    let session_id = state.store.create(&record).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            success: true,
            session_id,
            data: CreatedSession {
                transcript: record.transcript,
                feedback: record.feedback,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /sessions
// ---------------------------------------------------------------------------

/// List the caller's sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit());
    let sessions = state.store.list(&auth.user_id, limit).await?;
    Ok(Json(DataResponse::new(sessions)))
}

// ---------------------------------------------------------------------------
// GET /sessions/{session_id}
// ---------------------------------------------------------------------------

/// Fetch one of the caller's sessions with its feedback and technical detail.
pub async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let session = state.store.get(session_id, &auth.user_id).await?;
    Ok(Json(DataResponse::new(session)))
}

// ---------------------------------------------------------------------------
// DELETE /sessions/{session_id}
// ---------------------------------------------------------------------------

/// Delete one of the caller's sessions and all of its sub-documents.
pub async fn delete_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    state.store.delete(session_id, &auth.user_id).await?;
    Ok(Json(MessageResponse::new("Session deleted successfully")))
}

// ---------------------------------------------------------------------------
// GET /sessions/{session_id}/audio
// ---------------------------------------------------------------------------

/// Audio is never stored, so this endpoint always reports 501.
pub async fn get_session_audio(
    _auth: AuthUser,
    Path(_session_id): Path<String>,
) -> AppResult<StatusCode> {
    Err(AppError::NotAvailable(
        "Audio storage functionality is currently disabled.".into(),
    ))
}
