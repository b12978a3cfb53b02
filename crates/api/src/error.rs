use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orator_core::error::CoreError;
use orator_core::provider::ProviderError;
use orator_db::store::StoreError;
use serde_json::json;

/// Message returned for both unknown sessions and sessions owned by someone
/// else, so a response never confirms that a session exists.
pub const SESSION_NOT_FOUND: &str = "Session not found";

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{"success": false, "error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `orator_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A session store error from `orator_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The speech-to-text provider failed; the request is aborted.
    #[error(transparent)]
    Upstream(#[from] ProviderError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A feature that is switched off in this deployment.
    #[error("Not available: {0}")]
    NotAvailable(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Session store ---
            AppError::Store(store) => match store {
                StoreError::NotFound(_) | StoreError::AccessDenied(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    SESSION_NOT_FOUND.to_string(),
                ),
                StoreError::Storage(err) => {
                    tracing::error!(error = %err, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- External providers ---
            AppError::Upstream(err) => {
                tracing::error!(error = %err, "Upstream provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Transcription service failed".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotAvailable(msg) => {
                (StatusCode::NOT_IMPLEMENTED, "NOT_AVAILABLE", msg.clone())
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
