//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use orator_api::error::AppError;
use orator_core::error::CoreError;
use orator_core::provider::ProviderError;
use orator_db::backend::StorageError;
use orator_db::store::StoreError;
use uuid::Uuid;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Unsupported language 'de'".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Unsupported language 'de'");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("No audio file provided".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "No audio file provided");
}

// ---------------------------------------------------------------------------
// Session store errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_and_access_denied_render_identically() {
    let id = Uuid::new_v4();

    let (missing_status, missing) =
        error_to_response(AppError::Store(StoreError::NotFound(id))).await;
    let (denied_status, denied) =
        error_to_response(AppError::Store(StoreError::AccessDenied(id))).await;

    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(denied_status, StatusCode::NOT_FOUND);
    assert_eq!(missing, denied);
    assert_eq!(missing["error"], "Session not found");
    assert!(!missing.to_string().contains(&id.to_string()));
}

#[tokio::test]
async fn storage_error_is_sanitized_500() {
    let err = AppError::Store(StoreError::Storage(StorageError::InjectedFault(2)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Providers and disabled features
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_error_returns_502_without_provider_detail() {
    let err = AppError::Upstream(ProviderError::Upstream {
        provider: "deepgram",
        message: "401 invalid credentials".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "Transcription service failed");
}

#[tokio::test]
async fn not_available_returns_501() {
    let err = AppError::NotAvailable("Audio storage functionality is currently disabled.".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(json["code"], "NOT_AVAILABLE");
}
