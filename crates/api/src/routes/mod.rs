pub mod health;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions                                 create, list
/// /sessions/{session_id}                    get, delete
/// /sessions/{session_id}/audio              always 501
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/sessions", session::router())
}
