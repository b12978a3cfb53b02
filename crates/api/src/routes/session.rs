//! Route definitions for interview sessions.
//!
//! ```text
//! POST   /                          create_session (multipart)
//! GET    /                          list_sessions (?limit)
//! GET    /{session_id}              get_session
//! DELETE /{session_id}              delete_session
//! GET    /{session_id}/audio        get_session_audio (disabled)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Session routes, mounted at `/sessions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(session::list_sessions).post(session::create_session),
        )
        .route(
            "/{session_id}",
            get(session::get_session).delete(session::delete_session),
        )
        .route("/{session_id}/audio", get(session::get_session_audio))
}
