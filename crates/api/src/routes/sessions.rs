//! Route definitions for the `/sessions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{chat, sessions};
use crate::state::AppState;

/// ```text
/// POST   /sessions                        -> create_session
/// GET    /sessions?user_id=               -> list_sessions
/// GET    /sessions/{id}                   -> get_session
/// DELETE /sessions/{id}                   -> delete_session
/// GET    /sessions/{id}/messages          -> list_messages
/// POST   /sessions/{id}/messages/stream   -> stream_session_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            post(sessions::create_session).get(sessions::list_sessions),
        )
        .route(
            "/sessions/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/sessions/{id}/messages", get(sessions::list_messages))
        .route(
            "/sessions/{id}/messages/stream",
            post(chat::stream_session_message),
        )
}
