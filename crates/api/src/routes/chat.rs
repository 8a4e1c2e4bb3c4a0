//! Route definitions for session-less inference.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// ```text
/// POST /chat/stream  -> stream_chat
/// GET  /models       -> list_models
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat/stream", post(chat::stream_chat))
        .route("/models", get(chat::list_models))
}
