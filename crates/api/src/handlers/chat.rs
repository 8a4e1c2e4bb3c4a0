//! Handlers that talk to the inference server.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use ollachat_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::sessions::find_session;
use crate::state::AppState;
use crate::streaming::{relay_fragments, text_stream, PendingTurn};

/// Request body for the streaming endpoints.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Response body for `GET /models`.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// POST /sessions/{id}/messages/stream
///
/// Streams the generated reply as `text/plain` and records the turn once the
/// stream has finished. The session is resolved before the inference server
/// is contacted.
pub async fn stream_session_message(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    AppJson(input): AppJson<MessageRequest>,
) -> AppResult<Response> {
    let session = find_session(&state, session_id).await?;
    let model = resolve_model(&state, input.model.as_deref());

    let upstream = state.inference.generate_stream(model, &input.message).await?;

    tracing::info!(
        session_id,
        user_id = session.user_id,
        model,
        "Streaming session reply"
    );

    let pending = PendingTurn {
        user_id: session.user_id,
        session_id: Some(session.id),
        user_message: input.message,
        recorder: Arc::clone(&state.turn_recorder),
    };
    Ok(text_stream(relay_fragments(upstream, Some(pending))))
}

/// POST /chat/stream
///
/// Single-shot generation: no session, nothing recorded.
pub async fn stream_chat(
    State(state): State<AppState>,
    AppJson(input): AppJson<MessageRequest>,
) -> AppResult<Response> {
    let model = resolve_model(&state, input.model.as_deref());
    let upstream = state.inference.generate_stream(model, &input.message).await?;

    tracing::info!(model, "Streaming one-shot reply");
    Ok(text_stream(relay_fragments(upstream, None)))
}

/// GET /models
pub async fn list_models(State(state): State<AppState>) -> AppResult<Json<ModelsResponse>> {
    let models = state.inference.list_models().await?;
    Ok(Json(ModelsResponse { models }))
}

fn resolve_model<'a>(state: &'a AppState, requested: Option<&'a str>) -> &'a str {
    requested
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| state.inference.default_model())
}
