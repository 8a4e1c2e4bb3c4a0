//! Handlers for chat sessions and their stored turns.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ollachat_core::chat::resolve_session_title;
use ollachat_core::error::CoreError;
use ollachat_core::types::DbId;
use ollachat_db::models::chat_session::{ChatSession, CreateChatSession};
use ollachat_db::models::conversation::Conversation;
use ollachat_db::repositories::{ChatSessionRepo, ConversationRepo, UserRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;

/// Request body for `POST /sessions`.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: DbId,
    #[serde(default)]
    pub title: Option<String>,
}

/// Query parameters for `GET /sessions`.
#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    pub user_id: DbId,
}

/// POST /sessions
pub async fn create_session(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateSessionRequest>,
) -> AppResult<Json<ChatSession>> {
    if UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .is_none()
    {
        return Err(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }
        .into());
    }

    let title = resolve_session_title(input.title.as_deref())?;
    let session = ChatSessionRepo::create(
        &state.pool,
        &CreateChatSession {
            user_id: input.user_id,
            title,
        },
    )
    .await?;

    tracing::info!(session_id = session.id, user_id = session.user_id, "Created chat session");
    Ok(Json(session))
}

/// GET /sessions?user_id=
///
/// Newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListSessionsQuery>,
) -> AppResult<Json<Vec<ChatSession>>> {
    let sessions = ChatSessionRepo::list_for_user(&state.pool, params.user_id).await?;
    Ok(Json(sessions))
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ChatSession>> {
    let session = find_session(&state, id).await?;
    Ok(Json(session))
}

/// DELETE /sessions/{id}
///
/// Removes the session together with its stored turns.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ChatSessionRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "ChatSession",
            id,
        }
        .into());
    }
    tracing::info!(session_id = id, "Deleted chat session");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sessions/{id}/messages
///
/// Oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Conversation>>> {
    find_session(&state, id).await?;
    let turns = ConversationRepo::list_for_session(&state.pool, id).await?;
    Ok(Json(turns))
}

/// Load a session or fail with 404.
pub(crate) async fn find_session(state: &AppState, id: DbId) -> AppResult<ChatSession> {
    ChatSessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "ChatSession",
                id,
            }
            .into()
        })
}
