//! Handlers for accounts: registration, login, logout, whoami, deletion.

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ollachat_core::types::DbId;
use ollachat_db::models::user::UserResponse;
use serde::Deserialize;

use crate::auth::cookie::{cleared_cookie, session_cookie};
use crate::auth::credentials::{self, NewAccount};
use crate::auth::jwt::issue_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::{AppForm, AppJson};
use crate::middleware::auth::AuthUser;
use crate::response::StatusMessage;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Form body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = credentials::register(
        &state.pool,
        NewAccount {
            username: &input.username,
            full_name: input.full_name.as_deref(),
            password: &input.password,
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// POST /login
///
/// Verifies the credentials and sets the bearer cookie.
pub async fn login(
    State(state): State<AppState>,
    AppForm(input): AppForm<LoginForm>,
) -> AppResult<Response> {
    let user = credentials::authenticate(&state.pool, &input.username, &input.password).await?;

    let jwt = &state.config.jwt;
    let token = issue_access_token(&user.username, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = session_cookie(
        &token,
        jwt.access_ttl().num_seconds(),
        state.config.cookie_secure,
    )
    .map_err(|e| AppError::InternalError(format!("Invalid cookie value: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(StatusMessage::new(
            "You've successfully logged in. Welcome back!",
        )),
    )
        .into_response())
}

/// POST /user/logout
///
/// Tokens are stateless; logging out only removes the cookie.
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(SET_COOKIE, cleared_cookie(state.config.cookie_secure))],
        Json(StatusMessage::new("You've successfully logged out.")),
    )
        .into_response()
}

/// GET /users/whoami
pub async fn whoami(auth: AuthUser) -> Json<UserResponse> {
    Json(auth.user.into())
}

/// DELETE /user/{id}
///
/// Users may only delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<StatusMessage>> {
    credentials::delete_user(&state.pool, id, auth.user.id).await?;
    Ok(Json(StatusMessage::new(format!("Deleted user {id}"))))
}
