pub mod chat;
pub mod health;
pub mod sessions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                           register (public)
/// /login                              login, sets the auth cookie (public)
/// /user/logout                        clear the auth cookie
/// /users/whoami                       current user (requires auth)
/// /user/{id}                          delete own account (requires auth)
///
/// /sessions                           create, list by ?user_id=
/// /sessions/{id}                      get, delete
/// /sessions/{id}/messages             stored turns, oldest first
/// /sessions/{id}/messages/stream      streamed reply, recorded on completion
///
/// /chat/stream                        one-shot streamed reply
/// /models                             models available on the inference server
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(sessions::router())
        .merge(chat::router())
}
