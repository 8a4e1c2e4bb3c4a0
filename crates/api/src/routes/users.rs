//! Route definitions for accounts.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// POST   /register      -> register
/// POST   /login         -> login
/// POST   /user/logout   -> logout
/// GET    /users/whoami  -> whoami (requires auth)
/// DELETE /user/{id}     -> delete_user (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/user/logout", post(users::logout))
        .route("/users/whoami", get(users::whoami))
        .route("/user/{id}", delete(users::delete_user))
}
