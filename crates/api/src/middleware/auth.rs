//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ollachat_core::error::CoreError;
use ollachat_db::models::user::User;
use ollachat_db::repositories::UserRepo;

use crate::auth::cookie::bearer_token;
use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::AppState;

/// The user named by a valid bearer token.
///
/// The token is read from the `Authorization` cookie, or failing that from
/// the `Authorization: Bearer` header. Use this as an extractor parameter in
/// any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<UserResponse>> {
///     Ok(Json(auth.user.into()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| CoreError::Unauthorized("Not authenticated".into()))?;

        let username = verify_token(&token, &state.config.jwt)?;

        // A valid token for an account deleted since it was issued.
        let user = UserRepo::find_by_username(&state.pool, &username)
            .await?
            .ok_or_else(|| CoreError::Unauthorized("Could not validate credentials".into()))?;

        Ok(AuthUser { user })
    }
}
