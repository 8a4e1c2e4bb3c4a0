//! Account lifecycle: registration, login, and self-deletion.

use ollachat_core::accounts::{validate_full_name, validate_password, validate_username};
use ollachat_core::error::{AuthError, CoreError};
use ollachat_core::types::DbId;
use ollachat_db::models::user::{CreateUser, User};
use ollachat_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::{dummy_hash, hash_password, verify_password};
use crate::error::{AppError, AppResult};

/// Registration input as received from the client.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub full_name: Option<&'a str>,
    pub password: &'a str,
}

/// Create a new account.
///
/// A taken username is detected from the unique-constraint violation at
/// insert time and reported as [`CoreError::Conflict`].
pub async fn register(pool: &PgPool, account: NewAccount<'_>) -> AppResult<User> {
    validate_username(account.username)?;
    validate_full_name(account.full_name)?;
    validate_password(account.password)?;

    let password_hash = hash_password(account.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: account.username.to_string(),
        full_name: account.full_name.map(str::to_string),
        password_hash,
    };

    match UserRepo::create(pool, &input).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "Registered user");
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => Err(CoreError::Conflict(
            "Sorry, that username already exists.".into(),
        )
        .into()),
        Err(e) => Err(e.into()),
    }
}

/// Check a username/password pair.
///
/// An unknown user and a wrong password produce the same error, and both
/// paths perform one Argon2 verification.
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> AppResult<User> {
    let Some(user) = UserRepo::find_by_username(pool, username).await? else {
        let _ = verify_password(password, dummy_hash());
        tracing::debug!(username, "Login for unknown user");
        return Err(CoreError::Auth(AuthError::InvalidCredentials).into());
    };

    let valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !valid {
        tracing::debug!(user_id = user.id, "Login with wrong password");
        return Err(CoreError::Auth(AuthError::InvalidCredentials).into());
    }

    Ok(user)
}

/// Delete account `id` on behalf of `requester_id`.
///
/// Only the owner may delete an account. Sessions and conversations go with it.
pub async fn delete_user(pool: &PgPool, id: DbId, requester_id: DbId) -> AppResult<()> {
    if UserRepo::find_by_id(pool, id).await?.is_none() {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }
    if requester_id != id {
        return Err(CoreError::Forbidden("Not authorized to delete this user".into()).into());
    }

    if !UserRepo::delete(pool, id).await? {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }

    tracing::info!(user_id = id, "Deleted user");
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
