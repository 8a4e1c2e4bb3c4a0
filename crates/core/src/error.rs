use crate::types::DbId;

/// Why a credential or bearer token was rejected.
///
/// Every variant is reported to clients as a plain 401; the distinction only
/// exists for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("token signature is invalid or the token is malformed")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token carries no subject")]
    MissingSubject,

    #[error("incorrect username or password")]
    InvalidCredentials,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
}
