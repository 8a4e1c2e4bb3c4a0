//! Account input rules.
//!
//! Limits mirror the column widths of the `users` table so that bad input is
//! rejected with a 400 before it reaches the database.

use crate::error::CoreError;

/// Maximum length of a username (`users.username VARCHAR(20)`).
pub const MAX_USERNAME_LEN: usize = 20;

/// Maximum length of a display name (`users.full_name VARCHAR(50)`).
pub const MAX_FULL_NAME_LEN: usize = 50;

/// Validate a username for registration.
///
/// Usernames must be non-empty, at most [`MAX_USERNAME_LEN`] characters, and
/// must not carry leading or trailing whitespace.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()));
    }
    if username.trim() != username {
        return Err(CoreError::Validation(
            "Username must not start or end with whitespace".into(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters long"
        )));
    }
    Ok(())
}

/// Validate an optional display name.
pub fn validate_full_name(full_name: Option<&str>) -> Result<(), CoreError> {
    match full_name {
        Some(name) if name.chars().count() > MAX_FULL_NAME_LEN => Err(CoreError::Validation(
            format!("Full name must be at most {MAX_FULL_NAME_LEN} characters long"),
        )),
        _ => Ok(()),
    }
}

/// Validate that a password was supplied at all.
///
/// No strength policy is enforced beyond presence.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.is_empty() {
        return Err(CoreError::Validation("Password must not be empty".into()));
    }
    Ok(())
}
