//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to `auth::credentials`, the repositories in
//! `ollachat_db`, or the inference client, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod chat;
pub mod sessions;
pub mod users;
