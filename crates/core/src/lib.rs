//! Shared domain types, errors, and input rules for the ollachat backend.

pub mod accounts;
pub mod chat;
pub mod error;
pub mod types;
