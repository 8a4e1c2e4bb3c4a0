//! Shared response body types for API handlers.

use serde::Serialize;

/// Plain `{ "message": ... }` status body, used where an operation has no
/// entity to return (login, logout, delete).
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
