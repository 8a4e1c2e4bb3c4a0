//! Conversation turn model and DTOs.
//!
//! A conversation row is one prompt/response pair. Rows are written once the
//! full response has been assembled and are never updated afterwards.

use serde::Serialize;
use sqlx::FromRow;
use ollachat_core::types::{DbId, Timestamp};

/// A row from the `conversations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: DbId,
    #[serde(skip)]
    pub user_id: DbId,
    /// `None` for single-shot turns recorded outside any session.
    pub session_id: Option<DbId>,
    pub user_message: String,
    pub ai_message: String,
    pub timestamp: Timestamp,
}

/// DTO for recording a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateConversation {
    pub user_id: DbId,
    pub session_id: Option<DbId>,
    pub user_message: String,
    pub ai_message: String,
}
