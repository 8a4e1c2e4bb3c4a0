//! Chat session model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use ollachat_core::types::{DbId, Timestamp};

/// A row from the `chat_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatSession {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new chat session.
#[derive(Debug)]
pub struct CreateChatSession {
    pub user_id: DbId,
    pub title: String,
}
