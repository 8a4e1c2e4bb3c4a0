//! Repository for the `conversations` table.

use sqlx::PgPool;
use ollachat_core::types::DbId;

use crate::models::conversation::{Conversation, CreateConversation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, session_id, user_message, ai_message, timestamp";

/// Provides insert and read operations for conversation turns.
///
/// Turns are immutable once written, so there is no update method.
pub struct ConversationRepo;

impl ConversationRepo {
    /// Record a completed turn, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateConversation,
    ) -> Result<Conversation, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversations (user_id, session_id, user_message, ai_message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(input.user_id)
            .bind(input.session_id)
            .bind(&input.user_message)
            .bind(&input.ai_message)
            .fetch_one(pool)
            .await
    }

    /// List the turns of a session in chronological order.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversations
             WHERE session_id = $1
             ORDER BY timestamp ASC, id ASC"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Count the turns recorded for a session.
    pub async fn count_for_session(pool: &PgPool, session_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM conversations WHERE session_id = $1")
                .bind(session_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
