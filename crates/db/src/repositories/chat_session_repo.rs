//! Repository for the `chat_sessions` table.

use sqlx::PgPool;
use ollachat_core::types::DbId;

use crate::models::chat_session::{ChatSession, CreateChatSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, created_at";

/// Provides CRUD operations for chat sessions.
pub struct ChatSessionRepo;

impl ChatSessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateChatSession,
    ) -> Result<ChatSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_sessions (user_id, title)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatSession>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }

    /// Find a session by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ChatSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chat_sessions WHERE id = $1");
        sqlx::query_as::<_, ChatSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's sessions, most recently created first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ChatSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_sessions
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ChatSession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a session together with all of its conversation turns.
    ///
    /// Both deletes run in one transaction so no orphaned turns can remain.
    /// Returns `true` if the session existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let turns = sqlx::query("DELETE FROM conversations WHERE session_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(
                session_id = id,
                turns_deleted = turns.rows_affected(),
                "Deleted chat session"
            );
        }
        Ok(deleted)
    }
}
