//! Deferred persistence of completed conversation turns.
//!
//! The streaming relay hands each finished turn to a [`TurnRecorder`], which
//! queues it on a bounded channel. A single worker ([`TurnRecorder::run`])
//! drains the queue and writes rows through [`ConversationRepo`]. Write
//! failures are logged and never reach the client, whose response has
//! already completed by then.

use ollachat_db::models::conversation::CreateConversation;
use ollachat_db::repositories::ConversationRepo;
use ollachat_db::DbPool;
use tokio::sync::mpsc;

/// Sending half of the completed-turn queue.
#[derive(Debug, Clone)]
pub struct TurnRecorder {
    sender: mpsc::Sender<CreateConversation>,
}

impl TurnRecorder {
    /// Create a recorder with room for `capacity` queued turns.
    ///
    /// Returns the receiver to pass to [`TurnRecorder::run`].
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<CreateConversation>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Queue a completed turn. Waits while the queue is full.
    pub async fn record(&self, turn: CreateConversation) {
        let user_id = turn.user_id;
        let session_id = turn.session_id;
        if self.sender.send(turn).await.is_err() {
            tracing::error!(
                user_id,
                ?session_id,
                "Turn recorder is closed, dropping completed turn"
            );
        }
    }

    /// Run the persistence loop.
    ///
    /// Writes every queued turn in arrival order. The loop exits once every
    /// [`TurnRecorder`] has been dropped and the queue is empty.
    pub async fn run(pool: DbPool, mut receiver: mpsc::Receiver<CreateConversation>) {
        tracing::info!("Turn recorder started");

        while let Some(turn) = receiver.recv().await {
            match ConversationRepo::create(&pool, &turn).await {
                Ok(row) => tracing::debug!(
                    conversation_id = row.id,
                    session_id = ?row.session_id,
                    ai_len = row.ai_message.len(),
                    "Recorded conversation turn"
                ),
                Err(e) => tracing::error!(
                    error = %e,
                    user_id = turn.user_id,
                    session_id = ?turn.session_id,
                    "Failed to record conversation turn"
                ),
            }
        }

        tracing::info!("Turn recorder queue closed, worker shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(text: &str) -> CreateConversation {
        CreateConversation {
            user_id: 1,
            session_id: Some(7),
            user_message: "hi".to_string(),
            ai_message: text.to_string(),
        }
    }

    #[tokio::test]
    async fn queued_turns_arrive_in_order() {
        let (recorder, mut receiver) = TurnRecorder::new(4);

        recorder.record(turn("first")).await;
        recorder.record(turn("second")).await;

        assert_eq!(receiver.recv().await, Some(turn("first")));
        assert_eq!(receiver.recv().await, Some(turn("second")));
    }

    #[tokio::test]
    async fn queue_closes_when_all_recorders_drop() {
        let (recorder, mut receiver) = TurnRecorder::new(1);
        let clone = recorder.clone();

        clone.record(turn("only")).await;
        drop(recorder);
        drop(clone);

        assert_eq!(receiver.recv().await, Some(turn("only")));
        assert_eq!(receiver.recv().await, None);
    }

    #[tokio::test]
    async fn record_after_worker_exit_does_not_panic() {
        let (recorder, receiver) = TurnRecorder::new(1);
        drop(receiver);

        recorder.record(turn("lost")).await;
    }
}
