//! Relays generated fragments to the client and hands the finished turn to
//! the [`TurnRecorder`].
//!
//! The relay runs in its own task so the handler can return response headers
//! immediately. Fragments flow to the client through a bounded channel in
//! upstream order. Each fragment the client accepted is also appended to a
//! [`Transcript`]; once the upstream ends, the client body is closed first
//! and only then is the turn queued for persistence.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use ollachat_core::chat::Transcript;
use ollachat_core::types::DbId;
use ollachat_db::models::conversation::CreateConversation;
use ollachat_inference::{FragmentStream, StreamError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::background::turn_recorder::TurnRecorder;

/// Sent to the client in place of a line that could not be decoded.
pub const DECODE_ERROR_MARKER: &str = "\n[Error parsing chunk]\n";

/// Fragments buffered between the relay task and the client body.
const RELAY_BUFFER: usize = 32;

/// The prompt half of a turn whose response is still being generated.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub user_id: DbId,
    pub session_id: Option<DbId>,
    pub user_message: String,
    pub recorder: Arc<TurnRecorder>,
}

impl PendingTurn {
    async fn complete(self, ai_message: String) {
        let turn = CreateConversation {
            user_id: self.user_id,
            session_id: self.session_id,
            user_message: self.user_message,
            ai_message,
        };
        self.recorder.record(turn).await;
    }
}

/// Start relaying `upstream` and return the client-facing body.
///
/// When `pending` is `Some`, the accumulated response is recorded after the
/// stream ends. If the client went away before any fragment was delivered,
/// nothing is recorded.
pub fn relay_fragments(upstream: FragmentStream, pending: Option<PendingTurn>) -> Body {
    let (tx, rx) = mpsc::channel::<Result<String, Infallible>>(RELAY_BUFFER);

    tokio::spawn(async move {
        let mut upstream = upstream;
        let mut transcript = Transcript::new();
        let mut client_gone = false;

        loop {
            let item = tokio::select! {
                biased;
                () = tx.closed() => {
                    client_gone = true;
                    break;
                }
                item = upstream.next() => item,
            };
            let Some(item) = item else { break };

            let (chunk, keep) = match item {
                Ok(text) => (text, true),
                Err(e) if e.is_fatal() => {
                    tracing::warn!(
                        error = %e,
                        fragments = transcript.fragment_count(),
                        "Generation stream ended early"
                    );
                    break;
                }
                Err(e) => (inline_marker(&e), false),
            };

            if tx.send(Ok(chunk.clone())).await.is_err() {
                client_gone = true;
                break;
            }
            if keep {
                transcript.push(&chunk);
            }
        }

        drop(tx);
        drop(upstream);

        let Some(pending) = pending else { return };

        if client_gone && transcript.is_empty() {
            tracing::debug!(
                session_id = ?pending.session_id,
                "Client left before any fragment, nothing to record"
            );
            return;
        }
        if client_gone {
            tracing::info!(
                session_id = ?pending.session_id,
                fragments = transcript.fragment_count(),
                "Client disconnected mid-stream, recording partial turn"
            );
        }

        pending.complete(transcript.into_text()).await;
    });

    Body::from_stream(ReceiverStream::new(rx))
}

/// Wrap a relay body as a chunked `text/plain` response.
pub fn text_stream(body: Body) -> Response {
    let mut response = body.into_response();
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn inline_marker(err: &StreamError) -> String {
    match err {
        StreamError::Upstream(message) => {
            tracing::warn!(%message, "Inference server reported an error mid-stream");
            format!("\n[Error: {message}]\n")
        }
        other => {
            tracing::warn!(error = %other, "Skipping undecodable stream line");
            DECODE_ERROR_MARKER.to_string()
        }
    }
}
