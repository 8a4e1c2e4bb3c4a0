use std::sync::Arc;

use ollachat_inference::OllamaApi;

use crate::background::turn_recorder::TurnRecorder;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ollachat_db::DbPool,
    /// Server configuration (JWT secret, cookie flags, timeouts).
    pub config: Arc<ServerConfig>,
    /// Client for the text generation server.
    pub inference: Arc<OllamaApi>,
    /// Queue that persists completed turns off the request path.
    pub turn_recorder: Arc<TurnRecorder>,
}
