//! Client for an Ollama-compatible text generation server.
//!
//! - [`api`] -- HTTP wrapper around `/api/generate` and `/api/tags`.
//! - [`messages`] -- request/response payloads and single-line decoding.
//! - [`stream`] -- turns a line-delimited byte stream into text fragments.
//! - [`config`] -- endpoint, default model, and timeouts from the environment.

pub mod api;
pub mod config;
pub mod messages;
pub mod stream;

pub use api::{InferenceError, OllamaApi};
pub use config::InferenceConfig;
pub use stream::{FragmentStream, StreamError, MAX_LINE_BYTES};
