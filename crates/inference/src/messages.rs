//! Payloads exchanged with the generation endpoint.
//!
//! A streamed `/api/generate` response is newline-delimited JSON. Each line
//! carries the next piece of text in `response`; the final line has
//! `"done": true` and usually an empty `response`. A failure mid-generation
//! arrives as a line with an `error` field.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/generate`.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// One line of a streamed generate response.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of `GET /api/tags`.
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// A locally available model as listed by `/api/tags`.
#[derive(Debug, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

/// Parse a single raw stream line into a [`GenerateChunk`].
///
/// Works on bytes so that a line with invalid UTF-8 is a parse error like any
/// other malformed line.
pub fn parse_chunk(line: &[u8]) -> Result<GenerateChunk, serde_json::Error> {
    serde_json::from_slice(line)
}
