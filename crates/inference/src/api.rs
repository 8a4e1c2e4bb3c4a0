//! REST API client for the generation server.
//!
//! Wraps `POST /api/generate` (streaming) and `GET /api/tags` using
//! [`reqwest`].

use std::time::Duration;

use crate::config::InferenceConfig;
use crate::messages::{GenerateRequest, TagsResponse};
use crate::stream::{fragments, FragmentStream};

/// HTTP client for a single inference server.
#[derive(Debug, Clone)]
pub struct OllamaApi {
    client: reqwest::Client,
    api_url: String,
    default_model: String,
}

/// Errors from the inference REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The HTTP request itself failed (connect, timeout, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Inference API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body, surfaced to the caller.
        body: String,
    },
}

impl OllamaApi {
    /// Create a client with the configured connect timeout and overall
    /// request deadline.
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(
            client,
            config.api_url.clone(),
            config.default_model.clone(),
        ))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, default_model: String) -> Self {
        Self {
            client,
            api_url,
            default_model,
        }
    }

    /// Model used when a request does not name one.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Start a streamed generation.
    ///
    /// Sends `POST /api/generate` with `{model, prompt, stream: true}`. A
    /// non-2xx status is returned as [`InferenceError::ApiError`] with the
    /// server's body. On success the body is returned as a lazy
    /// [`FragmentStream`]; nothing past the headers has been read yet.
    pub async fn generate_stream(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<FragmentStream, InferenceError> {
        let body = GenerateRequest {
            model,
            prompt,
            stream: true,
        };

        tracing::debug!(model, prompt_len = prompt.len(), "Opening generate stream");

        let response = self
            .client
            .post(format!("{}/api/generate", self.api_url))
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(fragments(response.bytes_stream()))
    }

    /// List the names of locally available models.
    pub async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.api_url))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let tags = response.json::<TagsResponse>().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`InferenceError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, InferenceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(InferenceError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::Router;
    use futures::StreamExt;

    /// Serve `app` on an ephemeral local port and return its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn generate_stream_yields_fragments() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async {
                "{\"response\":\"a\"}\n{\"response\":\"b\"}\n{\"response\":\"\",\"done\":true}\n"
            }),
        );
        let api = OllamaApi::new(&InferenceConfig::for_url(serve(app).await)).unwrap();

        let stream = api.generate_stream("m", "hi").await.unwrap();
        let texts: Vec<String> = stream.map(Result::unwrap).collect().await;

        assert_eq!(texts, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn non_success_status_carries_body() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::NOT_FOUND, "model 'ghost' not found") }),
        );
        let api = OllamaApi::new(&InferenceConfig::for_url(serve(app).await)).unwrap();

        let result = api.generate_stream("ghost", "hi").await;

        assert_matches!(
            result.err(),
            Some(InferenceError::ApiError { status: 404, body }) if body.contains("ghost")
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_request_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = OllamaApi::new(&InferenceConfig::for_url(format!("http://{addr}"))).unwrap();
        let result = api.generate_stream("m", "hi").await;

        assert_matches!(result.err(), Some(InferenceError::Request(_)));
    }

    #[tokio::test]
    async fn list_models_returns_names() {
        let app = Router::new().route(
            "/api/tags",
            get(|| async {
                axum::Json(serde_json::json!({
                    "models": [{"name": "llama3:8b", "size": 1}, {"name": "deepseek-r1:latest"}]
                }))
            }),
        );
        let api = OllamaApi::new(&InferenceConfig::for_url(serve(app).await)).unwrap();

        let models = api.list_models().await.unwrap();

        assert_eq!(models, vec!["llama3:8b", "deepseek-r1:latest"]);
    }
}
