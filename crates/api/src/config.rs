use ollachat_inference::InferenceConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Bounds the time to
    /// response headers; streamed bodies are bounded by the inference timeout.
    pub request_timeout_secs: u64,
    /// How long shutdown waits for queued turns to be written (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Whether the auth cookie carries the `Secure` attribute (default: `false`).
    pub cookie_secure: bool,
    /// Capacity of the completed-turn persistence queue (default: `256`).
    pub persist_queue_capacity: usize,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Inference server endpoint, default model, and timeouts.
    pub inference: InferenceConfig,
}

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:8080,http://127.0.0.1:8080,http://localhost:8081,http://127.0.0.1:8081";

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                 |
    /// |--------------------------|-----------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                               |
    /// | `PORT`                   | `5000`                                  |
    /// | `CORS_ORIGINS`           | `localhost`/`127.0.0.1` on 8080 and 8081 |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `5`                                     |
    /// | `COOKIE_SECURE`          | `false`                                 |
    /// | `PERSIST_QUEUE_CAPACITY` | `256`                                   |
    ///
    /// JWT and inference settings are read by [`JwtConfig::from_env`] and
    /// [`InferenceConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be `true` or `false`");

        let persist_queue_capacity: usize = std::env::var("PERSIST_QUEUE_CAPACITY")
            .unwrap_or_else(|_| "256".into())
            .parse()
            .expect("PERSIST_QUEUE_CAPACITY must be a valid usize");
        assert!(
            persist_queue_capacity > 0,
            "PERSIST_QUEUE_CAPACITY must be greater than zero"
        );

        let jwt = JwtConfig::from_env();
        let inference = InferenceConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            cookie_secure,
            persist_queue_capacity,
            jwt,
            inference,
        }
    }
}
