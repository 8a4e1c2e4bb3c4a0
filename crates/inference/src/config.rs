/// Default generation endpoint base URL (the `ollama` service in compose).
const DEFAULT_API_URL: &str = "http://ollama:11434";
/// Model used when a request does not name one.
const DEFAULT_MODEL: &str = "deepseek-r1:latest";
/// Upper bound on a whole generation request, headers through last byte.
const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Upper bound on establishing the TCP/TLS connection.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the inference server.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:11434`.
    pub api_url: String,
    pub default_model: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl InferenceConfig {
    /// Load inference configuration from environment variables.
    ///
    /// | Env Var                       | Default                |
    /// |-------------------------------|------------------------|
    /// | `OLLAMA_API_URL`              | `http://ollama:11434`  |
    /// | `OLLAMA_DEFAULT_MODEL`        | `deepseek-r1:latest`   |
    /// | `OLLAMA_TIMEOUT_SECS`         | `300`                  |
    /// | `OLLAMA_CONNECT_TIMEOUT_SECS` | `10`                   |
    ///
    /// # Panics
    ///
    /// Panics if a timeout variable is set but is not a valid `u64`.
    pub fn from_env() -> Self {
        let api_url = std::env::var("OLLAMA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let default_model =
            std::env::var("OLLAMA_DEFAULT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let timeout_secs: u64 = std::env::var("OLLAMA_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("OLLAMA_TIMEOUT_SECS must be a valid u64");

        let connect_timeout_secs: u64 = std::env::var("OLLAMA_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_CONNECT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("OLLAMA_CONNECT_TIMEOUT_SECS must be a valid u64");

        Self::new(api_url, default_model, timeout_secs, connect_timeout_secs)
    }

    /// Build a config directly. Trailing slashes on `api_url` are dropped.
    pub fn new(
        api_url: impl Into<String>,
        default_model: impl Into<String>,
        timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            api_url,
            default_model: default_model.into(),
            timeout_secs,
            connect_timeout_secs,
        }
    }

    /// Config pointing at `api_url` with the default model and timeouts.
    pub fn for_url(api_url: impl Into<String>) -> Self {
        Self::new(
            api_url,
            DEFAULT_MODEL,
            DEFAULT_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = InferenceConfig::for_url("http://localhost:11434/");
        assert_eq!(config.api_url, "http://localhost:11434");
        assert_eq!(config.default_model, DEFAULT_MODEL);
    }
}
