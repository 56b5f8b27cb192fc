//! Client configuration and credentials.
//!
//! `ClientConfig` is an explicit, immutable value owned by the client
//! instance rather than ambient state, so multiple clients with
//! different credentials can coexist.

use std::time::Duration;

use super::constants;
use super::error::ApiError;
use super::retry::RetryConfig;

/// Credential attached as a bearer-style `Authorization` header to
/// every outgoing request. Token acquisition and refresh happen in a
/// separate login flow outside this crate.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Static API key used directly as the bearer value.
    ApiKey(String),
    /// Session token produced by an external login flow.
    BearerToken(String),
}

impl Credential {
    pub fn bearer_value(&self) -> &str {
        match self {
            Credential::ApiKey(key) => key,
            Credential::BearerToken(token) => token,
        }
    }
}

/// Immutable configuration shared read-only by every request of a
/// client, including concurrently in-flight ones.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub credential: Credential,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Configuration with the default timeout and retry policy. A
    /// trailing slash on the base URL is trimmed so paths concatenate
    /// cleanly.
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            credential,
            timeout: Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Build a configuration from environment variables, loading a
    /// `.env` file when present. `AUXO_BASE_URL` and `AUXO_API_KEY` are
    /// required; `AUXO_TIMEOUT_SECS` overrides the default timeout.
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("AUXO_BASE_URL")
            .map_err(|_| ApiError::Validation("AUXO_BASE_URL is not set".to_string()))?;
        let api_key = std::env::var("AUXO_API_KEY")
            .map_err(|_| ApiError::Validation("AUXO_API_KEY is not set".to_string()))?;

        let mut config = Self::new(base_url, Credential::ApiKey(api_key));

        if let Ok(secs) = std::env::var("AUXO_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ApiError::Validation(format!("AUXO_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::new(
            "https://api.auxo.example/",
            Credential::ApiKey("key".to_string()),
        );
        assert_eq!(config.base_url, "https://api.auxo.example");
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new(
            "https://api.auxo.example",
            Credential::ApiKey("key".to_string()),
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new(
            "https://api.auxo.example",
            Credential::BearerToken("session-token".to_string()),
        )
        .with_timeout(Duration::from_secs(5))
        .with_retry(RetryConfig::none());

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.credential.bearer_value(), "session-token");
    }
}
