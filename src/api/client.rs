//! The request dispatcher: authenticated HTTP calls with timeout and
//! retry against the Auxo Online service.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::config::ClientConfig;
use super::constants::{self, headers};
use super::envelope::ApiResponse;
use super::error::ApiError;
use super::retry::RetryPolicy;

/// HTTP verbs accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }

    /// Only GETs are retried automatically; a mutating verb executed
    /// twice could duplicate side effects.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Verb::Get)
    }

    fn method(&self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Patch => reqwest::Method::PATCH,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxo Online Web API client with connection pooling. Cloning is cheap
/// and clones share the same immutable configuration.
#[derive(Clone)]
pub struct AuxoClient {
    config: Arc<ClientConfig>,
    http_client: reqwest::Client,
    retry_policy: RetryPolicy,
}

impl AuxoClient {
    pub fn new(config: ClientConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(constants::USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        let retry_policy = RetryPolicy::new(config.retry.clone());

        Self {
            config: Arc::new(config),
            http_client,
            retry_policy,
        }
    }

    /// Create a client around a caller-supplied `reqwest::Client`. The
    /// caller then owns pool and timeout tuning.
    pub fn with_custom_client(config: ClientConfig, http_client: reqwest::Client) -> Self {
        let retry_policy = RetryPolicy::new(config.retry.clone());
        Self {
            config: Arc::new(config),
            http_client,
            retry_policy,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform an authenticated call and decode the response body.
    ///
    /// `path` already carries any query string; the full URL is the
    /// configured base URL plus `path`. A non-2xx response becomes
    /// [`ApiError::Http`] with the upstream body unmodified.
    pub async fn request(
        &self,
        verb: Verb,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!("{} {}", verb, url);

        let response = self
            .retry_policy
            .execute(verb.is_idempotent(), || {
                let mut request = self
                    .http_client
                    .request(verb.method(), &url)
                    .bearer_auth(self.config.credential.bearer_value())
                    .header("Accept", headers::CONTENT_TYPE_JSON);
                if let Some(body) = &body {
                    request = request.json(body);
                }
                request.send()
            })
            .await
            .map_err(|error| self.map_transport_error(verb, path, error))?;

        self.decode_response(verb, path, response).await
    }

    /// Perform a call and deserialize the decoded body into `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        verb: Verb,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let value = self.request(verb, path, body).await?;
        serde_json::from_value(value).map_err(|error| ApiError::Decode {
            verb: verb.as_str(),
            path: path.to_string(),
            detail: error.to_string(),
        })
    }

    /// GET a listing endpoint, passing the pagination envelope through.
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request_as(Verb::Get, path, None).await
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Verb::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Verb::Post, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Verb::Put, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Verb::Patch, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Verb::Delete, path, None).await
    }

    fn map_transport_error(&self, verb: Verb, path: &str, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout {
                verb: verb.as_str(),
                path: path.to_string(),
            }
        } else {
            ApiError::Transport {
                verb: verb.as_str(),
                path: path.to_string(),
                source: error,
            }
        }
    }

    async fn decode_response(
        &self,
        verb: Verb,
        path: &str,
        response: reqwest::Response,
    ) -> Result<Value, ApiError> {
        let status = response.status();

        if status.is_success() {
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            let text = response
                .text()
                .await
                .map_err(|error| self.map_transport_error(verb, path, error))?;
            if text.is_empty() {
                return Ok(Value::Null);
            }
            // Non-JSON bodies are preserved as strings rather than dropped.
            Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        } else {
            let text = response.text().await.unwrap_or_default();
            let body = if text.is_empty() {
                None
            } else {
                Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
            };
            Err(ApiError::Http {
                verb: verb.as_str(),
                path: path.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::Credential;

    #[test]
    fn test_verb_strings() {
        assert_eq!(Verb::Get.as_str(), "GET");
        assert_eq!(Verb::Patch.as_str(), "PATCH");
        assert_eq!(Verb::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_only_get_is_idempotent() {
        assert!(Verb::Get.is_idempotent());
        assert!(!Verb::Post.is_idempotent());
        assert!(!Verb::Put.is_idempotent());
        assert!(!Verb::Patch.is_idempotent());
        assert!(!Verb::Delete.is_idempotent());
    }

    #[test]
    fn test_clones_share_config() {
        let client = AuxoClient::new(ClientConfig::new(
            "https://api.auxo.example",
            Credential::ApiKey("key".to_string()),
        ));
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.config, &clone.config));
    }
}
