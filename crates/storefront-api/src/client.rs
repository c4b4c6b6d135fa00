//! HTTP client for the storefront's commerce REST API.
//!
//! Wraps `reqwest` with base-URL handling, FastAPI-style error bodies, and
//! retry of idempotent requests. Endpoint methods live next to their domain:
//! [`crate::cart`], [`crate::catalog`], [`crate::orders`], [`crate::chat`].

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_core::AppConfig;

use crate::error::ApiError;
use crate::retry::retry_with_backoff;

/// Client for the commerce REST API.
///
/// Use [`CommerceClient::from_config`] in binaries or [`CommerceClient::new`]
/// to point at a mock server in tests. Retries are off until
/// [`CommerceClient::with_retry_policy`] enables them.
#[derive(Debug, Clone)]
pub struct CommerceClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CommerceClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot be
    /// built, or [`ApiError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        // A single trailing slash makes `Url::join` append below the API
        // prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Builds a client from application config, including its retry policy.
    ///
    /// # Errors
    ///
    /// Same as [`CommerceClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            &config.api_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry_policy(config.max_retries, config.retry_backoff_base_ms))
    }

    /// Enables retry of idempotent requests on transient failures.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` (no leading slash) against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })
    }

    /// Sends a request and decodes a JSON response body into `T`.
    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.send(method, &url, body).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Like [`Self::send_json`] but maps an empty body to `T::default()`.
    pub(crate) async fn send_ack<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let text = self.send(method, &url, body).await?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Sends one request, asserts a 2xx status, and returns the body text.
    ///
    /// `GET`, `PUT` and `DELETE` are retried on transient errors. `POST` is
    /// sent once, since replaying an add or an order could duplicate it.
    async fn send<B>(&self, method: Method, url: &Url, body: Option<&B>) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let payload = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::Deserialize {
                context: format!("request body for {url}"),
                source: e,
            })?;

        let max_retries = if method == Method::POST {
            0
        } else {
            self.max_retries
        };

        retry_with_backoff(max_retries, self.backoff_base_ms, || {
            let method = method.clone();
            let payload = payload.clone();
            async move {
                let mut request = self.client.request(method.clone(), url.clone());
                if let Some(payload) = &payload {
                    request = request.json(payload);
                }
                let response = request.send().await?;
                let status = response.status();
                let text = response.text().await?;

                if !status.is_success() {
                    tracing::debug!(%method, %url, status = status.as_u16(), "commerce API returned error status");
                    return Err(ApiError::Status {
                        status: status.as_u16(),
                        url: url.to_string(),
                        detail: error_detail(status, &text),
                    });
                }
                Ok(text)
            }
        })
        .await
    }
}

/// Extracts the FastAPI-style `detail` message from an error body, falling
/// back to the canonical reason phrase.
pub(crate) fn error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
