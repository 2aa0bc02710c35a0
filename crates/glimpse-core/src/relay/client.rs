//! Upstream client for the chat-completions API.
//!
//! The relay talks to the provider through the [`UpstreamClient`] trait so
//! tests can substitute a stub. [`HttpUpstreamClient`] is the reqwest-backed
//! implementation used in production.

use super::encode::InferenceRequest;
use crate::config::{Config, Credential};
use crate::error::UpstreamError;
use async_trait::async_trait;
use std::time::Duration;

/// Raw reply from the upstream: status code and body text.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Turn a non-2xx reply into [`UpstreamError::Status`].
    pub fn error_for_status(self) -> Result<Self, UpstreamError> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(UpstreamError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Trait for sending inference requests upstream.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the relay holds an `Arc<dyn UpstreamClient>`).
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Client name for logging.
    fn name(&self) -> &str;

    /// Send one request. Exactly one attempt is made.
    async fn send(&self, request: &InferenceRequest) -> Result<UpstreamResponse, UpstreamError>;
}

/// Chat-completions client over HTTPS with bearer authentication.
pub struct HttpUpstreamClient {
    credential: Credential,
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpUpstreamClient {
    /// Create a client for `endpoint`.
    ///
    /// Redirects are not followed: a 3xx reply is returned as-is and becomes
    /// an [`UpstreamError::Status`] at the relay.
    pub fn new(
        credential: Credential,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| UpstreamError::Network {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            credential,
            endpoint: endpoint.to_string(),
            timeout,
            client,
        })
    }

    /// Build a client from the upstream and limits sections of the config.
    pub fn from_config(config: &Config, credential: Credential) -> Result<Self, UpstreamError> {
        Self::new(
            credential,
            &config.upstream.endpoint,
            Duration::from_millis(config.limits.upstream_timeout_ms),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            // Strip the URL so the error stays short; it never carries headers.
            UpstreamError::Network {
                message: e.without_url().to_string(),
            }
        }
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: &InferenceRequest) -> Result<UpstreamResponse, UpstreamError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", self.credential.bearer())
            .header("Content-Type", "application/json")
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.map_send_error(e))?;

        tracing::debug!(status, body_len = body.len(), "Upstream replied");
        Ok(UpstreamResponse { status, body })
    }
}
