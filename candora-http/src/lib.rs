//! candora-http
//!
//! Production [`Transport`] that issues a plain GET through `reqwest` and
//! decodes the body as JSON. Clients built here send only the
//! `candora/<version>` user agent; no retries.
#![warn(missing_docs)]

use std::time::Duration;

use async_trait::async_trait;
use candora_core::{CandoraError, Transport};
use serde_json::Value;
use url::Url;

const USER_AGENT: &str = concat!("candora/", env!("CARGO_PKG_VERSION"));

/// HTTP transport backed by a shared `reqwest::Client`.
///
/// Error bodies that are valid JSON are returned as `Ok` regardless of the
/// HTTP status, so provider error payloads (`{"code":..,"msg":..}`,
/// `["error", ..]`) reach the dispatcher's classification instead of being
/// flattened into a transport failure.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Transport with a fresh client and no client-level timeout.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the underlying client cannot be built.
    pub fn try_new() -> Result<Self, CandoraError> {
        Self::build(None)
    }

    /// Transport over an existing client, used as-is.
    ///
    /// Headers, proxies and timeouts are whatever `client` was built with.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Transport whose client aborts any request taking longer than `timeout`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the underlying client cannot be built.
    pub fn try_with_timeout(timeout: Duration) -> Result<Self, CandoraError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, CandoraError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let client = builder
            .build()
            .map_err(|e| CandoraError::InvalidArg(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn map_reqwest(&self, url: &Url, err: &reqwest::Error) -> CandoraError {
        if err.is_timeout()
            && let Some(limit) = self.timeout
        {
            return CandoraError::RequestTimeout {
                url: url.to_string(),
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            };
        }
        CandoraError::transport(url.as_str(), err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "candora_http::fetch_json", skip(self), fields(url = %url))
    )]
    async fn fetch_json(&self, url: &Url) -> Result<Value, CandoraError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_reqwest(url, &e))?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| self.map_reqwest(url, &e))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "response received");

        serde_json::from_slice::<Value>(&body).map_err(|e| {
            let msg = if status.is_success() {
                format!("invalid JSON body: {e}")
            } else {
                format!("HTTP {status} with non-JSON body")
            };
            CandoraError::transport(url.as_str(), msg)
        })
    }
}
