//! Probe executor: one unauthenticated GET per profile URL.
//!
//! Probes are never retried. A failed request is reported to the classifier
//! as a [`ProbeFailure`] and ends up as an uncertain verdict, which keeps
//! the load placed on third-party sites to one request per task.

use crate::error::{Result, ScanError};
use async_trait::async_trait;
use handlehunt_core::ScanningConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// Final HTTP status code
    pub status: u16,
    /// URL after following redirects
    pub final_url: String,
    /// Response body as received
    pub body: String,
    /// Lower-cased body, used for case-insensitive matching
    pub body_lower: String,
}

impl ProbeResponse {
    /// Build a response, computing the lower-cased body.
    #[must_use]
    pub fn new(status: u16, final_url: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let body_lower = body.to_lowercase();
        Self {
            status,
            final_url: final_url.into(),
            body,
            body_lower,
        }
    }
}

/// Transport-level failure of a probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// The request did not complete within the timeout
    #[error("Request timeout")]
    Timeout,

    /// The connection could not be established
    #[error("Connection error")]
    Connection,

    /// Any other transport or protocol error
    #[error("Request error: {0}")]
    Other(String),
}

impl ProbeFailure {
    fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Outcome of a single probe.
pub type ProbeResult = std::result::Result<ProbeResponse, ProbeFailure>;

/// Something that can fetch a profile URL.
///
/// The orchestrator only depends on this trait, so scans can be driven by
/// [`HttpProber`] in production and by scripted probers in tests.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Issue one request for `url` and report what came back.
    async fn probe(&self, url: &str) -> ProbeResult;
}

/// [`Prober`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Build a prober with browser-like headers, redirect following and a timeout.
    ///
    /// # Errors
    /// Returns error if a header value is invalid or the client cannot be created.
    pub fn new(config: &ScanningConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value("accept", &config.accept)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("accept_language", &config.accept_language)?,
        );

        let client = Client::builder()
            .user_agent(header_value("user_agent", &config.user_agent)?)
            .default_headers(headers)
            .redirect(Policy::limited(config.max_redirects))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScanError::HttpClient(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ScanError::HttpClient(format!("invalid {field} header value: {e}")))
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeFailure::from_reqwest(&e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| ProbeFailure::from_reqwest(&e))?;

        debug!(
            url,
            status,
            final_url = %final_url,
            bytes = body.len(),
            "probe completed"
        );

        Ok(ProbeResponse::new(status, final_url, body))
    }
}
