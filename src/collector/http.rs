use super::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::error::Error;
use std::time::Duration;
use tracing::trace;

/// Collector sites reject unknown clients, so requests look like a browser
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fragments of error messages produced by the TLS stack
const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

/// A single GET attempt returning a JSON body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<Value, FetchError>;
}

/// HTTP settings for collector requests
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-attempt timeout, connect and read included
    pub timeout: Duration,
    pub user_agent: String,
    /// Skip certificate verification (many collectors use broken certificates)
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }
}

/// `reqwest` backed transport
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }

    /// Get the underlying reqwest client
    #[must_use]
    pub const fn inner(&self) -> &Client {
        &self.client
    }

    fn classify(err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::Transport(format!("timed out: {err}"));
        }
        if is_tls_error(err) {
            return FetchError::Tls(err.to_string());
        }
        FetchError::Transport(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Self::classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| Self::classify(&e))?;
        trace!("{} returned {} bytes", url, body.len());

        serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

/// Walk the error chain looking for a TLS failure.
///
/// The top-level message contains the request URL, so only the sources are
/// inspected.
fn is_tls_error(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string().to_ascii_lowercase();
        if TLS_MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        source = cause.source();
    }
    false
}
