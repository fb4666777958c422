mod api_types;
mod endpoint;
mod fetcher;
mod http;
mod registry;
mod service;
mod types;


pub use api_types::normalize_envelope;
pub use endpoint::Endpoint;
pub use fetcher::ResilientFetcher;
pub use http::{ReqwestTransport, Transport, TransportConfig};
pub use registry::{CollectorInfo, CollectorRegistry, CustomCollector};
pub use service::{CollectorClient, DEFAULT_MAX_RETRIES};
pub use types::SearchResult;

/// Collector result type
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Failure of a single HTTP attempt against one collector host
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Whether another attempt against the same host may succeed
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Tls(_))
    }
}

/// Collector error types
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("All collector hosts unreachable after {attempts} attempts, last error: {last}")]
    Unreachable { attempts: usize, last: FetchError },

    #[error("Unknown response format, top-level keys: {0:?}")]
    UnknownEnvelope(Vec<String>),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Unknown collector: {0}")]
    UnknownCollector(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
