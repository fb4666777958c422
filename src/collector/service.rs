use super::{
    Endpoint, ResilientFetcher, Result, SearchResult, Transport, api_types::normalize_envelope,
};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Default number of retries per host
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Search and detail client for one collector endpoint
#[derive(Clone)]
pub struct CollectorClient {
    fetcher: ResilientFetcher,
    endpoint: Endpoint,
    max_retries: u32,
}

impl CollectorClient {
    pub fn new<T: Transport + 'static>(transport: T, endpoint: Endpoint) -> Self {
        Self {
            fetcher: ResilientFetcher::new(transport),
            endpoint,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_fetcher(fetcher: ResilientFetcher, endpoint: Endpoint) -> Self {
        Self {
            fetcher,
            endpoint,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set retries per host
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Search by keyword.
    ///
    /// An empty vector means the collector had no match. Errors mean no host
    /// answered, or the answer had neither a `list` nor a `data` array.
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        info!("Searching {} for {:?}", self.endpoint.primary(), keyword);

        let body = self
            .fetcher
            .fetch(&self.endpoint, &[("wd", keyword)], self.max_retries)
            .await?;

        let results = Self::normalize(body)?;
        info!("Found {} results for {:?}", results.len(), keyword);

        Ok(results)
    }

    /// Fetch the full record of a search hit.
    ///
    /// Any failure is logged and reported as `None`.
    pub async fn detail(&self, id: &str) -> Option<SearchResult> {
        debug!("Fetching detail for {}", id);

        let body = match self
            .fetcher
            .fetch(
                &self.endpoint,
                &[("ac", "detail"), ("ids", id)],
                self.max_retries,
            )
            .await
        {
            Ok(body) => body,
            Err(e) => {
                warn!("Detail request for {} failed: {}", id, e);
                return None;
            }
        };

        match Self::normalize(body) {
            Ok(results) => {
                let first = results.into_iter().next();
                if first.is_none() {
                    warn!("Detail response for {} is empty", id);
                }
                first
            }
            Err(e) => {
                warn!("Detail response for {} not understood: {}", id, e);
                None
            }
        }
    }

    fn normalize(body: Value) -> Result<Vec<SearchResult>> {
        let items = normalize_envelope(body).inspect_err(|e| warn!("{}", e))?;

        let total = items.len();
        let results: Vec<SearchResult> = items
            .into_iter()
            .filter_map(SearchResult::from_value)
            .collect();

        if results.len() < total {
            debug!("Skipped {} non-object records", total - results.len());
        }

        Ok(results)
    }
}
