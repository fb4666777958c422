use super::{CollectorError, Endpoint, FetchError, Result, Transport};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// GET with per-host retries and fallback to backup hosts
///
/// Every candidate of the endpoint gets `max_retries + 1` attempts. Transport,
/// status and malformed-body failures are retried immediately on the same
/// host; TLS failures move on to the next host at once. The first successful
/// body is returned and later hosts are never contacted.
#[derive(Clone)]
pub struct ResilientFetcher {
    transport: Arc<dyn Transport>,
}

impl ResilientFetcher {
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn fetch(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, &str)],
        max_retries: u32,
    ) -> Result<Value> {
        let mut attempts = 0usize;
        let mut last_error: Option<FetchError> = None;

        for (index, url) in endpoint.candidates().enumerate() {
            if index > 0 {
                info!("Falling back to backup host {}/{}: {}", index, endpoint.len() - 1, url);
            }

            for attempt in 0..=max_retries {
                attempts += 1;
                match self.transport.get_json(url, query).await {
                    Ok(body) => {
                        debug!("{} succeeded on attempt {}", url, attempt + 1);
                        return Ok(body);
                    }
                    Err(err) if !err.is_retryable() => {
                        warn!("{} failed without retry: {}", url, err);
                        last_error = Some(err);
                        break;
                    }
                    Err(err) => {
                        if attempt < max_retries {
                            warn!(
                                "{} failed ({}), retrying ({}/{})",
                                url,
                                err,
                                attempt + 1,
                                max_retries
                            );
                        } else {
                            warn!("{} failed ({}), giving up on this host", url, err);
                        }
                        last_error = Some(err);
                    }
                }
            }
        }

        // Endpoints always have a primary, so at least one attempt was made
        let last = last_error
            .unwrap_or_else(|| FetchError::Transport("no attempt made".to_string()));

        Err(CollectorError::Unreachable { attempts, last })
    }
}
