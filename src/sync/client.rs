use super::{
    Result, SyncError, SyncServer,
    api_types::{ClearRequest, ErrorResponse, LoginRequest, LoginResponse},
};
use crate::manifest::ImportItem;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bulk pushes can be large, so they get a longer timeout
const PUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the SyncTV REST API
#[derive(Clone)]
pub struct SyncTvClient {
    client: Client,
    base_url: String,
}

impl SyncTvClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("synctv-collector/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build full URL from endpoint
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Error text from a failed response: the `error` field when the body is
    /// JSON, the raw body otherwise
    async fn error_message(response: Response) -> String {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or(text)
    }
}

#[async_trait]
impl SyncServer for SyncTvClient {
    async fn login(&self, username: &str, password: &str) -> Result<String> {
        debug!("Logging in to {} as {}", self.base_url, username);

        let response = self
            .client
            .post(self.url("/api/user/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = Self::error_message(response).await;
            return Err(SyncError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let body: LoginResponse = response.json().await?;
        let token = body
            .data
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or(SyncError::MissingToken)?;

        info!("Logged in to {} as {}", self.base_url, username);
        Ok(token)
    }

    async fn clear_playlist(&self, token: &str, room_id: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/room/movie/clear"))
            .query(&[("roomId", room_id)])
            .bearer_auth(token)
            .json(&ClearRequest { parent_id: "" })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
            info!("Cleared playlist of room {}", room_id);
            return Ok(());
        }

        let message = Self::error_message(response).await;

        // The server answers 400 "not found" when the playlist is already empty
        if status == StatusCode::BAD_REQUEST && message.to_lowercase().contains("not found") {
            info!("Playlist of room {} already empty", room_id);
            return Ok(());
        }

        warn!("Clearing room {} failed: {} {}", room_id, status, message);
        Err(SyncError::Clear {
            status: status.as_u16(),
            message,
        })
    }

    async fn push_movies(
        &self,
        token: &str,
        room_id: &str,
        items: &[ImportItem],
    ) -> Result<usize> {
        debug!("Pushing {} movies to room {}", items.len(), room_id);

        let response = self
            .client
            .post(self.url("/api/room/movie/pushs"))
            .query(&[("roomId", room_id)])
            .bearer_auth(token)
            .timeout(PUSH_TIMEOUT)
            .json(items)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = Self::error_message(response).await;
            warn!("Import into room {} rejected: {} {}", room_id, status, message);
            return Err(SyncError::Submission {
                status: status.as_u16(),
                message,
            });
        }

        info!("Imported {} movies into room {}", items.len(), room_id);
        Ok(items.len())
    }
}
