//! SyncTV room playlist client

mod api_types;
mod client;

#[cfg(test)]
mod tests;

pub use client::SyncTvClient;

use crate::manifest::ImportItem;
use async_trait::async_trait;

/// Sync result type
pub type Result<T> = std::result::Result<T, SyncError>;

/// SyncTV error types
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Login failed: {status} - {message}")]
    Auth { status: u16, message: String },

    #[error("Login response carried no token")]
    MissingToken,

    #[error("Clearing playlist failed: {status} - {message}")]
    Clear { status: u16, message: String },

    #[error("Import rejected: {status} - {message}")]
    Submission { status: u16, message: String },
}

/// Operations the import needs from a SyncTV server
#[async_trait]
pub trait SyncServer: Send + Sync {
    /// Log in and return a bearer token
    async fn login(&self, username: &str, password: &str) -> Result<String>;

    /// Remove every movie from the room playlist
    async fn clear_playlist(&self, token: &str, room_id: &str) -> Result<()>;

    /// Push a batch of movies, returning how many were imported
    async fn push_movies(&self, token: &str, room_id: &str, items: &[ImportItem])
    -> Result<usize>;
}
