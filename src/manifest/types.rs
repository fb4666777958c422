use serde::{Deserialize, Serialize};

/// A single playable episode of a play source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Display name, e.g. "第1集" or "Episode 3"
    pub name: String,
    /// Playable URL
    pub url: String,
}

impl Episode {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One provider's episode set for a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaySourceGroup {
    /// Source label as reported by the collector (e.g. "lzm3u8")
    pub source: String,
    /// Episodes in manifest order
    pub episodes: Vec<Episode>,
}

impl PlaySourceGroup {
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Movie entry pushed into a SyncTV room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportItem {
    pub url: String,
    pub name: String,
}

impl ImportItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

impl From<Episode> for ImportItem {
    fn from(episode: Episode) -> Self {
        Self {
            url: episode.url,
            name: episode.name,
        }
    }
}

impl From<&Episode> for ImportItem {
    fn from(episode: &Episode) -> Self {
        Self {
            url: episode.url.clone(),
            name: episode.name.clone(),
        }
    }
}
