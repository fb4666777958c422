use super::api_types::VodRecord;
use crate::manifest::{PlaySourceGroup, PlaySourceSplitter};
use serde::Deserialize;
use serde_json::Value;

/// Placeholder for missing display fields
pub const UNKNOWN: &str = "unknown";

/// One search hit from a collector
///
/// Display fields are optional and read with an "unknown" default. The raw
/// JSON record is kept alongside the typed view.
#[derive(Debug, Clone)]
pub struct SearchResult {
    record: VodRecord,
    raw: Value,
}

impl SearchResult {
    /// Build from a raw record; non-object records yield `None`
    pub fn from_value(raw: Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }
        let record = VodRecord::deserialize(&raw).ok()?;
        Some(Self { record, raw })
    }

    /// Collector-specific identifier used for detail lookups
    pub fn id(&self) -> Option<&str> {
        self.record.vod_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn name(&self) -> &str {
        display(self.record.vod_name.as_deref())
    }

    pub fn category(&self) -> &str {
        display(self.record.type_name.as_deref())
    }

    pub fn year(&self) -> &str {
        display(self.record.vod_year.as_deref())
    }

    pub fn area(&self) -> &str {
        display(self.record.vod_area.as_deref())
    }

    pub fn director(&self) -> &str {
        display(self.record.vod_director.as_deref())
    }

    pub fn actor(&self) -> &str {
        display(self.record.vod_actor.as_deref())
    }

    pub fn content(&self) -> &str {
        display(self.record.vod_content.as_deref())
    }

    /// Raw `$$$`-separated play source labels
    pub fn play_from(&self) -> &str {
        self.record.vod_play_from.as_deref().unwrap_or_default()
    }

    /// Raw playback manifest
    pub fn play_url(&self) -> &str {
        self.record.vod_play_url.as_deref().unwrap_or_default()
    }

    pub fn has_manifest(&self) -> bool {
        !self.play_url().trim().is_empty()
    }

    /// Split the manifest into play source groups
    pub fn play_sources(&self) -> Vec<PlaySourceGroup> {
        PlaySourceSplitter::split(self.play_from(), self.play_url())
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

fn display(field: Option<&str>) -> &str {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN)
}
