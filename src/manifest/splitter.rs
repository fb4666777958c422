use super::{
    parser::{ManifestParser, SOURCE_SEPARATOR},
    types::PlaySourceGroup,
};

/// Label used when a record carries manifests but no source names
pub const DEFAULT_SOURCE_LABEL: &str = "Default";

/// Splits `vod_play_from` / `vod_play_url` pairs into play source groups
pub struct PlaySourceSplitter;

impl PlaySourceSplitter {
    /// Pair source labels with manifests by position.
    ///
    /// Pairing stops at the shorter side: extra labels or extra manifests are
    /// dropped, matching what collectors have always been read as.
    pub fn split(source_labels: &str, raw_manifests: &str) -> Vec<PlaySourceGroup> {
        if raw_manifests.trim().is_empty() {
            return Vec::new();
        }

        let labels: Vec<&str> = if source_labels.is_empty() {
            vec![DEFAULT_SOURCE_LABEL]
        } else {
            source_labels.split(SOURCE_SEPARATOR).collect()
        };

        let manifests: Vec<&str> = if raw_manifests.contains(SOURCE_SEPARATOR) {
            raw_manifests.split(SOURCE_SEPARATOR).collect()
        } else {
            vec![raw_manifests]
        };

        labels
            .into_iter()
            .zip(manifests)
            .map(|(label, manifest)| PlaySourceGroup {
                source: label.to_string(),
                episodes: ManifestParser::parse(manifest),
            })
            .collect()
    }
}
