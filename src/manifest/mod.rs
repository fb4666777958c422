//! Playback manifest parsing
//!
//! Collectors describe a title's playable media as two strings:
//! `vod_play_from` (source labels) and `vod_play_url` (episode manifests),
//! both using `$$$` between play sources.

mod file;
mod parser;
mod splitter;
mod types;

pub use file::LineFileParser;
pub use parser::{ManifestParser, SOURCE_SEPARATOR};
pub use splitter::{DEFAULT_SOURCE_LABEL, PlaySourceSplitter};
pub use types::{Episode, ImportItem, PlaySourceGroup};
