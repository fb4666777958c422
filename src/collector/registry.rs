use super::{CollectorError, Endpoint, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Built-in collector sites: display name and API base
const BUILTIN_COLLECTORS: &[(&str, &str)] = &[
    ("量子资源", "https://cj.lziapi.com/api.php/provide/vod/"),
    ("360资源", "https://360zy5.com/api.php/provide/vod/"),
    ("红牛资源", "http://hongniuzy2.com/api.php/provide/vod/"),
    ("速播资源", "https://subocaiji.com/api.php/provide/vod/"),
    ("最大资源", "https://api.zuidapi.com/api.php/provide/vod/"),
    ("卧龙资源", "https://collect.wolongzyw.com/api.php/provide/vod/"),
    ("光速资源", "https://api.guangsuapi.com/api.php/provide/vod/"),
    ("新浪资源", "https://api.xinlangapi.com/xinlangapi.php/provide/vod/"),
    ("无尽资源", "https://api.wujinapi.com/api.php/provide/vod/"),
];

/// The only response format collectors are queried with
const JSON_FORMAT: &str = "json";

fn default_format() -> String {
    JSON_FORMAT.to_string()
}

/// Entry of the custom collectors file
///
/// ```json
/// { "My site": { "api": "https://x/api.php/provide/vod/", "backups": ["https://y/..."] } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCollector {
    pub api: String,
    #[serde(rename = "type", default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub backups: Vec<String>,
}

/// A selectable collector site
#[derive(Debug, Clone)]
pub struct CollectorInfo {
    /// Menu id, "1" upwards
    pub id: String,
    pub name: String,
    pub endpoint: Endpoint,
    /// Response format, only "json" is understood
    pub format: String,
    /// Loaded from the custom collectors file
    pub custom: bool,
}

/// Ordered set of collectors, built-ins first
#[derive(Debug, Clone)]
pub struct CollectorRegistry {
    collectors: Vec<CollectorInfo>,
}

impl CollectorRegistry {
    /// Registry holding only the built-in collectors
    pub fn builtin() -> Self {
        let collectors = BUILTIN_COLLECTORS
            .iter()
            .enumerate()
            .filter_map(|(index, (name, api))| {
                Endpoint::new(*api).ok().map(|endpoint| CollectorInfo {
                    id: (index + 1).to_string(),
                    name: (*name).to_string(),
                    endpoint,
                    format: default_format(),
                    custom: false,
                })
            })
            .collect();

        Self { collectors }
    }

    /// Built-ins plus the collectors of `path`.
    ///
    /// A missing file is fine; an unreadable one is logged and skipped.
    pub fn with_custom_file(path: &Path) -> Self {
        let mut registry = Self::builtin();

        match load_custom_file(path) {
            Ok(custom) if custom.is_empty() => {
                debug!("No custom collectors in {}", path.display());
            }
            Ok(custom) => {
                info!("Loaded {} custom collectors from {}", custom.len(), path.display());
                registry.extend_custom(custom);
            }
            Err(e) => {
                warn!("Failed to load custom collectors from {}: {}", path.display(), e);
            }
        }

        registry
    }

    /// Append custom collectors, numbering them after the existing entries.
    ///
    /// Entries with a response format other than `json` are skipped.
    pub fn extend_custom(&mut self, custom: Vec<(String, CustomCollector)>) {
        for (name, collector) in custom {
            if !collector.format.eq_ignore_ascii_case(JSON_FORMAT) {
                warn!(
                    "Skipping custom collector {}: unsupported format {:?}",
                    name, collector.format
                );
                continue;
            }

            let endpoint = match Endpoint::with_backups(collector.api, collector.backups) {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    warn!("Skipping custom collector {}: {}", name, e);
                    continue;
                }
            };

            self.collectors.push(CollectorInfo {
                id: (self.collectors.len() + 1).to_string(),
                name,
                endpoint,
                format: JSON_FORMAT.to_string(),
                custom: true,
            });
        }
    }

    pub fn get(&self, id: &str) -> Result<&CollectorInfo> {
        let id = id.trim();
        self.collectors
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CollectorError::UnknownCollector(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectorInfo> {
        self.collectors.iter()
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }
}

impl Default for CollectorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Read the custom collectors file, keeping file order
pub fn load_custom_file(path: &Path) -> Result<Vec<(String, CustomCollector)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let text = std::fs::read_to_string(path)?;
    let entries: serde_json::Map<String, Value> = serde_json::from_str(&text)?;

    let mut custom = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        custom.push((name, serde_json::from_value(value)?));
    }

    Ok(custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_ids() {
        let registry = CollectorRegistry::builtin();

        assert_eq!(registry.len(), 9);
        assert_eq!(registry.get("1").unwrap().name, "量子资源");
        assert_eq!(registry.get(" 9 ").unwrap().name, "无尽资源");
        assert!(registry.iter().all(|c| !c.custom));
    }

    #[test]
    fn test_unknown_collector() {
        let registry = CollectorRegistry::builtin();
        assert!(matches!(
            registry.get("42"),
            Err(CollectorError::UnknownCollector(id)) if id == "42"
        ));
    }

    #[test]
    fn test_custom_file_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collectors_custom.json");
        std::fs::write(
            &path,
            r#"{
                "Zeta": {"api": "https://z/api.php/provide/vod/"},
                "Alpha": {"api": "https://a/api.php/provide/vod/", "backups": ["https://a2/api.php/provide/vod/"]}
            }"#,
        )
        .unwrap();

        let registry = CollectorRegistry::with_custom_file(&path);

        assert_eq!(registry.len(), 11);
        let zeta = registry.get("10").unwrap();
        assert_eq!(zeta.name, "Zeta");
        assert!(zeta.custom);
        assert_eq!(zeta.format, "json");

        let alpha = registry.get("11").unwrap();
        assert_eq!(alpha.name, "Alpha");
        assert_eq!(alpha.endpoint.backups(), ["https://a2/api.php/provide/vod/"]);
    }

    #[test]
    fn test_non_json_custom_collector_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collectors_custom.json");
        std::fs::write(
            &path,
            r#"{
                "Xml": {"api": "https://x/api.php/provide/vod/at/xml/", "type": "xml"},
                "Json": {"api": "https://j/api.php/provide/vod/", "type": "JSON"}
            }"#,
        )
        .unwrap();

        let registry = CollectorRegistry::with_custom_file(&path);

        assert_eq!(registry.len(), 10);
        let json = registry.get("10").unwrap();
        assert_eq!(json.name, "Json");
        assert_eq!(json.format, "json");
        assert!(registry.iter().all(|c| c.name != "Xml"));
    }

    #[test]
    fn test_missing_custom_file() {
        let dir = TempDir::new().unwrap();
        let registry = CollectorRegistry::with_custom_file(&dir.path().join("none.json"));
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn test_malformed_custom_file_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let registry = CollectorRegistry::with_custom_file(&path);
        assert_eq!(registry.len(), 9);
        assert!(load_custom_file(&path).is_err());
    }
}
