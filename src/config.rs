//! Application configuration
//!
//! Values are layered: built-in defaults, then the TOML file, then
//! `SYNCTV_COLLECTOR_*` environment variables. Command line flags are applied
//! on top by the binary.

use crate::{
    collector::TransportConfig,
    pipeline::{Credentials, SyncTarget},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use validator::Validate;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SYNCTV_COLLECTOR";

const APP_DIR: &str = "synctv-collector";
const CONFIG_FILE: &str = "config.toml";

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    /// SyncTV server base URL
    #[validate(url)]
    pub synctv_url: String,
    pub username: String,
    pub password: String,
    /// Target room id
    pub room_id: String,
    /// Collector id from the registry
    pub collector: String,
    /// Bearer token reused instead of logging in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Retries per collector host after the first attempt
    #[validate(range(max = 10))]
    pub retries: u32,
    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
    /// Skip TLS certificate verification for collector hosts
    pub accept_invalid_certs: bool,
    /// JSON file with extra collectors
    pub custom_collectors_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            synctv_url: "http://localhost:8080".to_string(),
            username: "root".to_string(),
            password: "root".to_string(),
            room_id: String::new(),
            collector: "1".to_string(),
            token: None,
            retries: 2,
            timeout_secs: 10,
            accept_invalid_certs: false,
            custom_collectors_file: PathBuf::from("collectors_custom.json"),
        }
    }
}

impl AppConfig {
    /// Default config file location, `~/.config/synctv-collector/config.toml` on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path` (optional file) and the process environment
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process one
    pub fn load_with_env(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        debug!("Loading configuration from {}", path.display());

        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;

        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout(),
            accept_invalid_certs: self.accept_invalid_certs,
            ..Default::default()
        }
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Saved token when present, username and password otherwise
    pub fn credentials(&self) -> Credentials {
        match self.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => Credentials::Token(token.to_string()),
            None => Credentials::Password {
                username: self.username.clone(),
                password: self.password.clone(),
            },
        }
    }

    pub fn sync_target(&self, clear_before: bool) -> SyncTarget {
        SyncTarget {
            room_id: self.room_id.clone(),
            credentials: self.credentials(),
            clear_before,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env() -> Option<HashMap<String, String>> {
        Some(HashMap::new())
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_with_env(&dir.path().join("missing.toml"), no_env()).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_values_merge_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "room_id = \"abc\"\ncollector = \"5\"\nretries = 4\n",
        )
        .unwrap();

        let config = AppConfig::load_with_env(&path, no_env()).unwrap();

        assert_eq!(config.room_id, "abc");
        assert_eq!(config.collector, "5");
        assert_eq!(config.retries, 4);
        assert_eq!(config.username, "root");
        assert_eq!(config.synctv_url, "http://localhost:8080");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "room_id = \"from-file\"\n").unwrap();

        let env = HashMap::from([
            ("SYNCTV_COLLECTOR_ROOM_ID".to_string(), "from-env".to_string()),
            ("SYNCTV_COLLECTOR_TIMEOUT_SECS".to_string(), "30".to_string()),
        ]);
        let config = AppConfig::load_with_env(&path, Some(env)).unwrap();

        assert_eq!(config.room_id, "from-env");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "synctv_url = \"not a url\"\n").unwrap();

        let err = AppConfig::load_with_env(&path, no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = AppConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            room_id: "room".to_string(),
            token: Some("tok".to_string()),
            ..Default::default()
        };

        config.save(&path).unwrap();
        let loaded = AppConfig::load_with_env(&path, no_env()).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_credentials_prefer_token() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.credentials(),
            Credentials::Password { ref username, .. } if username == "root"
        ));

        config.token = Some(String::new());
        assert!(matches!(config.credentials(), Credentials::Password { .. }));

        config.token = Some("tok".to_string());
        assert!(matches!(config.credentials(), Credentials::Token(ref t) if t == "tok"));
    }
}
