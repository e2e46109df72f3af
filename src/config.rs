//! Exporter configuration.
//!
//! The config is a JSON document next to the state snapshot. Missing values
//! are filled in by the `ensure_*_defaults` functions, and a config that
//! gained defaults while loading is written back so the file documents the
//! effective settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::auth::grant::OAUTH_URL;

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "ring-config.json";

/// State snapshot file name, placed in the config file's directory.
pub const STATE_FILE: &str = "ring-state.json";

/// Default Ring API base URL.
pub const API_BASE_URL: &str = "https://api.ring.com";

const DEFAULT_INTERVAL_SECS: u32 = 5 * 60;
const DEFAULT_PORT: u16 = 9100;
const DEFAULT_METRICS_ROUTE: &str = "/metrics";

/// Config load/save errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings for talking to the Ring API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Stable client hardware id reported to the session endpoint.
    #[serde(default)]
    pub hardware_id: String,
    /// Token endpoint for the password grant.
    #[serde(default)]
    pub oauth_url: String,
    /// Base URL of the clients API.
    #[serde(default)]
    pub api_base_url: String,
}

/// Settings for the metrics web server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WebConfig {
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub metrics_route: String,
}

/// Top-level exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_config: ApiConfig,
    #[serde(default)]
    pub web_config: WebConfig,
    #[serde(default)]
    pub poll_interval_seconds: u32,
    #[serde(default)]
    pub save_interval_seconds: u32,
}

impl Config {
    /// A config with every default applied.
    pub fn with_defaults() -> Self {
        let mut config = Self::default();
        ensure_config_defaults(&mut config);
        config
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_interval_seconds.max(1)))
    }

    pub fn save_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.save_interval_seconds.max(1)))
    }
}

/// Fill missing API settings. Returns `true` if anything changed.
pub fn ensure_api_config_defaults(config: &mut ApiConfig) -> bool {
    let mut dirty = false;
    if config.hardware_id.is_empty() {
        dirty = true;
        config.hardware_id = uuid::Uuid::new_v4().to_string();
    }
    if config.oauth_url.is_empty() {
        dirty = true;
        config.oauth_url = OAUTH_URL.to_string();
    }
    if config.api_base_url.is_empty() {
        dirty = true;
        config.api_base_url = API_BASE_URL.to_string();
    }
    dirty
}

/// Fill missing web settings. Returns `true` if anything changed.
pub fn ensure_web_config_defaults(config: &mut WebConfig) -> bool {
    let mut dirty = false;
    if config.port == 0 {
        dirty = true;
        config.port = DEFAULT_PORT;
    }
    if config.metrics_route.is_empty() {
        dirty = true;
        config.metrics_route = DEFAULT_METRICS_ROUTE.to_string();
    } else if !config.metrics_route.starts_with('/') {
        dirty = true;
        config.metrics_route = format!("/{}", config.metrics_route);
    }
    dirty
}

/// Fill every missing setting. Returns `true` if anything changed.
pub fn ensure_config_defaults(config: &mut Config) -> bool {
    let mut dirty = false;
    if config.poll_interval_seconds == 0 {
        dirty = true;
        config.poll_interval_seconds = DEFAULT_INTERVAL_SECS;
    }
    if config.save_interval_seconds == 0 {
        dirty = true;
        config.save_interval_seconds = DEFAULT_INTERVAL_SECS;
    }
    // Evaluate both so each section gets its defaults.
    let api_dirty = ensure_api_config_defaults(&mut config.api_config);
    let web_dirty = ensure_web_config_defaults(&mut config.web_config);
    dirty || api_dirty || web_dirty
}

/// Load a config file, applying and persisting defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: Config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if ensure_config_defaults(&mut config) {
        tracing::info!("Config {} gained default values; saving", path.display());
        if let Err(e) = save_config(path, &config) {
            tracing::warn!("{}", e);
        }
    }

    Ok(config)
}

/// Write a config file (mode 0600 on unix).
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    let data = serde_json::to_string_pretty(config)
        .map_err(|e| write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    fs::write(path, data).map_err(write_err)?;
    restrict_permissions(path).map_err(write_err)?;
    Ok(())
}

/// Path of the state snapshot belonging to a config file.
pub fn state_file_for(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|dir| dir.join(STATE_FILE))
        .unwrap_or_else(|| PathBuf::from(STATE_FILE))
}

#[cfg(unix)]
pub(crate) fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
pub(crate) fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_defaults_on_empty_config() {
        let mut config = Config::default();
        assert!(ensure_config_defaults(&mut config));
        assert_eq!(config.poll_interval_seconds, 300);
        assert_eq!(config.save_interval_seconds, 300);
        assert_eq!(config.web_config.port, 9100);
        assert_eq!(config.web_config.metrics_route, "/metrics");
        assert_eq!(config.api_config.oauth_url, OAUTH_URL);
        assert_eq!(config.api_config.api_base_url, API_BASE_URL);
        assert!(uuid::Uuid::parse_str(&config.api_config.hardware_id).is_ok());

        // A second pass is a no-op.
        assert!(!ensure_config_defaults(&mut config));
    }

    #[test]
    fn test_ensure_defaults_keeps_existing_values() {
        let mut config = Config::with_defaults();
        config.poll_interval_seconds = 60;
        config.web_config.port = 9200;
        config.api_config.hardware_id = "fixed".to_string();
        assert!(!ensure_config_defaults(&mut config));
        assert_eq!(config.poll_interval_seconds, 60);
        assert_eq!(config.web_config.port, 9200);
        assert_eq!(config.api_config.hardware_id, "fixed");
    }

    #[test]
    fn test_metrics_route_gets_leading_slash() {
        let mut web = WebConfig {
            port: 1,
            metrics_route: "prom".to_string(),
        };
        assert!(ensure_web_config_defaults(&mut web));
        assert_eq!(web.metrics_route, "/prom");
    }

    #[test]
    fn test_load_config_writes_back_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, r#"{"poll_interval_seconds": 30}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.poll_interval_seconds, 30);
        assert_eq!(config.save_interval_seconds, 300);

        let reloaded: Config =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_config_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_state_file_for() {
        assert_eq!(
            state_file_for(Path::new("/etc/ring/ring-config.json")),
            PathBuf::from("/etc/ring/ring-state.json")
        );
        assert_eq!(
            state_file_for(Path::new("ring-config.json")),
            PathBuf::from("ring-state.json")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_save_config_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        save_config(&path, &Config::with_defaults()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
