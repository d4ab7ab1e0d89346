//! Configuration management for Stackdock.
//!
//! Configuration is read from `~/.config/stackdock/config.toml` at startup
//! unless another path is given. If the file doesn't exist, a default
//! configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scheduler::SchedulerConfig;
use crate::sync::DEFAULT_MAX_ITEMS_PER_FEED;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub fetcher: FetcherConfig,
    pub ingest: IngestConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; the platform data directory is used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("stackdock/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub max_items_per_feed: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_items_per_feed: DEFAULT_MAX_ITEMS_PER_FEED,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/stackdock/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("stackdock").join("config.toml"))
    }

    /// Database path from the config, or `<data_dir>/stackdock/stackdock.db`.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        let stackdock_dir = data_dir.join("stackdock");
        fs::create_dir_all(&stackdock_dir).map_err(|e| ConfigError::Io {
            path: stackdock_dir.clone(),
            source: e,
        })?;
        Ok(stackdock_dir.join("stackdock.db"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Stackdock Configuration
#
# Intervals are written as a number with a unit: "30s", "15m", "1h", "1d".
# A bare number is read as seconds.

[server]
host = "127.0.0.1"
port = 8080

[store]
# SQLite database file. Defaults to the platform data directory.
# path = "/home/me/.local/share/stackdock/stackdock.db"

[fetcher]
# Per-request timeout in seconds
timeout_secs = 30

[ingest]
# Entries taken from the top of each feed per sweep
max_items_per_feed = 5

[scheduler]
# Run the sweeps in the background while serving
enabled = true

# Re-check unread articles for content changes
update_interval = "1h"

# Poll subscribed feeds for new entries
feed_interval = "1h"

# Run both sweeps once as soon as the server starts
run_on_start = false
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
