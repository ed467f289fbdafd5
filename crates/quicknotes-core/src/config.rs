//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/quicknotes/config.toml)
//! 3. Environment variables (QUICKNOTES_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "QUICKNOTES";

/// Keys accepted by [`Config::set_value`]
pub const CONFIG_KEYS: &[&str] = &[
    "snapshot_path",
    "host",
    "port",
    "server_url",
    "log_level",
    "log_file",
];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Snapshot file; relative paths resolve against the working directory
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Address the server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL the client commands talk to
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Log level for the server (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            host: default_host(),
            port: default_port(),
            server_url: default_server_url(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (QUICKNOTES_SNAPSHOT_PATH, QUICKNOTES_PORT, ...)
    /// 2. Config file (~/.config/quicknotes/config.toml or QUICKNOTES_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load only what the config file says, ignoring environment variables
    ///
    /// Use this when the result is saved back to the file, so that
    /// `QUICKNOTES_*` overrides are not persisted.
    pub fn load_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_SNAPSHOT_PATH", ENV_PREFIX)) {
            self.snapshot_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_HOST", ENV_PREFIX)) {
            self.host = val;
        }

        // Unparseable values are ignored rather than fatal
        if let Some(port) = std::env::var(format!("{}_PORT", ENV_PREFIX))
            .ok()
            .and_then(|val| val.trim().parse::<u16>().ok())
        {
            self.port = port;
        }

        if let Ok(val) = std::env::var(format!("{}_SERVER_URL", ENV_PREFIX)) {
            self.server_url = val;
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            self.log_level = val;
        }

        // Empty string clears it
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Save configuration to a specific path, creating parent directories
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Set a single key from its string form
    ///
    /// `log_file` accepts an empty string or "none" to unset it.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "snapshot_path" => self.snapshot_path = PathBuf::from(value),
            "host" => self.host = value.to_string(),
            "port" => {
                self.port = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid port: '{}'", value))?;
            }
            "server_url" => self.server_url = value.to_string(),
            "log_level" => self.log_level = value.to_string(),
            "log_file" => {
                self.log_file = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with QUICKNOTES_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quicknotes")
            .join("config.toml")
    }

    /// `host:port` for binding the server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("notes_data.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_server_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
