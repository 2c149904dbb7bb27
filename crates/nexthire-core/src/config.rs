//! Configuration management for Next Hire.
//!
//! Loads configuration from ${NEXTHIRE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for Next Hire configuration and data directories.
    //!
    //! NEXTHIRE_HOME resolution order:
    //! 1. NEXTHIRE_HOME environment variable (if set)
    //! 2. ~/.config/nexthire (default)
    //! 3. ./.nexthire when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the Next Hire home directory.
    pub fn nexthire_home() -> PathBuf {
        if let Ok(home) = std::env::var("NEXTHIRE_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".nexthire"),
            |h| h.join(".config").join("nexthire"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        nexthire_home().join("config.toml")
    }

    /// Returns the path to the persisted credential file.
    pub fn credentials_path() -> PathBuf {
        nexthire_home().join("credentials.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        nexthire_home().join("logs")
    }
}

/// Where the login credential is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// `credentials.json` in the home directory (shared by all running clients).
    #[default]
    File,
    /// Process-local storage, lost on exit.
    Memory,
    /// Storage turned off; credentials always read as absent.
    Disabled,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API base URL
    pub backend_url: Option<String>,
    /// Credential storage backend
    pub storage: StorageKind,
    /// Credential lifetime in days
    pub credential_ttl_days: u32,
    /// Backend request timeout in seconds (0 = disabled)
    pub request_timeout_secs: u32,
    /// Fallback log filter when NEXTHIRE_LOG is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";
    pub const DEFAULT_CREDENTIAL_TTL_DAYS: u32 = 7;
    /// Default is disabled
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 0;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to `path`.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Returns the request timeout, or None if disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Credential TTL, never below one day.
    pub fn credential_ttl_days(&self) -> u32 {
        self.credential_ttl_days.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            storage: StorageKind::default(),
            credential_ttl_days: Self::DEFAULT_CREDENTIAL_TTL_DAYS,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: None,
        }
    }
}
