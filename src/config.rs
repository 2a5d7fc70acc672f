//! Configuration module for filedrop.

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::datetime::parse_timezone;
use crate::store::DEFAULT_MAX_UPLOAD_SIZE;
use crate::{FiledropError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timezone for listing timestamps (e.g., "Asia/Tokyo", "UTC").
    /// The host's local zone is used when unset.
    #[serde(default)]
    pub timezone: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timezone: None,
        }
    }
}

/// Storage configuration.
///
/// Relative paths are resolved against the install directory.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded files.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
    /// Directory holding the static pages.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// Maximum upload request size in megabytes (0 = unlimited).
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_max_upload_size() -> u64 {
    DEFAULT_MAX_UPLOAD_SIZE / 1024 / 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            public_dir: default_public_dir(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

impl StorageConfig {
    /// Upload request limit in bytes, `None` when unlimited.
    pub fn max_upload_bytes(&self) -> Option<usize> {
        match self.max_upload_size_mb {
            0 => None,
            mb => Some(usize::try_from(mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file; console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FiledropError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FiledropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `HOST`: Override the listen host
    /// - `PORT`: Override the listen port
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` (used by `apply_env_overrides`).
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST").filter(|v| !v.is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| FiledropError::Config(format!("invalid PORT value: {port:?}")))?;
        }

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The configured timezone is unknown
    /// - `uploads_dir` or `public_dir` is empty
    pub fn validate(&self) -> Result<()> {
        self.timezone()?;

        if self.storage.uploads_dir.trim().is_empty() {
            return Err(FiledropError::Config(
                "storage.uploads_dir must not be empty".to_string(),
            ));
        }
        if self.storage.public_dir.trim().is_empty() {
            return Err(FiledropError::Config(
                "storage.public_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured listing timezone, if any.
    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.server
            .timezone
            .as_deref()
            .map(parse_timezone)
            .transpose()
    }

    /// Resolve a configured path against the install directory.
    pub fn resolve_path(base: &Path, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}
