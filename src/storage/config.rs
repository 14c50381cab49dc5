//! Application configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "GEMHUNTER_CONFIG";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "GEMHUNTER_PORT";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Attraction store settings
    pub storage: StorageSettings,
    /// Proximity discovery settings
    pub discovery: DiscoverySettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Base URL prepended to relative attraction icons
    pub public_base_url: String,
    /// Directory served at `/` (icons and other assets)
    pub static_dir: PathBuf,
    /// Origin allowed by CORS (the web client)
    pub cors_origin: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            public_base_url: "http://localhost:3001".to_string(),
            static_dir: PathBuf::from("public"),
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// Which attraction store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local SQLite file
    #[default]
    Embedded,
    /// Another GemHunter instance over HTTP
    Remote,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Embedded => write!(f, "embedded"),
            StorageBackend::Remote => write!(f, "remote"),
        }
    }
}

/// Attraction store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Working database; defaults to `gem.db` in the data directory
    pub database_path: Option<PathBuf>,
    /// Read-only database shipped with the app, copied on first run
    pub bundled_database: Option<PathBuf>,
    /// Re-copy the bundled database on every start, discarding progress
    pub reset_on_start: bool,
    /// Seed the Turin demo attractions into an empty database
    pub seed_demo_data: bool,
    /// Base URL of the remote instance (remote backend only)
    pub remote_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Embedded,
            database_path: None,
            bundled_database: None,
            reset_on_start: false,
            seed_demo_data: true,
            remote_url: "http://localhost:3001".to_string(),
        }
    }
}

impl StorageSettings {
    /// Resolve the working database path.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| get_data_dir().join("gem.db"))
    }
}

/// Proximity discovery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Distance in meters under which a gem is found
    pub radius_meters: f64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            radius_meters: 10.0,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "gemhunter", "GemHunter")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| get_data_dir().join("config.toml"))
}

/// Load application configuration, falling back to defaults when no file exists.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;

    if let Ok(port) = std::env::var(PORT_ENV) {
        config.server.port = port
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{PORT_ENV}={port}")))?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

impl AppConfig {
    /// Reject values the rest of the app cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.discovery.radius_meters.is_finite() && self.discovery.radius_meters > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "discovery.radius_meters = {}",
                self.discovery.radius_meters
            )));
        }

        if self.storage.backend == StorageBackend::Remote && self.storage.remote_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "storage.remote_url is required for the remote backend".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
