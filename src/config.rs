//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\nutrition-aggregator\config.toml
//! - macOS: ~/Library/Application Support/nutrition-aggregator/config.toml
//! - Linux: ~/.config/nutrition-aggregator/config.toml
//!
//! The config file is human-readable and editable. Credentials can also
//! come from the environment through the CLI (see `cli::commands`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::nutrition::fatsecret;
use crate::nutrition::openfoodfacts;
use crate::nutrition::request::DEFAULT_REGION;
use crate::nutrition::usda;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Provider endpoints and request defaults
    pub providers: ProvidersConfig,

    /// Timeouts and retry pacing
    pub network: NetworkConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// FatSecret OAuth2 client id
    pub fatsecret_client_id: Option<String>,

    /// FatSecret OAuth2 client secret
    pub fatsecret_client_secret: Option<String>,

    /// USDA FoodData Central API key
    pub usda_api_key: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Credentials {
    /// Client id and secret, when both are set
    pub fn fatsecret(&self) -> Option<(&str, &str)> {
        Some((
            non_blank(&self.fatsecret_client_id)?,
            non_blank(&self.fatsecret_client_secret)?,
        ))
    }

    pub fn usda(&self) -> Option<&str> {
        non_blank(&self.usda_api_key)
    }
}

/// Provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub off_russia_url: String,
    pub off_world_url: String,

    /// Language for localized Open Food Facts fields
    pub language: String,

    pub fatsecret_api_url: String,
    pub fatsecret_token_url: String,
    pub fatsecret_scope: String,

    pub usda_base_url: String,
    /// FoodData Central data type filter
    pub usda_data_type: String,

    /// Default region for text search
    pub region: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            off_russia_url: "https://ru.openfoodfacts.org".to_string(),
            off_world_url: "https://world.openfoodfacts.org".to_string(),
            language: openfoodfacts::DEFAULT_LANGUAGE.to_string(),
            fatsecret_api_url: fatsecret::DEFAULT_API_URL.to_string(),
            fatsecret_token_url: "https://oauth.fatsecret.com/connect/token".to_string(),
            fatsecret_scope: "basic".to_string(),
            usda_base_url: usda::DEFAULT_BASE_URL.to_string(),
            usda_data_type: usda::DEFAULT_DATA_TYPE.to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-call timeout in seconds (provider calls and token exchanges)
    pub timeout_secs: u64,

    /// Pause before retrying after rejected credentials, in milliseconds
    pub auth_retry_backoff_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            auth_retry_backoff_ms: 250,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nutrition-aggregator"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the standard location
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to an explicit path
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Config file already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
