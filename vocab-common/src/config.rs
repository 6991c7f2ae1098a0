//! Bootstrap configuration loading and data root resolution
//!
//! Configuration sources, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "controlled-vocabulary";

/// Environment variable naming the TOML config file
pub const ENV_CONFIG: &str = "VOCAB_CONFIG";

/// Environment variable overriding the data root
pub const ENV_DATA_ROOT: &str = "VOCAB_DATA_ROOT";

/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "VOCAB_DATABASE";

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional; missing keys fall back to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Directory holding downloaded vocabulary files
    #[serde(default)]
    pub data_root: Option<PathBuf>,

    /// SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Ordered list of term source identifiers to register
    #[serde(default)]
    pub vocabularies: Option<Vec<String>>,

    /// Base URL for vocabularies without their own base URL
    #[serde(default)]
    pub local_base_url: Option<String>,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML config document
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Load the TOML config file
///
/// A missing file is not an error: a warning is logged and defaults are used.
/// A file that exists but cannot be parsed is a configuration error.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::var(ENV_CONFIG)
            .ok()
            .map(PathBuf::from)
            .or_else(default_config_path),
    };

    let Some(path) = path else {
        warn!("Could not determine config file location, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!("Config file not found: {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = parse_toml_config(&content)?;
    info!("Loaded config file: {}", path.display());

    Ok(config)
}

/// Default TOML config path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Resolve a path setting by priority: CLI, environment, TOML, default
pub fn resolve_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
    default: impl FnOnce() -> PathBuf,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    default()
}

/// Resolve the data root folder
pub fn resolve_data_root(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    resolve_path(
        cli_arg,
        ENV_DATA_ROOT,
        config.data_root.as_deref(),
        default_data_root,
    )
}

/// Resolve the database file; defaults to `vocabularies.db` in the data root
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    config: &TomlConfig,
    data_root: &Path,
) -> PathBuf {
    resolve_path(
        cli_arg,
        ENV_DATABASE,
        config.database_path.as_deref(),
        || data_root.join("vocabularies.db"),
    )
}

/// OS-dependent default data root
pub fn default_data_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./vocabulary_data"))
}
