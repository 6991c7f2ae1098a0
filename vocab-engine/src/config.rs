//! Runtime settings
//!
//! Resolved once at startup from command-line overrides and the bootstrap
//! TOML config (see [`vocab_common::config`]), then passed around by value.

use crate::fetch::{DEFAULT_TIMEOUT, USER_AGENT};
use crate::registry::DEFAULT_VOCABULARIES;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vocab_common::config::{resolve_data_root, resolve_database_path, TomlConfig};
use vocab_common::db::DEFAULT_LOCAL_BASE_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory for downloaded vocabulary files
    pub data_root: PathBuf,
    pub database_path: PathBuf,
    /// Source identifiers to register, in order
    pub vocabularies: Vec<String>,
    /// Base URL of vocabularies without one
    pub local_base_url: String,
    pub user_agent: String,
    pub http_timeout: Duration,
    pub log_level: String,
}

/// Path overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides<'a> {
    pub data_root: Option<&'a Path>,
    pub database: Option<&'a Path>,
}

impl Settings {
    pub fn resolve(overrides: &Overrides<'_>, config: &TomlConfig) -> Self {
        let data_root = resolve_data_root(overrides.data_root, config);
        let database_path = resolve_database_path(overrides.database, config, &data_root);

        let vocabularies = match &config.vocabularies {
            Some(list) if !list.is_empty() => list.clone(),
            _ => DEFAULT_VOCABULARIES.iter().map(|s| s.to_string()).collect(),
        };

        Self {
            data_root,
            database_path,
            vocabularies,
            local_base_url: config
                .local_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCAL_BASE_URL.to_string()),
            user_agent: config
                .http
                .user_agent
                .clone()
                .unwrap_or_else(|| USER_AGENT.to_string()),
            http_timeout: config
                .http
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            log_level: config.logging.level.clone(),
        }
    }

    /// Settings rooted in `data_root`, ignoring environment and config files
    pub fn for_data_root(data_root: impl Into<PathBuf>) -> Self {
        let data_root = data_root.into();
        Self {
            database_path: data_root.join("vocabularies.db"),
            data_root,
            vocabularies: DEFAULT_VOCABULARIES.iter().map(|s| s.to_string()).collect(),
            local_base_url: DEFAULT_LOCAL_BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            http_timeout: DEFAULT_TIMEOUT,
            log_level: "info".to_string(),
        }
    }
}
