//! Configuration resolution tests
//!
//! Priority order: command-line argument, environment variable, TOML, default.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate VOCAB_* variables are marked with #[serial].

use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use vocab_common::config::{
    default_data_root, load_toml_config, resolve_data_root, resolve_database_path, TomlConfig,
    ENV_DATABASE, ENV_DATA_ROOT,
};

fn toml_with_root(root: &str) -> TomlConfig {
    TomlConfig {
        data_root: Some(PathBuf::from(root)),
        ..Default::default()
    }
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    env::set_var(ENV_DATA_ROOT, "/from/env");

    let root = resolve_data_root(None, &toml_with_root("/from/toml"));
    assert_eq!(root, PathBuf::from("/from/env"));

    env::remove_var(ENV_DATA_ROOT);
}

#[test]
#[serial]
fn test_toml_used_without_env() {
    env::remove_var(ENV_DATA_ROOT);

    let root = resolve_data_root(None, &toml_with_root("/from/toml"));
    assert_eq!(root, PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_default_when_nothing_configured() {
    env::remove_var(ENV_DATA_ROOT);

    let root = resolve_data_root(None, &TomlConfig::default());
    assert_eq!(root, default_data_root());
    assert!(!root.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_database_defaults_into_data_root() {
    env::remove_var(ENV_DATABASE);

    let db = resolve_database_path(None, &TomlConfig::default(), Path::new("/data"));
    assert_eq!(db, PathBuf::from("/data/vocabularies.db"));

    env::set_var(ENV_DATABASE, "/elsewhere/cv.db");
    let db = resolve_database_path(None, &TomlConfig::default(), Path::new("/data"));
    assert_eq!(db, PathBuf::from("/elsewhere/cv.db"));
    env::remove_var(ENV_DATABASE);
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("absent.toml");

    let config = load_toml_config(Some(missing.as_path())).unwrap();
    assert!(config.data_root.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_config_file_is_loaded() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "vocabularies = [\"dcmitype\"]\n[http]\ntimeout_secs = 3\n",
    )
    .unwrap();

    let config = load_toml_config(Some(path.as_path())).unwrap();
    assert_eq!(config.vocabularies, Some(vec!["dcmitype".to_string()]));
    assert_eq!(config.http.timeout_secs, Some(3));
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "data_root = [").unwrap();

    assert!(load_toml_config(Some(path.as_path())).is_err());
}
