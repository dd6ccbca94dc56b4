//! Tests for TOML configuration loading and graceful degradation
//!
//! - Missing per-module TOML files SHALL NOT cause termination
//! - Broken per-module TOML falls back to defaults with a reason
//! - An explicit `--config` file must exist and parse
//!
//! Tests that manipulate XDG_CONFIG_HOME are marked #[serial] so they do not
//! race each other.

use dashkit_common::config::{
    default_config_path, load_module_config, load_toml_config, CliOverrides, ConfigSource,
    ServiceSettings, CONFIG_DIR_NAME,
};
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_toml_config() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "inventory.toml",
        r#"
host = "0.0.0.0"
port = 6001
session_idle_minutes = 5
sample_size = 50

[logging]
level = "debug"
"#,
    );

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(6001));
    assert_eq!(config.sample_size, Some(50));
    assert_eq!(config.logging.level, "debug");

    let settings = ServiceSettings::resolve(&CliOverrides::default(), &config, 5801);
    assert_eq!(settings.bind_address(), "0.0.0.0:6001");
    assert_eq!(settings.session_idle, Duration::from_secs(300));
    assert_eq!(settings.log_level, "debug");
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = load_module_config(Some(&missing), "inventory");
    assert!(result.is_err());
}

#[test]
fn test_explicit_config_must_parse() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "broken.toml", "port = \"not a number\"");

    let err = load_module_config(Some(&path), "inventory").unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_explicit_config_reports_its_source() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cleaner.toml", "max_upload_bytes = 1024");

    let loaded = load_module_config(Some(&path), "cleaner").unwrap();
    assert_eq!(loaded.config.max_upload_bytes, Some(1024));
    assert_eq!(loaded.source, ConfigSource::File(path));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_missing_module_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let loaded = load_module_config(None, "inventory").unwrap();
    assert_eq!(loaded.config, Default::default());
    assert!(matches!(loaded.source, ConfigSource::Defaults { .. }));

    std::env::remove_var("XDG_CONFIG_HOME");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_module_config_found_in_config_dir() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let module_dir = dir.path().join(CONFIG_DIR_NAME);
    fs::create_dir_all(&module_dir).unwrap();
    fs::write(module_dir.join("cleaner.toml"), "port = 7002").unwrap();

    assert_eq!(
        default_config_path("cleaner").unwrap(),
        module_dir.join("cleaner.toml")
    );

    let loaded = load_module_config(None, "cleaner").unwrap();
    assert_eq!(loaded.config.port, Some(7002));
    assert!(matches!(loaded.source, ConfigSource::File(_)));

    std::env::remove_var("XDG_CONFIG_HOME");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_broken_module_config_degrades_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let module_dir = dir.path().join(CONFIG_DIR_NAME);
    fs::create_dir_all(&module_dir).unwrap();
    fs::write(module_dir.join("inventory.toml"), "this is not toml ===").unwrap();

    let loaded = load_module_config(None, "inventory").unwrap();
    assert_eq!(loaded.config, Default::default());
    match loaded.source {
        ConfigSource::Defaults { reason } => assert!(reason.contains("Parse")),
        other => panic!("expected defaults, got {:?}", other),
    }

    std::env::remove_var("XDG_CONFIG_HOME");
}
