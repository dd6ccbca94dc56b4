//! Configuration loading and service settings resolution
//!
//! Resolution order for every setting:
//! 1. Command-line argument or its environment variable (clap `env`)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! A missing TOML file is never fatal; the service starts on defaults and
//! logs where its configuration came from.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the platform config dir holding per-module TOML files
pub const CONFIG_DIR_NAME: &str = "dashkit";

/// Bootstrap configuration loaded from `<config_dir>/dashkit/<module>.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Bind address host
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Minutes of inactivity before a session's state is dropped
    #[serde(default)]
    pub session_idle_minutes: Option<u64>,

    /// Number of generated sample records (inventory service)
    #[serde(default)]
    pub sample_size: Option<usize>,

    /// Upper bound for uploaded CSV bodies (cleaner service)
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
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
    CompiledDefaults::LOG_LEVEL.to_string()
}

/// Compiled-in fallbacks used when neither CLI, environment nor TOML set a value
pub struct CompiledDefaults;

impl CompiledDefaults {
    pub const HOST: &'static str = "127.0.0.1";
    pub const LOG_LEVEL: &'static str = "info";
    pub const SESSION_IDLE_MINUTES: u64 = 60;
}

/// Where the effective TOML configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No usable file; compiled defaults apply
    Defaults { reason: String },
}

/// TOML configuration plus its provenance
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Default TOML path for a module, e.g. `~/.config/dashkit/inventory.toml`
pub fn default_config_path(module: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(format!("{}.toml", module)))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the module's TOML configuration
///
/// An explicitly requested file (`--config`) must exist and parse. The
/// implicit per-module file degrades to defaults when it is missing or broken.
pub fn load_module_config(explicit: Option<&Path>, module: &str) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)?;
        return Ok(LoadedConfig {
            config,
            source: ConfigSource::File(path.to_path_buf()),
        });
    }

    let Some(path) = default_config_path(module) else {
        return Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Defaults {
                reason: "could not determine platform config directory".to_string(),
            },
        });
    };

    if !path.exists() {
        return Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Defaults {
                reason: format!("{} not found", path.display()),
            },
        });
    }

    match load_toml_config(&path) {
        Ok(config) => Ok(LoadedConfig {
            config,
            source: ConfigSource::File(path),
        }),
        Err(e) => Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Defaults {
                reason: e.to_string(),
            },
        }),
    }
}

/// Values supplied on the command line (or through clap's `env` fallback)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Effective settings shared by every service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub session_idle: Duration,
}

impl ServiceSettings {
    /// Merge CLI overrides, TOML values and compiled defaults
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig, default_port: u16) -> Self {
        let host = cli
            .host
            .clone()
            .or_else(|| toml.host.clone())
            .unwrap_or_else(|| CompiledDefaults::HOST.to_string());

        let port = cli.port.or(toml.port).unwrap_or(default_port);

        let log_level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| toml.logging.level.clone());

        let idle_minutes = toml
            .session_idle_minutes
            .unwrap_or(CompiledDefaults::SESSION_IDLE_MINUTES);

        Self {
            host,
            port,
            log_level,
            session_idle: Duration::from_secs(idle_minutes.saturating_mul(60)),
        }
    }

    /// `host:port` string for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults_to_info() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.port.is_none());
    }

    #[test]
    fn test_cli_overrides_toml() {
        let toml = TomlConfig {
            host: Some("0.0.0.0".to_string()),
            port: Some(6000),
            ..Default::default()
        };
        let cli = CliOverrides {
            port: Some(7000),
            ..Default::default()
        };

        let settings = ServiceSettings::resolve(&cli, &toml, 5801);
        assert_eq!(settings.port, 7000);
        assert_eq!(settings.host, "0.0.0.0");
    }

    #[test]
    fn test_compiled_defaults_apply_last() {
        let settings = ServiceSettings::resolve(&CliOverrides::default(), &TomlConfig::default(), 5802);
        assert_eq!(settings.host, CompiledDefaults::HOST);
        assert_eq!(settings.port, 5802);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.session_idle, Duration::from_secs(3600));
        assert_eq!(settings.bind_address(), "127.0.0.1:5802");
    }
}
