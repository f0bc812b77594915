//! TOML configuration for the CLI and the API server.
//!
//! Every field has a default, so an absent or partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Knobs every composite view recognizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Keep only the first N ranked entries (0 = unbounded)
    pub top_n: usize,

    /// Drop groups whose total usage is below this before ranking
    pub min_usage: u64,
}

impl ViewConfig {
    pub fn new(top_n: usize, min_usage: u64) -> Self {
        Self { top_n, min_usage }
    }

    /// Overlay request-level overrides onto these defaults.
    pub fn merged(&self, overrides: &ViewOverrides) -> Self {
        Self {
            top_n: overrides.top_n.unwrap_or(self.top_n),
            min_usage: overrides.min_usage.unwrap_or(self.min_usage),
        }
    }
}

/// Per-request or per-invocation overrides of [`ViewConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOverrides {
    pub top_n: Option<usize>,
    pub min_usage: Option<u64>,
}

/// Where `serve` listens and which origin the dashboard calls from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin, `*` for any
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origin: "*".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    pub views: ViewConfig,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            views: ViewConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::from_file`], but a missing file means defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".to_string()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.views, ViewConfig::new(0, 0));
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_port_zero() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_blank_log_level() {
        let config = AppConfig {
            log_level: "  ".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig {
            views: ViewConfig::new(5, 2),
            ..AppConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[views]\ntop_n = 10\n\n[server]\nport = 9090\n");

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.views.top_n, 10);
        assert_eq!(config.views.min_usage, 0);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_error_names_file() {
        let file = write_config("[server]\nport = \"not a port\"\n");

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&format!("{:?}", file.path())));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert_eq!(AppConfig::load_or_default(&path).unwrap(), AppConfig::default());
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_view_config_merge() {
        let defaults = ViewConfig::new(25, 5);
        let merged = defaults.merged(&ViewOverrides {
            top_n: Some(3),
            min_usage: None,
        });
        assert_eq!(merged, ViewConfig::new(3, 5));
    }
}
