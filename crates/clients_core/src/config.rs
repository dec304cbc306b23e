//! File-based configuration for the customer store.
//!
//! # Responsibility
//! - Describe where the database lives and how logging is set up.
//! - Parse TOML config files into typed settings with defaults.
//!
//! # Invariants
//! - Every field is optional; an empty file equals `AppConfig::default()`.
//! - Unknown keys are rejected so typos surface instead of being ignored.

use crate::db::MEMORY_TARGET;
use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "clients.sqlite3";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    pub path: PathBuf,
    /// How long a statement waits on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl DatabaseConfig {
    /// Config for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(MEMORY_TARGET),
            ..Self::default()
        }
    }

    pub fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_TARGET
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// `[logging]` section. Logging stays off while `dir` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        origin: String,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { origin, source } => write!(f, "invalid config `{origin}`: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl AppConfig {
    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parses TOML text; `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DatabaseConfig};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::parse("", "inline").expect("empty config should parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database.path, PathBuf::from("clients.sqlite3"));
        assert_eq!(config.database.busy_timeout(), Duration::from_secs(5));
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = AppConfig::parse(
            r#"
            [database]
            path = ":memory:"
            busy_timeout_ms = 250

            [logging]
            level = "warn"
            dir = "/tmp/clients-logs"
            "#,
            "inline",
        )
        .expect("config should parse");

        assert!(config.database.is_memory());
        assert_eq!(config.database.busy_timeout(), Duration::from_millis(250));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.dir, Some(PathBuf::from("/tmp/clients-logs")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::parse("[database]\nhost = \"localhost\"\n", "inline")
            .expect_err("unknown key must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("inline"));
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = AppConfig::load("/definitely/not/here/clients.toml")
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("clients.toml"));
    }

    #[test]
    fn in_memory_database_config_is_memory() {
        assert!(DatabaseConfig::in_memory().is_memory());
        assert!(!DatabaseConfig::default().is_memory());
    }
}
