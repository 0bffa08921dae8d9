//! Runtime configuration for front ends.
//!
//! # Responsibility
//! - Resolve the data file, store format and logging settings.
//! - Read overrides from `TASKTRACK_*` environment variables.
//!
//! # Invariants
//! - Configuration is plain instance state; nothing here is global.
//! - An explicit `log_level` is always a normalized level name.

use crate::logging::{default_log_level, normalize_level};
use crate::store::{open_store, StoreFormat, TaskStore};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "tasks.json";
/// Level used for stderr logging when none is configured.
pub const DEFAULT_STDERR_LOG_LEVEL: &str = "warn";

pub const ENV_DATA_FILE: &str = "TASKTRACK_DATA_FILE";
pub const ENV_FORMAT: &str = "TASKTRACK_FORMAT";
pub const ENV_LOG_LEVEL: &str = "TASKTRACK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKTRACK_LOG_DIR";

/// Configuration value rejected during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyValue(&'static str),
    InvalidFormat(String),
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue(name) => write!(f, "{name} cannot be empty"),
            Self::InvalidFormat(value) => {
                write!(f, "invalid store format `{value}`; expected json|lines")
            }
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => {
                write!(f, "log directory must be absolute, got `{}`", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one front-end process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub format: StoreFormat,
    /// Explicit level; `None` picks a default from the log target.
    pub log_level: Option<String>,
    /// File logging directory; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            format: StoreFormat::default(),
            log_level: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `TASKTRACK_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_DATA_FILE) {
            config.set_data_file(&value)?;
        }
        if let Some(value) = lookup(ENV_FORMAT) {
            config.set_format(&value)?;
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            config.set_log_level(&value)?;
        }
        if let Some(value) = lookup(ENV_LOG_DIR) {
            config.set_log_dir(&value)?;
        }
        Ok(config)
    }

    pub fn set_data_file(&mut self, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyValue("data file"));
        }
        self.data_file = PathBuf::from(trimmed);
        Ok(())
    }

    pub fn set_format(&mut self, value: &str) -> Result<(), ConfigError> {
        self.format =
            StoreFormat::parse(value).ok_or_else(|| ConfigError::InvalidFormat(value.to_string()))?;
        Ok(())
    }

    pub fn set_log_level(&mut self, value: &str) -> Result<(), ConfigError> {
        let level = normalize_level(value).map_err(ConfigError::InvalidLogLevel)?;
        self.log_level = Some(level.to_string());
        Ok(())
    }

    /// Configured level, or the build default for file logging and
    /// `warn` for stderr so command output stays readable.
    pub fn effective_log_level(&self) -> &str {
        match (&self.log_level, &self.log_dir) {
            (Some(level), _) => level,
            (None, Some(_)) => default_log_level(),
            (None, None) => DEFAULT_STDERR_LOG_LEVEL,
        }
    }

    /// An empty value switches file logging off; anything else must be absolute.
    pub fn set_log_dir(&mut self, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.log_dir = None;
            return Ok(());
        }
        let dir = PathBuf::from(trimmed);
        if !dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(dir));
        }
        self.log_dir = Some(dir);
        Ok(())
    }

    /// Opens the configured store.
    pub fn open_store(&self) -> Box<dyn TaskStore> {
        open_store(self.format, self.data_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_DATA_FILE, ENV_FORMAT, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::default_log_level;
    use crate::store::StoreFormat;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_variables_keep_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DATA_FILE, "/tmp/tasks.txt"),
            (ENV_FORMAT, "lines"),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/tasktrack"),
        ]))
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/tasks.txt"));
        assert_eq!(config.format, StoreFormat::Lines);
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/tasktrack")));
    }

    #[test]
    fn effective_log_level_depends_on_target() {
        let mut config = AppConfig::default();
        assert_eq!(config.effective_log_level(), "warn");

        config.set_log_dir("/var/log/tasktrack").unwrap();
        assert_eq!(config.effective_log_level(), default_log_level());

        config.set_log_level("error").unwrap();
        assert_eq!(config.effective_log_level(), "error");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[(ENV_FORMAT, "yaml")])).unwrap_err(),
            ConfigError::InvalidFormat("yaml".to_string())
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "loud")])),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[(ENV_DATA_FILE, "  ")])).unwrap_err(),
            ConfigError::EmptyValue("data file")
        );
    }

    #[test]
    fn relative_log_dir_is_rejected_at_resolution() {
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[(ENV_LOG_DIR, "logs")])).unwrap_err(),
            ConfigError::RelativeLogDir(PathBuf::from("logs"))
        );

        let mut config = AppConfig::default();
        config.set_log_dir("/var/log/tasktrack").unwrap();
        assert!(config.set_log_dir("logs/dev").is_err());
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/tasktrack")));

        config.set_log_dir("  ").unwrap();
        assert_eq!(config.log_dir, None);
    }
}
