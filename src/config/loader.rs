//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Calendar;
use crate::normalize::TimestampNormalizer;
use crate::payroll::PayrollBasis;

use super::types::EngineConfig;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "engine.yaml";

/// Loads and provides access to the engine configuration.
///
/// The `ConfigLoader` reads `engine.yaml` from a directory, validates it, and
/// hands out the engine components built from it.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── engine.yaml   # Calendar, timestamp and payroll settings
/// ```
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("UTC offset: {} minutes", loader.calendar().offset_minutes());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    calendar: Calendar,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - The file contains invalid YAML or unknown enum values
    /// - The UTC offset is not strictly within ±24 hours
    ///
    /// # Example
    ///
    /// ```no_run
    /// use roster_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// # Ok::<(), roster_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config_path = path.as_ref().join(CONFIG_FILE_NAME);
        let config = Self::load_yaml::<EngineConfig>(&config_path)?;
        Self::from_config(config).map_err(|err| match err {
            EngineError::ConfigParseError { message, .. } => EngineError::ConfigParseError {
                path: config_path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Builds a loader from an already parsed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParseError`] if the UTC offset is out of
    /// range.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        let offset = config.calendar.utc_offset_minutes;
        let calendar =
            Calendar::from_offset_minutes(offset).ok_or_else(|| EngineError::ConfigParseError {
                path: "<in-memory>".to_string(),
                message: format!(
                    "calendar.utc_offset_minutes {} is outside ±1439 minutes",
                    offset
                ),
            })?;

        Ok(Self { config, calendar })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the configured local calendar.
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Returns a timestamp normalizer for the configured calendar and
    /// compatibility mode.
    pub fn normalizer(&self) -> TimestampNormalizer {
        TimestampNormalizer::new(self.calendar)
            .with_legacy_now_fallback(self.config.timestamps.legacy_now_fallback)
    }

    /// Returns the configured payroll basis.
    pub fn payroll_basis(&self) -> PayrollBasis {
        self.config.payroll.basis
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            calendar: Calendar::utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_path() -> &'static str {
        "./config"
    }

    fn temp_config_dir(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "roster-engine-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.calendar().offset_minutes(), 0);
        assert!(!loader.normalizer().legacy_now_fallback());
        assert_eq!(loader.payroll_basis(), PayrollBasis::AllClosed);
    }

    #[test]
    fn test_load_missing_directory_returns_not_found() {
        match ConfigLoader::load("./does/not/exist") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.ends_with(CONFIG_FILE_NAME));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_custom_settings() {
        let dir = temp_config_dir(
            "custom",
            "calendar:\n  utc_offset_minutes: 540\ntimestamps:\n  legacy_now_fallback: true\npayroll:\n  basis: CONFIRMED_ONLY\n",
        );

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.calendar().offset_minutes(), 540);
        assert_eq!(loader.normalizer().calendar().offset_minutes(), 540);
        assert!(loader.normalizer().legacy_now_fallback());
        assert_eq!(loader.payroll_basis(), PayrollBasis::ConfirmedOnly);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = temp_config_dir("partial", "payroll:\n  basis: ALL_CLOSED\n");

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.calendar().offset_minutes(), 0);
        assert!(!loader.config().timestamps.legacy_now_fallback);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_out_of_range_offset_is_parse_error() {
        let dir = temp_config_dir("offset", "calendar:\n  utc_offset_minutes: 1440\n");

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.ends_with(CONFIG_FILE_NAME));
                assert!(message.contains("1440"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_unknown_basis_is_parse_error() {
        let dir = temp_config_dir("basis", "payroll:\n  basis: WHATEVER\n");

        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_default_loader_is_utc_strict() {
        let loader = ConfigLoader::default();
        assert_eq!(loader.calendar(), &Calendar::utc());
        assert!(!loader.normalizer().legacy_now_fallback());
    }
}
