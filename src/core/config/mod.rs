//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! The first source found wins:
//! 1. An explicit path passed by the caller
//! 2. `$LANELET_OSM_CONFIG` if set and the file exists
//! 3. `<config_dir>/lanelet-osm/config.toml` (`$XDG_CONFIG_HOME` on Linux)
//! 4. Default values
//!
//! # Example
//!
//! ```no_run
//! use lanelet_osm::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("strict: {}", config.strict());
//! println!("tolerance: {}", config.station_tolerance());
//! println!("max format major: {}", config.max_format_major());
//! ```

pub mod schema;

pub use schema::{AlignmentConfig, FileConfig, VersionsConfig};

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "LANELET_OSM_CONFIG";

/// Default normalized-station tolerance for boundary alignment.
pub const DEFAULT_STATION_TOLERANCE: f64 = 1e-6;

/// Default highest supported map format major version.
pub const DEFAULT_MAX_FORMAT_MAJOR: u32 = 1;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Resolved configuration.
///
/// Accessor methods apply defaults for anything the file leaves out.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: FileConfig,
    /// Path the config was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path cannot be read, or if a config
    /// file exists but cannot be parsed or fails validation. A missing
    /// config file is not an error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        let Some(path) = path else {
            tracing::debug!("no config file found, using defaults");
            return Ok(Config::default());
        };

        let file = Self::read_config(&path)?;
        file.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");

        Ok(Config {
            file,
            path: Some(path),
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        let file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<string>"),
            message: e.to_string(),
        })?;
        file.validate()?;
        Ok(Config { file, path: None })
    }

    /// Find a config file in the standard locations.
    fn discover() -> Option<PathBuf> {
        Self::discover_from(std::env::var_os(CONFIG_ENV))
    }

    /// Discovery with the value of [`CONFIG_ENV`] passed in.
    fn discover_from(env_path: Option<OsString>) -> Option<PathBuf> {
        if let Some(path) = env_path {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            tracing::warn!(path = %path.display(), "{} points to a missing file", CONFIG_ENV);
        }

        let path = Self::default_config_path()?;
        path.exists().then_some(path)
    }

    /// Canonical config location: `<config_dir>/lanelet-osm/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lanelet-osm/config.toml"))
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Whether non-fatal parse problems fail the load.
    ///
    /// Defaults to `false` if not configured.
    pub fn strict(&self) -> bool {
        self.file.strict.unwrap_or(false)
    }

    /// Station tolerance for boundary alignment.
    ///
    /// Defaults to [`DEFAULT_STATION_TOLERANCE`] if not configured.
    pub fn station_tolerance(&self) -> f64 {
        self.file
            .alignment
            .as_ref()
            .and_then(|a| a.station_tolerance)
            .unwrap_or(DEFAULT_STATION_TOLERANCE)
    }

    /// Highest supported map format major version.
    ///
    /// Defaults to [`DEFAULT_MAX_FORMAT_MAJOR`] if not configured.
    pub fn max_format_major(&self) -> u32 {
        self.file
            .versions
            .as_ref()
            .and_then(|v| v.max_format_major)
            .unwrap_or(DEFAULT_MAX_FORMAT_MAJOR)
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert!(!config.strict());
        assert_eq!(config.station_tolerance(), DEFAULT_STATION_TOLERANCE);
        assert_eq!(config.max_format_major(), DEFAULT_MAX_FORMAT_MAJOR);
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
            strict = true

            [versions]
            max_format_major = 3
            "#,
        )
        .unwrap();

        let config = Config::load(Some(config_path.as_path())).unwrap();

        assert!(config.strict());
        assert_eq!(config.max_format_major(), 3);
        assert_eq!(config.station_tolerance(), DEFAULT_STATION_TOLERANCE);
        assert_eq!(config.loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn env_path_is_discovered() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("env.toml");
        fs::write(&config_path, "[alignment]\nstation_tolerance = 0.01\n").unwrap();

        let found = Config::discover_from(Some(config_path.clone().into_os_string()));
        assert_eq!(found.as_deref(), Some(config_path.as_path()));

        let config = Config::load(found.as_deref()).unwrap();
        assert_eq!(config.station_tolerance(), 0.01);
    }

    #[test]
    fn missing_env_path_is_skipped() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone.toml");

        let found = Config::discover_from(Some(missing.clone().into_os_string()));
        assert_ne!(found.as_deref(), Some(missing.as_path()));
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(temp.path().join("nope.toml").as_path()));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result = Config::from_toml_str("strict = true\nunknown_field = 1\n");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_tolerance_rejected() {
        let result = Config::from_toml_str("[alignment]\nstation_tolerance = 0.0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
