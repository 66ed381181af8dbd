//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they are usable
//! (e.g., the alignment tolerance must be a small positive number).

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// strict = false
///
/// [alignment]
/// station_tolerance = 1e-6
///
/// [versions]
/// max_format_major = 1
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Treat non-fatal parse problems as load failures
    pub strict: Option<bool>,

    /// Boundary alignment settings
    pub alignment: Option<AlignmentConfig>,

    /// Version gating settings
    pub versions: Option<VersionsConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(alignment) = &self.alignment {
            alignment.validate()?;
        }
        Ok(())
    }
}

/// Boundary alignment settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AlignmentConfig {
    /// Normalized stations closer than this are considered the same vertex
    pub station_tolerance: Option<f64>,
}

impl AlignmentConfig {
    /// Validate alignment settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tolerance) = self.station_tolerance {
            if !crate::geometry::is_valid_tolerance(tolerance) {
                return Err(ConfigError::InvalidValue(format!(
                    "alignment.station_tolerance must be in (0, 0.5), got {}",
                    tolerance
                )));
            }
        }
        Ok(())
    }
}

/// Version gating settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct VersionsConfig {
    /// Highest supported major format version
    pub max_format_major: Option<u32>,
}
