//! io::metadata
//!
//! Map version metadata.
//!
//! Lanelet OSM files carry their versions in a `MetaInfo` element directly
//! under the `osm` root:
//!
//! ```xml
//! <osm version="0.6">
//!   <MetaInfo format_version="1.2" map_version="3"/>
//!   ...
//! </osm>
//! ```
//!
//! Only unreadable or malformed markup is an error. A missing `MetaInfo`
//! element or a missing attribute simply leaves that version unset; whether
//! that is acceptable is for the caller to decide (see
//! [`FormatSupport`](crate::core::version::FormatSupport)).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const OSM_ROOT: &str = "osm";
const META_INFO: &str = "MetaInfo";
const FORMAT_VERSION: &str = "format_version";
const MAP_VERSION: &str = "map_version";

/// Errors from reading version metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read map file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("errors occurred while parsing osm file: {message}")]
    Parse { message: String },
}

/// Versions found in a map's `MetaInfo` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapVersions {
    /// Version of the map file format
    pub format_version: Option<String>,
    /// Version of the map content
    pub map_version: Option<String>,
}

impl MapVersions {
    /// Fill absent fields from `defaults`; present fields win.
    ///
    /// # Example
    ///
    /// ```
    /// use lanelet_osm::io::metadata::MapVersions;
    ///
    /// let found = MapVersions {
    ///     format_version: Some("1.2".into()),
    ///     map_version: None,
    /// };
    /// let defaults = MapVersions {
    ///     format_version: Some("0".into()),
    ///     map_version: Some("unknown".into()),
    /// };
    ///
    /// let merged = found.with_defaults(defaults);
    /// assert_eq!(merged.format_version.as_deref(), Some("1.2"));
    /// assert_eq!(merged.map_version.as_deref(), Some("unknown"));
    /// ```
    pub fn with_defaults(self, defaults: MapVersions) -> MapVersions {
        MapVersions {
            format_version: self.format_version.or(defaults.format_version),
            map_version: self.map_version.or(defaults.map_version),
        }
    }

    /// Whether neither version was found.
    pub fn is_empty(&self) -> bool {
        self.format_version.is_none() && self.map_version.is_none()
    }
}

/// Read the versions from a map file.
///
/// # Errors
///
/// - `MetadataError::Read` if the file cannot be read
/// - `MetadataError::Parse` if it is not well-formed XML
pub fn read_versions(path: &Path) -> Result<MapVersions, MetadataError> {
    let contents = fs::read_to_string(path).map_err(|e| MetadataError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let versions = read_versions_from_str(&contents)?;
    tracing::debug!(
        path = %path.display(),
        format_version = ?versions.format_version,
        map_version = ?versions.map_version,
        "read map versions"
    );
    Ok(versions)
}

/// Read the versions from map markup already in memory.
///
/// # Errors
///
/// `MetadataError::Parse` with the XML parser's diagnostic if the markup is
/// malformed.
pub fn read_versions_from_str(xml: &str) -> Result<MapVersions, MetadataError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| MetadataError::Parse {
        message: e.to_string(),
    })?;

    let root = doc.root_element();
    if !root.has_tag_name(OSM_ROOT) {
        tracing::warn!(root = root.tag_name().name(), "document root is not <osm>");
        return Ok(MapVersions::default());
    }

    let Some(meta) = root.children().find(|n| n.has_tag_name(META_INFO)) else {
        tracing::warn!("no <MetaInfo> element, map versions unknown");
        return Ok(MapVersions::default());
    };

    Ok(MapVersions {
        format_version: meta.attribute(FORMAT_VERSION).map(str::to_string),
        map_version: meta.attribute(MAP_VERSION).map(str::to_string),
    })
}
