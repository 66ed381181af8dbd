//! core::version
//!
//! Dotted map format version parsing and compatibility checks.
//!
//! # Grammar
//!
//! A version is one, two, or three dot-separated groups of ASCII decimal
//! digits: `1`, `1.10`, `1.10.100`. Anything else (empty string, leading or
//! trailing dot, empty group, signs, whitespace, a fourth group) is
//! unrecognized.
//!
//! Groups longer than [`MAX_GROUP_DIGITS`] digits are unrecognized too, so
//! every accepted group fits a `u32`.
//!
//! Unrecognized versions are an expected outcome (missing or custom version
//! tags), so they are reported as `None` rather than as an error.

use std::fmt;

use super::config::Config;
use crate::io::metadata::MapVersions;

/// Longest digit group accepted in a version string.
pub const MAX_GROUP_DIGITS: usize = 9;

const MAX_GROUPS: usize = 3;

/// A parsed `major[.minor[.patch]]` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapFormatVersion {
    pub major: u32,
    pub minor: Option<u32>,
    pub patch: Option<u32>,
}

impl MapFormatVersion {
    /// Parse a dotted version string.
    ///
    /// # Example
    ///
    /// ```
    /// use lanelet_osm::core::version::MapFormatVersion;
    ///
    /// let v = MapFormatVersion::parse("1.10.100").unwrap();
    /// assert_eq!((v.major, v.minor, v.patch), (1, Some(10), Some(100)));
    ///
    /// assert!(MapFormatVersion::parse("1.2.3.4").is_none());
    /// ```
    pub fn parse(version: &str) -> Option<Self> {
        let mut groups = [None; MAX_GROUPS];
        let mut count = 0;

        for token in version.split('.') {
            if count == MAX_GROUPS {
                return None;
            }
            groups[count] = Some(parse_group(token)?);
            count += 1;
        }

        Some(Self {
            major: groups[0]?,
            minor: groups[1],
            patch: groups[2],
        })
    }
}

impl fmt::Display for MapFormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}

/// A single group must be non-empty, all digits, and within the length bound.
fn parse_group(token: &str) -> Option<u32> {
    if token.is_empty() || token.len() > MAX_GROUP_DIGITS {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Extract the major (first) component of a dotted version string.
///
/// Returns `None` when the string is not a recognized version.
///
/// # Example
///
/// ```
/// use lanelet_osm::core::version::parse_major_version;
///
/// assert_eq!(parse_major_version("1"), Some(1));
/// assert_eq!(parse_major_version("1.10"), Some(1));
/// assert_eq!(parse_major_version("1.10.100"), Some(1));
/// assert_eq!(parse_major_version("1."), None);
/// assert_eq!(parse_major_version("abc"), None);
/// ```
pub fn parse_major_version(version: &str) -> Option<u32> {
    MapFormatVersion::parse(version).map(|v| v.major)
}

/// Outcome of checking a map's format version against what we support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCheck {
    /// Major version is at most the supported maximum.
    Supported(u32),
    /// Major version is newer than anything we know how to read.
    Unsupported(u32),
    /// No format version, or one that is not a dotted number.
    Unknown,
}

/// Compatibility gate for map format versions.
///
/// Only reports; whether to refuse an unsupported or unknown map is up to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSupport {
    max_major: u32,
}

impl FormatSupport {
    /// Support every major version up to and including `max_major`.
    pub fn new(max_major: u32) -> Self {
        Self { max_major }
    }

    /// Build from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_format_major())
    }

    /// Highest supported major version.
    pub fn max_major(&self) -> u32 {
        self.max_major
    }

    /// Check the format version found in a map's metadata.
    pub fn check(&self, versions: &MapVersions) -> FormatCheck {
        let Some(major) = versions
            .format_version
            .as_deref()
            .and_then(parse_major_version)
        else {
            return FormatCheck::Unknown;
        };

        if major <= self.max_major {
            FormatCheck::Supported(major)
        } else {
            tracing::warn!(
                major,
                max_major = self.max_major,
                "map format version is newer than supported"
            );
            FormatCheck::Unsupported(major)
        }
    }
}
