//! io::registry
//!
//! Map parser selection and creation.
//!
//! # Design
//!
//! Parsers are registered explicitly by the caller, typically once during
//! startup, instead of registering themselves as a side effect of being
//! linked in. [`ParserRegistry::with_builtin`] registers the parsers this
//! crate ships; [`ParserRegistry::new`] starts empty.
//!
//! # Example
//!
//! ```
//! use lanelet_osm::core::config::Config;
//! use lanelet_osm::io::registry::{ParserRegistry, AUTOWARE_OSM_PARSER};
//! use std::path::Path;
//!
//! let registry = ParserRegistry::with_builtin();
//! let config = Config::default();
//!
//! let by_name = registry.create(AUTOWARE_OSM_PARSER, &config).unwrap();
//! let by_path = registry.for_path(Path::new("maps/lanelet2_map.OSM"), &config).unwrap();
//! ```

use std::path::Path;

use thiserror::Error;

use super::loader::MapLoader;
use crate::core::config::Config;

/// Name of the built-in Autoware lanelet OSM parser.
pub const AUTOWARE_OSM_PARSER: &str = "autoware_osm_handler";

/// Errors from parser lookup and registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A parser with this name is already registered.
    #[error("parser '{0}' is already registered")]
    Duplicate(String),

    /// No parser matches the request.
    #[error("not found: {0}")]
    NotFound(String),
}

type Constructor = Box<dyn Fn(&Config) -> MapLoader + Send + Sync>;

struct Entry {
    name: String,
    extensions: Vec<String>,
    constructor: Constructor,
}

/// Registry of named map parsers.
#[derive(Default)]
pub struct ParserRegistry {
    entries: Vec<Entry>,
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (&e.name, &e.extensions)))
            .finish()
    }
}

impl ParserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in parsers.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.push(AUTOWARE_OSM_PARSER, &["osm"], Box::new(MapLoader::from_config));
        registry
    }

    /// Register a parser under `name` for the given file extensions.
    ///
    /// Extensions are matched case-insensitively and without the dot.
    ///
    /// # Errors
    ///
    /// `RegistryError::Duplicate` if `name` is taken.
    pub fn register<F>(
        &mut self,
        name: &str,
        extensions: &[&str],
        constructor: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Config) -> MapLoader + Send + Sync + 'static,
    {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }

        self.push(name, extensions, Box::new(constructor));
        Ok(())
    }

    fn push(&mut self, name: &str, extensions: &[&str], constructor: Constructor) {
        tracing::debug!(parser = name, ?extensions, "registering map parser");
        self.entries.push(Entry {
            name: name.to_string(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            constructor,
        });
    }

    /// Create the parser registered under `name`.
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if no such parser is registered.
    pub fn create(&self, name: &str, config: &Config) -> Result<MapLoader, RegistryError> {
        let entry = self.entries.iter().find(|e| e.name == name).ok_or_else(|| {
            RegistryError::NotFound(format!(
                "unknown parser '{}'. Available parsers: {}",
                name,
                self.names_string()
            ))
        })?;
        Ok((entry.constructor)(config))
    }

    /// Create the first parser registered for the path's extension.
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if the path has no extension or no parser
    /// handles it.
    pub fn for_path(&self, path: &Path, config: &Config) -> Result<MapLoader, RegistryError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| {
                RegistryError::NotFound(format!(
                    "cannot pick a parser for '{}': no file extension",
                    path.display()
                ))
            })?;

        let entry = self
            .entries
            .iter()
            .find(|e| e.extensions.contains(&extension))
            .ok_or_else(|| {
                RegistryError::NotFound(format!(
                    "no parser for '.{}' files. Available parsers: {}",
                    extension,
                    self.names_string()
                ))
            })?;
        Ok((entry.constructor)(config))
    }

    /// Names of all registered parsers, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn names_string(&self) -> String {
        if self.entries.is_empty() {
            return "(none)".to_string();
        }
        self.names().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ArcLengthAligner;
    use crate::io::osm::OsmLaneletLoader;

    fn custom(_config: &Config) -> MapLoader {
        MapLoader::new(
            Box::new(OsmLaneletLoader::new()),
            Box::new(ArcLengthAligner::new(0.01)),
        )
        .with_strict(true)
    }

    #[test]
    fn builtin_has_autoware_parser() {
        let registry = ParserRegistry::with_builtin();
        assert_eq!(registry.names(), vec![AUTOWARE_OSM_PARSER]);
    }

    #[test]
    fn new_is_empty() {
        let registry = ParserRegistry::new();
        assert!(registry.names().is_empty());
        let err = registry
            .create(AUTOWARE_OSM_PARSER, &Config::default())
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::NotFound(
                "unknown parser 'autoware_osm_handler'. Available parsers: (none)".into()
            )
        );
    }

    #[test]
    fn duplicate_rejected() {
        let mut registry = ParserRegistry::with_builtin();
        let err = registry
            .register(AUTOWARE_OSM_PARSER, &["xml"], custom)
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate(AUTOWARE_OSM_PARSER.into()));
    }

    #[test]
    fn lookup_by_extension_is_case_insensitive() {
        let registry = ParserRegistry::with_builtin();
        let config = Config::default();
        assert!(registry.for_path(Path::new("a/b/map.osm"), &config).is_ok());
        assert!(registry.for_path(Path::new("MAP.OSM"), &config).is_ok());
    }

    #[test]
    fn unknown_extension_lists_parsers() {
        let registry = ParserRegistry::with_builtin();
        let err = registry
            .for_path(Path::new("map.xodr"), &Config::default())
            .unwrap_err();
        match err {
            RegistryError::NotFound(msg) => {
                assert!(msg.contains(".xodr"));
                assert!(msg.contains(AUTOWARE_OSM_PARSER));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(registry
            .for_path(Path::new("no_extension"), &Config::default())
            .is_err());
    }

    #[test]
    fn first_registration_wins_for_extension() {
        let mut registry = ParserRegistry::new();
        registry.register("custom", &[".OSM", "xml"], custom).unwrap();
        registry
            .register(AUTOWARE_OSM_PARSER, &["osm"], MapLoader::from_config)
            .unwrap();

        let loader = registry.for_path(Path::new("m.osm"), &Config::default()).unwrap();
        assert!(format!("{:?}", loader).contains("strict: true"));
        assert_eq!(registry.names(), vec!["custom", AUTOWARE_OSM_PARSER]);
        assert!(registry.for_path(Path::new("m.xml"), &Config::default()).is_ok());
    }
}
