//! io
//!
//! Reading lanelet OSM map files.
//!
//! # Modules
//!
//! - [`loader`]: `MapLoader`, which parses a map through a [`BaseLoader`] and
//!   aligns every lanelet's boundaries
//! - [`osm`]: Built-in base loader for the lanelet OSM subset
//! - [`metadata`]: `MetaInfo` version extraction
//! - [`registry`]: Explicit parser registry
//!
//! # Example
//!
//! ```no_run
//! use lanelet_osm::core::config::Config;
//! use lanelet_osm::core::version::{FormatCheck, FormatSupport};
//! use lanelet_osm::io::{read_versions, MapLoader};
//! use std::path::Path;
//!
//! let config = Config::load(None)?;
//! let path = Path::new("lanelet2_map.osm");
//!
//! let versions = read_versions(path)?;
//! if let FormatCheck::Unsupported(major) = FormatSupport::from_config(&config).check(&versions) {
//!     eprintln!("map format {} is newer than supported", major);
//! }
//!
//! let loaded = MapLoader::from_config(&config).load(path)?;
//! println!("{} lanelets", loaded.graph.lanelet_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod loader;
pub mod metadata;
pub mod osm;
pub mod registry;

pub use loader::{align_all, BaseLoadError, BaseLoader, LoadError, LoadedMap, MapLoader};
pub use metadata::{read_versions, read_versions_from_str, MapVersions, MetadataError};
pub use osm::OsmLaneletLoader;
pub use registry::{ParserRegistry, RegistryError, AUTOWARE_OSM_PARSER};
