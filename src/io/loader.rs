//! io::loader
//!
//! Map loading with boundary normalization.
//!
//! # Lifecycle
//!
//! 1. The injected [`BaseLoader`] parses the file into a raw [`LaneGraph`]
//! 2. Every lanelet's `(left, right)` pair goes through the injected
//!    [`BoundaryAligner`], in id order, exactly once
//! 3. The aligned pair replaces the lanelet's bounds
//!
//! Step 2 runs unconditionally: whether a pair is already aligned cannot be
//! told without running the aligner.
//!
//! # Failure
//!
//! A file the base loader cannot parse, a degenerate boundary, or a lanelet
//! whose bound is missing from the graph aborts the whole load. Non-fatal
//! base-loader problems travel with the result in [`LoadedMap::errors`]
//! unless strict mode is on.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::Config;
use crate::core::graph::LaneGraph;
use crate::core::types::{Id, LineString3d};
use crate::geometry::{ArcLengthAligner, BoundaryAligner, GeometryError};

use super::osm::OsmLaneletLoader;

/// Errors from a base loader.
#[derive(Debug, Error)]
pub enum BaseLoadError {
    #[error("failed to read map file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed map: {0}")]
    Malformed(String),
}

/// Errors from [`MapLoader::load`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Base(#[from] BaseLoadError),

    #[error("lanelet {lanelet}: {source}")]
    Geometry {
        lanelet: Id,
        #[source]
        source: GeometryError,
    },

    #[error("lanelet {lanelet}: boundary {curve} not found in map")]
    MissingBound { lanelet: Id, curve: Id },

    #[error("strict mode: {} problem(s) while parsing map", .errors.len())]
    Strict { errors: Vec<String> },
}

/// A parsed map plus the non-fatal problems found while parsing.
#[derive(Debug, Clone, Default)]
pub struct LoadedMap {
    /// The lane graph
    pub graph: LaneGraph,
    /// Non-fatal problems (skipped elements, dangling references)
    pub errors: Vec<String>,
}

/// Capability that turns a file into a raw lane graph.
///
/// Implementations must be reentrant so one [`MapLoader`] can load
/// different files from different threads.
pub trait BaseLoader: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Parse a map file.
    ///
    /// # Errors
    ///
    /// Returns `BaseLoadError` if the file is unreadable or structurally
    /// invalid.
    fn parse(&self, path: &Path) -> Result<LoadedMap, BaseLoadError>;
}

/// Loads a map and normalizes every lanelet's boundaries.
///
/// # Example
///
/// ```no_run
/// use lanelet_osm::core::config::Config;
/// use lanelet_osm::io::MapLoader;
/// use std::path::Path;
///
/// let loader = MapLoader::from_config(&Config::default());
/// let loaded = loader.load(Path::new("lanelet2_map.osm")).unwrap();
/// println!("{} lanelets", loaded.graph.lanelet_count());
/// ```
pub struct MapLoader {
    base: Box<dyn BaseLoader>,
    aligner: Box<dyn BoundaryAligner>,
    strict: bool,
}

impl std::fmt::Debug for MapLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapLoader")
            .field("base", &self.base.name())
            .field("aligner", &self.aligner.name())
            .field("strict", &self.strict)
            .finish()
    }
}

impl MapLoader {
    /// Create a loader from explicit capabilities.
    pub fn new(base: Box<dyn BaseLoader>, aligner: Box<dyn BoundaryAligner>) -> Self {
        Self {
            base,
            aligner,
            strict: false,
        }
    }

    /// Create a loader with the built-in OSM loader and arc-length aligner.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Box::new(OsmLaneletLoader::new()),
            Box::new(ArcLengthAligner::new(config.station_tolerance())),
        )
        .with_strict(config.strict())
    }

    /// Fail the load if the base loader reports any non-fatal problem.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Load a map file and align every lanelet's boundaries.
    ///
    /// # Errors
    ///
    /// - `LoadError::Base` if the base loader fails
    /// - `LoadError::Strict` in strict mode when problems were reported
    /// - `LoadError::Geometry` if any boundary is degenerate
    /// - `LoadError::MissingBound` if a lanelet names an unknown curve
    pub fn load(&self, path: &Path) -> Result<LoadedMap, LoadError> {
        tracing::info!(path = %path.display(), base = self.base.name(), "loading map");

        let LoadedMap { mut graph, errors } = self.base.parse(path)?;
        for error in &errors {
            tracing::warn!(path = %path.display(), "{}", error);
        }
        if self.strict && !errors.is_empty() {
            return Err(LoadError::Strict { errors });
        }

        let replaced = align_all(&mut graph, self.aligner.as_ref())?;
        tracing::info!(
            lanelets = graph.lanelet_count(),
            curves_replaced = replaced,
            aligner = self.aligner.name(),
            "map loaded"
        );

        Ok(LoadedMap { graph, errors })
    }
}

/// Align every lanelet of a graph in place.
///
/// Returns the number of curves that had to be replaced.
///
/// # Errors
///
/// Stops at the first lanelet that cannot be aligned.
pub fn align_all(
    graph: &mut LaneGraph,
    aligner: &dyn BoundaryAligner,
) -> Result<usize, LoadError> {
    let mut replaced = 0;

    for id in graph.lanelet_ids() {
        let Some(lanelet) = graph.lanelet(id) else {
            continue;
        };
        let left = bound(graph, id, lanelet.left_bound())?;
        let right = bound(graph, id, lanelet.right_bound())?;

        let (new_left, new_right) = aligner
            .align(left, right)
            .map_err(|source| LoadError::Geometry { lanelet: id, source })?;

        replaced += graph.set_bounds(id, new_left, new_right).unwrap_or_default();
    }

    Ok(replaced)
}

fn bound(graph: &LaneGraph, lanelet: Id, curve: Id) -> Result<&LineString3d, LoadError> {
    graph
        .curve(curve)
        .ok_or(LoadError::MissingBound { lanelet, curve })
}
