//! lanelet-osm - Lanelet map loading for autonomous driving stacks
//!
//! Loads Autoware-flavoured Lanelet2 OSM files into a lane graph whose
//! boundary pairs are aligned, and reads the map's embedded version
//! metadata so callers can gate on format compatibility before using a map.
//!
//! # Architecture
//!
//! - [`core`] - Lane graph, geometry types, version parsing, configuration
//! - [`geometry`] - Boundary alignment behind the `BoundaryAligner` trait
//! - [`io`] - Map loading, `MetaInfo` reading, parser registry
//! - [`logging`] - Optional `tracing` subscriber setup
//!
//! # Correctness Invariants
//!
//! 1. Every lanelet returned by a load has an aligned boundary pair
//! 2. Alignment never reverses a boundary's direction of travel
//! 3. Missing or unrecognized version metadata is never an error
//! 4. A map that cannot be parsed, or has a degenerate boundary, is never
//!    returned

pub mod core;
pub mod geometry;
pub mod io;
pub mod logging;
