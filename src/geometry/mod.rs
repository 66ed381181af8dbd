//! geometry
//!
//! Geometry operations applied to lane boundaries.
//!
//! The [`BoundaryAligner`] trait is the seam between map loading and the
//! alignment algorithm; [`ArcLengthAligner`] is the built-in
//! implementation.

pub mod align;

pub use align::{
    is_aligned, is_valid_tolerance, ArcLengthAligner, BoundaryAligner, GeometryError,
};
