//! core::types
//!
//! Strong types for lane map geometry.
//!
//! # Types
//!
//! - [`Id`] - OSM element identifier
//! - [`Point3d`] - Local metric coordinate
//! - [`LineString3d`] - Ordered boundary curve
//!
//! # Examples
//!
//! ```
//! use lanelet_osm::core::types::{LineString3d, Point3d};
//!
//! let curve = LineString3d::new(7, vec![Point3d::new(0.0, 0.0, 0.0), Point3d::new(3.0, 4.0, 0.0)]);
//! assert_eq!(curve.length(), 5.0);
//! assert!(!curve.is_degenerate());
//! ```

use serde::{Deserialize, Serialize};

/// OSM element identifier.
///
/// OSM ids are signed: editors hand out negative ids to elements that were
/// never uploaded, and lanelet maps frequently keep them.
pub type Id = i64;

/// A point in the map's local metric frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    /// Create a point from its components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point3d) -> f64 {
        let (dx, dy, dz) = (other.x - self.x, other.y - self.y, other.z - self.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    pub fn lerp(&self, other: &Point3d, t: f64) -> Point3d {
        Point3d {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

/// An ordered 3D polyline describing one edge of a lanelet.
///
/// Point order is meaningful: it is the curve's direction of travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString3d {
    id: Id,
    points: Vec<Point3d>,
}

impl LineString3d {
    /// Create a curve from its id and points.
    pub fn new(id: Id, points: Vec<Point3d>) -> Self {
        Self { id, points }
    }

    /// The curve's id in the map.
    pub fn id(&self) -> Id {
        self.id
    }

    /// The curve's points in travel order.
    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no points at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A curve needs at least two points to have a direction.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// First point, if any.
    pub fn front(&self) -> Option<&Point3d> {
        self.points.first()
    }

    /// Last point, if any.
    pub fn back(&self) -> Option<&Point3d> {
        self.points.last()
    }

    /// Total 3D arc length.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    /// Same geometry under a different id.
    pub fn with_id(self, id: Id) -> Self {
        Self { id, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance_and_lerp() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(2.0, 0.0, 0.0);
        assert_eq!(a.distance(&b), 2.0);
        assert_eq!(a.lerp(&b, 0.25), Point3d::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn length_sums_segments() {
        let ls = LineString3d::new(
            1,
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 2.0, 0.0),
            ],
        );
        assert_eq!(ls.length(), 3.0);
        assert_eq!(ls.len(), 3);
    }

    #[test]
    fn degenerate_curves() {
        assert!(LineString3d::new(1, vec![]).is_degenerate());
        assert!(LineString3d::new(1, vec![Point3d::default()]).is_degenerate());
    }

    #[test]
    fn with_id_keeps_points() {
        let ls = LineString3d::new(1, vec![Point3d::default(), Point3d::new(1.0, 0.0, 0.0)]);
        let renamed = ls.clone().with_id(9);
        assert_eq!(renamed.id(), 9);
        assert_eq!(renamed.points(), ls.points());
    }
}
