//! geometry::align
//!
//! Boundary pair alignment.
//!
//! # Design
//!
//! Two boundaries of one lanelet are usually drawn independently: they can
//! have different point density and their vertices rarely sit opposite each
//! other. Width and centerline computations need vertex pairs that face each
//! other across the lane.
//!
//! [`ArcLengthAligner`] pairs vertices by *station*, the normalized arc
//! length of a vertex along its curve (0 at the first point, 1 at the last).
//! Both station lists are walked together: stations within tolerance pair
//! up, and any other station gets an interpolated partner vertex on the
//! other curve. Pairing is one to one, so afterwards both curves have the
//! same number of vertices at matching stations. Repeated or nearly
//! coincident vertices get repeated partners.
//!
//! # Invariants
//!
//! - Point order is never reversed; original vertices are never moved or
//!   dropped
//! - Aligning an aligned pair returns it unchanged
//! - A right bound drawn against the left bound's direction is paired by
//!   position along the lane (mirrored stations), not by point index

use thiserror::Error;

use crate::core::config::DEFAULT_STATION_TOLERANCE;
use crate::core::types::{Id, LineString3d, Point3d};

/// Errors from boundary alignment.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeometryError {
    /// Fewer than two points.
    #[error("boundary {curve} is degenerate: {points} point(s), need at least 2")]
    Degenerate { curve: Id, points: usize },

    /// All points coincide, so stations are undefined.
    #[error("boundary {curve} has zero length")]
    ZeroLength { curve: Id },
}

/// Geometry-alignment capability.
///
/// Implementations must be idempotent and must not reverse either curve.
pub trait BoundaryAligner: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Align a `(left, right)` boundary pair.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError` if either curve is unusable.
    fn align(
        &self,
        left: &LineString3d,
        right: &LineString3d,
    ) -> Result<(LineString3d, LineString3d), GeometryError>;
}

/// Default aligner: pairs vertices by normalized arc length.
///
/// # Example
///
/// ```
/// use lanelet_osm::core::types::{LineString3d, Point3d};
/// use lanelet_osm::geometry::{ArcLengthAligner, BoundaryAligner};
///
/// let p = |x: f64, y: f64| Point3d::new(x, y, 0.0);
/// let left = LineString3d::new(1, vec![p(0.0, 3.0), p(10.0, 3.0)]);
/// let right = LineString3d::new(2, vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0)]);
///
/// let aligner = ArcLengthAligner::default();
/// let (l, r) = aligner.align(&left, &right).unwrap();
/// assert_eq!(l.points(), &[p(0.0, 3.0), p(5.0, 3.0), p(10.0, 3.0)]);
/// assert_eq!(r, right);
///
/// // Already aligned: nothing changes
/// let (l2, r2) = aligner.align(&l, &r).unwrap();
/// assert_eq!((l2, r2), (l, r));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLengthAligner {
    tolerance: f64,
}

impl Default for ArcLengthAligner {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_STATION_TOLERANCE,
        }
    }
}

impl ArcLengthAligner {
    /// Create an aligner; stations closer than `tolerance` count as equal.
    ///
    /// A tolerance outside `(0, 0.5)` (or non-finite) is replaced by
    /// [`DEFAULT_STATION_TOLERANCE`].
    pub fn new(tolerance: f64) -> Self {
        if is_valid_tolerance(tolerance) {
            return Self { tolerance };
        }
        tracing::warn!(
            tolerance,
            fallback = DEFAULT_STATION_TOLERANCE,
            "station tolerance out of range, using default"
        );
        Self {
            tolerance: DEFAULT_STATION_TOLERANCE,
        }
    }

    /// Station tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Whether `tolerance` is usable as a station tolerance.
///
/// Stations live in [0, 1]; a tolerance of half that merges everything.
pub fn is_valid_tolerance(tolerance: f64) -> bool {
    tolerance.is_finite() && tolerance > 0.0 && tolerance < 0.5
}

impl BoundaryAligner for ArcLengthAligner {
    fn name(&self) -> &'static str {
        "arc_length"
    }

    fn align(
        &self,
        left: &LineString3d,
        right: &LineString3d,
    ) -> Result<(LineString3d, LineString3d), GeometryError> {
        let left_stations = stations(left)?;
        let right_stations = stations(right)?;

        if !is_opposed(left, right) {
            return Ok(merge(left, &left_stations, right, &right_stations, self.tolerance));
        }

        // Walk an opposed right bound back to front on mirrored stations,
        // then restore its order
        let mut reversed = right.points().to_vec();
        reversed.reverse();
        let reversed = LineString3d::new(right.id(), reversed);
        let reversed_stations: Vec<f64> = right_stations.iter().rev().map(|s| 1.0 - s).collect();

        let (new_left, new_right) =
            merge(left, &left_stations, &reversed, &reversed_stations, self.tolerance);
        let mut points = new_right.points().to_vec();
        points.reverse();
        Ok((new_left, LineString3d::new(right.id(), points)))
    }
}

/// Normalized arc length of every vertex.
///
/// The first station is exactly 0 and the last exactly 1. Repeated points
/// share a station.
///
/// # Errors
///
/// `Degenerate` for fewer than two points, `ZeroLength` when all points
/// coincide.
pub fn stations(curve: &LineString3d) -> Result<Vec<f64>, GeometryError> {
    if curve.is_degenerate() {
        return Err(GeometryError::Degenerate {
            curve: curve.id(),
            points: curve.len(),
        });
    }

    let points = curve.points();
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance(&pair[1]);
        cumulative.push(total);
    }

    if !(total > 0.0 && total.is_finite()) {
        return Err(GeometryError::ZeroLength { curve: curve.id() });
    }

    let last = cumulative.len() - 1;
    for (i, s) in cumulative.iter_mut().enumerate() {
        *s = if i == last { 1.0 } else { *s / total };
    }
    Ok(cumulative)
}

/// Whether `right` runs against `left`'s direction of travel.
fn is_opposed(left: &LineString3d, right: &LineString3d) -> bool {
    let (Some(lf), Some(lb), Some(rf), Some(rb)) =
        (left.front(), left.back(), right.front(), right.back())
    else {
        return false;
    };
    let dot = (lb.x - lf.x) * (rb.x - rf.x)
        + (lb.y - lf.y) * (rb.y - rf.y)
        + (lb.z - lf.z) * (rb.z - rf.z);
    dot < 0.0
}

/// One side of a merge: a curve, its stations, and how far it has been
/// emitted.
struct Cursor<'a> {
    points: &'a [Point3d],
    stations: &'a [f64],
    next: usize,
    last: f64,
    out: Vec<Point3d>,
}

impl<'a> Cursor<'a> {
    fn new(curve: &'a LineString3d, stations: &'a [f64], capacity: usize) -> Self {
        Self {
            points: curve.points(),
            stations,
            next: 0,
            last: 0.0,
            out: Vec::with_capacity(capacity),
        }
    }

    fn peek(&self) -> Option<f64> {
        self.stations.get(self.next).copied()
    }

    /// Emit the next original vertex.
    fn take(&mut self) {
        self.out.push(self.points[self.next]);
        self.last = self.stations[self.next];
        self.next += 1;
    }

    /// Emit an interpolated vertex at `station`, between the last original
    /// vertex emitted and the next one.
    ///
    /// Never steps back: a station behind the last one emitted repeats the
    /// current position.
    fn sample(&mut self, station: f64) {
        let station = station.max(self.last);
        let prev = self.next.saturating_sub(1);
        let point = match (self.points.get(prev), self.points.get(self.next)) {
            (Some(a), Some(b)) => {
                let (start, end) = (self.stations[prev], self.stations[self.next]);
                if end > start {
                    a.lerp(b, ((station - start) / (end - start)).clamp(0.0, 1.0))
                } else {
                    *a
                }
            }
            (Some(a), None) => *a,
            (None, _) => return,
        };
        self.out.push(point);
        self.last = station;
    }
}

/// Pair both curves' stations one to one.
///
/// Walks both station lists in order. Stations within `tolerance` of each
/// other pair up; otherwise the lower one is emitted with an interpolated
/// partner vertex. Every vertex on either side is paired with exactly one
/// vertex on the other, so the outputs always have equal length.
///
/// When every station already pairs, the inputs are returned as they were.
fn merge(
    left: &LineString3d,
    left_stations: &[f64],
    right: &LineString3d,
    right_stations: &[f64],
    tolerance: f64,
) -> (LineString3d, LineString3d) {
    let capacity = left.len() + right.len();
    let mut l = Cursor::new(left, left_stations, capacity);
    let mut r = Cursor::new(right, right_stations, capacity);

    loop {
        match (l.peek(), r.peek()) {
            (Some(a), Some(b)) if (a - b).abs() <= tolerance => {
                l.take();
                r.take();
            }
            (Some(a), Some(b)) if a < b => {
                l.take();
                r.sample(a);
            }
            (Some(a), None) => {
                l.take();
                r.sample(a);
            }
            (_, Some(b)) => {
                r.take();
                l.sample(b);
            }
            (None, None) => break,
        }
    }

    (
        LineString3d::new(left.id(), l.out),
        LineString3d::new(right.id(), r.out),
    )
}

/// Check whether a pair already satisfies the alignment invariant.
///
/// Both curves must have the same number of vertices and every vertex pair
/// must sit at the same station (mirrored for opposed curves) within
/// `tolerance`.
pub fn is_aligned(left: &LineString3d, right: &LineString3d, tolerance: f64) -> bool {
    let (Ok(ls), Ok(rs)) = (stations(left), stations(right)) else {
        return false;
    };
    if ls.len() != rs.len() {
        return false;
    }

    if is_opposed(left, right) {
        ls.iter()
            .zip(rs.iter().rev())
            .all(|(l, r)| (l - (1.0 - r)).abs() <= tolerance)
    } else {
        ls.iter().zip(&rs).all(|(l, r)| (l - r).abs() <= tolerance)
    }
}

/// Midpoint between paired vertices, usable as a centerline.
///
/// Expects an aligned pair; returns `None` otherwise.
pub fn centerline(
    left: &LineString3d,
    right: &LineString3d,
    tolerance: f64,
) -> Option<Vec<Point3d>> {
    if !is_aligned(left, right, tolerance) {
        return None;
    }
    let opposed = is_opposed(left, right);
    let n = left.len();
    Some(
        (0..n)
            .map(|i| {
                let r = if opposed { n - 1 - i } else { i };
                left.points()[i].lerp(&right.points()[r], 0.5)
            })
            .collect(),
    )
}
