//! core::graph
//!
//! Lane graph representation.
//!
//! # Architecture
//!
//! The lane graph holds two stores:
//! - Lanelets, each naming a left and a right boundary by id
//! - Boundary curves (line strings), shared between lanelets
//!
//! Adjacent lanelets commonly share a curve (the left bound of one is the
//! right bound of its neighbour), so lanelets refer to curves rather than
//! owning them.
//!
//! # Invariants
//!
//! - Every bound id named by a lanelet added through [`LaneGraph::add_lanelet`]
//!   exists in the curve store
//! - Replacing a lanelet's bounds never mutates a curve in place

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::types::{Id, LineString3d};

/// An atomic drivable lane unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lanelet {
    id: Id,
    left: Id,
    right: Id,
    /// Free-form tags from the source relation (`subtype`, `location`, ...)
    pub tags: HashMap<String, String>,
}

impl Lanelet {
    /// Create a lanelet referencing its bounds by id.
    pub fn new(id: Id, left: Id, right: Id) -> Self {
        Self {
            id,
            left,
            right,
            tags: HashMap::new(),
        }
    }

    /// The lanelet's id.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Id of the left boundary curve.
    pub fn left_bound(&self) -> Id {
        self.left
    }

    /// Id of the right boundary curve.
    pub fn right_bound(&self) -> Id {
        self.right
    }

    /// Look up a tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// In-memory lane graph produced by a base loader.
///
/// Lanelets and curves are kept in id order so iteration is deterministic.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneGraph {
    lanelets: BTreeMap<Id, Lanelet>,
    curves: BTreeMap<Id, LineString3d>,
}

impl LaneGraph {
    /// Create an empty lane graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a curve, replacing any curve with the same id.
    pub fn add_curve(&mut self, curve: LineString3d) {
        self.curves.insert(curve.id(), curve);
    }

    /// Insert a lanelet.
    ///
    /// Returns `false` (and does not insert) if either bound is not in the
    /// curve store.
    pub fn add_lanelet(&mut self, lanelet: Lanelet) -> bool {
        let has = |id: &Id| self.curves.contains_key(id);
        if !has(&lanelet.left) || !has(&lanelet.right) {
            return false;
        }
        self.lanelets.insert(lanelet.id, lanelet);
        true
    }

    /// Get a lanelet by id.
    pub fn lanelet(&self, id: Id) -> Option<&Lanelet> {
        self.lanelets.get(&id)
    }

    /// Get a curve by id.
    pub fn curve(&self, id: Id) -> Option<&LineString3d> {
        self.curves.get(&id)
    }

    /// All lanelets in id order.
    pub fn lanelets(&self) -> impl Iterator<Item = &Lanelet> {
        self.lanelets.values()
    }

    /// All lanelet ids in id order.
    pub fn lanelet_ids(&self) -> Vec<Id> {
        self.lanelets.keys().copied().collect()
    }

    /// All curves in id order.
    pub fn curves(&self) -> impl Iterator<Item = &LineString3d> {
        self.curves.values()
    }

    /// Number of lanelets.
    pub fn lanelet_count(&self) -> usize {
        self.lanelets.len()
    }

    /// Number of curves.
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Resolve a lanelet's `(left, right)` curves.
    pub fn bounds(&self, id: Id) -> Option<(&LineString3d, &LineString3d)> {
        let lanelet = self.lanelets.get(&id)?;
        Some((
            self.curves.get(&lanelet.left)?,
            self.curves.get(&lanelet.right)?,
        ))
    }

    /// Replace a lanelet's boundary pair.
    ///
    /// A replacement identical to the current curve keeps the current id.
    /// Anything else is stored under a fresh id so other lanelets sharing
    /// the old curve are untouched.
    ///
    /// Returns the number of new curves stored, or `None` if the lanelet
    /// does not exist.
    ///
    /// # Example
    ///
    /// ```
    /// use lanelet_osm::core::graph::{LaneGraph, Lanelet};
    /// use lanelet_osm::core::types::{LineString3d, Point3d};
    ///
    /// let mut graph = LaneGraph::new();
    /// let p = |x: f64, y: f64| Point3d::new(x, y, 0.0);
    /// graph.add_curve(LineString3d::new(1, vec![p(0.0, 1.0), p(4.0, 1.0)]));
    /// graph.add_curve(LineString3d::new(2, vec![p(0.0, 0.0), p(4.0, 0.0)]));
    /// assert!(graph.add_lanelet(Lanelet::new(10, 1, 2)));
    ///
    /// let left = graph.curve(1).unwrap().clone();
    /// let right = LineString3d::new(2, vec![p(0.0, 0.0), p(2.0, 0.0), p(4.0, 0.0)]);
    /// assert_eq!(graph.set_bounds(10, left, right), Some(1));
    ///
    /// let lanelet = graph.lanelet(10).unwrap();
    /// assert_eq!(lanelet.left_bound(), 1);
    /// assert_ne!(lanelet.right_bound(), 2);
    /// assert_eq!(graph.curve(2).unwrap().len(), 2);
    /// ```
    pub fn set_bounds(
        &mut self,
        id: Id,
        left: LineString3d,
        right: LineString3d,
    ) -> Option<usize> {
        let (old_left, old_right) = {
            let lanelet = self.lanelets.get(&id)?;
            (lanelet.left, lanelet.right)
        };

        let mut stored = 0;
        let new_left = self.store_replacement(old_left, left, &mut stored);
        let new_right = self.store_replacement(old_right, right, &mut stored);

        let lanelet = self.lanelets.get_mut(&id)?;
        lanelet.left = new_left;
        lanelet.right = new_right;
        Some(stored)
    }

    fn store_replacement(&mut self, old: Id, curve: LineString3d, stored: &mut usize) -> Id {
        if let Some(existing) = self.curves.get(&old) {
            if existing.points() == curve.points() {
                return old;
            }
        }
        let id = self.next_curve_id();
        self.curves.insert(id, curve.with_id(id));
        *stored += 1;
        id
    }

    /// Next id used by neither store.
    ///
    /// OSM numbers ways and relations separately, so a fresh curve id is
    /// kept clear of lanelet ids too. Normally one above the highest id in
    /// use; once that would overflow, the lowest free positive id.
    fn next_curve_id(&self) -> Id {
        let max_curve = self.curves.keys().next_back().copied();
        let max_lanelet = self.lanelets.keys().next_back().copied();
        match max_curve.max(max_lanelet) {
            None => 1,
            Some(max) => match max.checked_add(1) {
                Some(id) => id.max(1),
                None => (1..)
                    .find(|id| !self.curves.contains_key(id) && !self.lanelets.contains_key(id))
                    .unwrap_or(Id::MIN),
            },
        }
    }
}
