//! Property-based tests for version parsing and boundary alignment.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use lanelet_osm::core::types::{LineString3d, Point3d};
use lanelet_osm::core::version::{parse_major_version, MapFormatVersion, MAX_GROUP_DIGITS};
use lanelet_osm::geometry::{is_aligned, ArcLengthAligner, BoundaryAligner};

const TOL: f64 = 1e-6;

/// Strategy for one in-bound digit group.
fn digit_group() -> impl Strategy<Value = String> {
    "[0-9]{1,9}"
}

/// Strategy for valid dotted versions with one to three groups.
fn valid_version() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(digit_group(), 1..=3)
}

/// Strategy for a boundary running roughly along +x at lateral offset `y`.
///
/// Most segments are at least 0.5 long. After any step the strategy may
/// repeat the vertex or add a step far below the alignment tolerance, the
/// way duplicated or nearly coincident surveyed nodes show up in real maps.
fn boundary(id: i64, y: f64) -> impl Strategy<Value = LineString3d> {
    let crowding = prop_oneof![
        6 => Just(None),
        1 => Just(Some(0.0)),
        1 => (1e-9f64..1e-6).prop_map(Some),
    ];
    prop::collection::vec(((0.5f64..5.0, -0.3f64..0.3, -0.1f64..0.1), crowding), 1..12)
        .prop_map(move |steps| {
            let mut x = 0.0;
            let mut points = vec![Point3d::new(0.0, y, 0.0)];
            for ((dx, dy, dz), extra) in steps {
                x += dx;
                points.push(Point3d::new(x, y + dy, dz));
                if let Some(tiny) = extra {
                    x += tiny;
                    points.push(Point3d::new(x, y + dy, dz));
                }
            }
            LineString3d::new(id, points)
        })
}

/// Whether `original` appears in `aligned` in the same order.
fn is_ordered_subsequence(original: &[Point3d], aligned: &[Point3d]) -> bool {
    let mut remaining = aligned.iter();
    original.iter().all(|p| remaining.any(|q| q == p))
}

proptest! {
    /// Every valid version yields its first group as the major.
    #[test]
    fn major_is_first_group(groups in valid_version()) {
        let version = groups.join(".");
        let expected: u32 = groups[0].parse().unwrap();
        prop_assert_eq!(parse_major_version(&version), Some(expected));
    }

    /// Four or more groups are never a version.
    #[test]
    fn too_many_groups_rejected(groups in prop::collection::vec(digit_group(), 4..8)) {
        prop_assert_eq!(parse_major_version(&groups.join(".")), None);
    }

    /// Any accepted string is 1-3 non-empty, bounded, all-digit groups.
    #[test]
    fn accepted_strings_match_grammar(input in "[0-9.a ]{0,24}") {
        if let Some(major) = parse_major_version(&input) {
            let groups: Vec<&str> = input.split('.').collect();
            prop_assert!((1..=3).contains(&groups.len()));
            for group in &groups {
                prop_assert!(!group.is_empty() && group.len() <= MAX_GROUP_DIGITS);
                prop_assert!(group.bytes().all(|b| b.is_ascii_digit()));
            }
            prop_assert_eq!(major, groups[0].parse::<u32>().unwrap());
        }
    }

    /// Display of a parsed version parses back to the same version.
    #[test]
    fn display_reparses(groups in valid_version()) {
        let parsed = MapFormatVersion::parse(&groups.join(".")).unwrap();
        prop_assert_eq!(MapFormatVersion::parse(&parsed.to_string()), Some(parsed));
    }

    /// Aligning an aligned pair changes nothing.
    #[test]
    fn alignment_is_idempotent((left, right) in boundary_pair()) {
        let aligner = ArcLengthAligner::new(TOL);
        let once = aligner.align(&left, &right).unwrap();
        let twice = aligner.align(&once.0, &once.1).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Alignment keeps endpoints and original vertex order.
    #[test]
    fn alignment_preserves_direction((left, right) in boundary_pair()) {
        let (l, r) = ArcLengthAligner::new(TOL).align(&left, &right).unwrap();

        prop_assert_eq!(l.front(), left.front());
        prop_assert_eq!(l.back(), left.back());
        prop_assert_eq!(r.front(), right.front());
        prop_assert_eq!(r.back(), right.back());
        prop_assert!(is_ordered_subsequence(left.points(), l.points()));
        prop_assert!(is_ordered_subsequence(right.points(), r.points()));
    }

    /// Aligned pairs have vertex-for-vertex matching stations.
    #[test]
    fn aligned_pairs_satisfy_invariant((left, right) in boundary_pair()) {
        let (l, r) = ArcLengthAligner::new(TOL).align(&left, &right).unwrap();
        prop_assert_eq!(l.len(), r.len());
        prop_assert!(is_aligned(&l, &r, TOL));
    }
}
