//! Property-based tests for the PMT layout using proptest.
//!
//! Covers: locator termination and monotonic ring/row assignment, channel
//! mapping, rotation round trip, out-of-range rejection, geometry scaling.

use pmt_layout::assembly::{channel_of, generation_of, pmt_position};
use pmt_layout::geometry::bottom::{locate_bottom, locate_bottom_with, row_of};
use pmt_layout::geometry::rotation::rotate;
use pmt_layout::geometry::top::{locate_top, locate_top_with, ring_of};
use pmt_layout::geometry::{PMT_DISTANCE_BOTTOM, PMT_DISTANCE_TOP, Position};
use pmt_layout::LayoutError;
use proptest::prelude::*;

// ── Top Array ────────────────────────────────────────────────────────

proptest! {
    /// Every valid generation number yields a finite position on its ring.
    #[test]
    fn top_position_on_ring(n in 1i64..=127) {
        let (ring, within) = ring_of(n).unwrap();
        let p = locate_top(n).unwrap();
        prop_assert!(p.is_finite());
        prop_assert!(within >= 1);
        prop_assert!((p.radius() - ring as f64 * PMT_DISTANCE_TOP).abs() < 1e-9,
            "tube {} on ring {} at r={}", n, ring, p.radius());
    }

    /// Ring index never decreases with the generation number.
    #[test]
    fn top_ring_monotonic(n in 1i64..127) {
        let (a, _) = ring_of(n).unwrap();
        let (b, _) = ring_of(n + 1).unwrap();
        prop_assert!(b >= a);
        prop_assert!(b <= a + 1);
    }

    /// Radius scales linearly with ring spacing.
    #[test]
    fn top_pitch_scaling(n in 1i64..=127, pitch in 1.0f64..20.0) {
        let base = locate_top_with(n, 1.0).unwrap();
        let scaled = locate_top_with(n, pitch).unwrap();
        prop_assert!((scaled.radius() - pitch * base.radius()).abs() < 1e-9);
    }

    #[test]
    fn top_rejects_outside(n in prop_oneof![i64::MIN..1i64, 128i64..i64::MAX]) {
        let is_out_of_range = matches!(locate_top(n), Err(LayoutError::OutOfRange { .. }));
        prop_assert!(is_out_of_range);
    }
}

// ── Bottom Array ─────────────────────────────────────────────────────

proptest! {
    /// Row index never decreases and slot resets at each new row.
    #[test]
    fn bottom_row_monotonic(n in 128i64..248) {
        let (row_a, within_a) = row_of(n).unwrap();
        let (row_b, within_b) = row_of(n + 1).unwrap();
        prop_assert!(row_b >= row_a);
        if row_b == row_a {
            prop_assert_eq!(within_b, within_a + 1);
        } else {
            prop_assert_eq!(row_b, row_a + 1);
            prop_assert_eq!(within_b, 1);
        }
    }

    /// Tubes in one row share y and sit one pitch apart.
    #[test]
    fn bottom_row_spacing(n in 128i64..248) {
        let (row_a, _) = row_of(n).unwrap();
        let (row_b, _) = row_of(n + 1).unwrap();
        prop_assume!(row_a == row_b);
        let a = locate_bottom(n).unwrap();
        let b = locate_bottom(n + 1).unwrap();
        prop_assert!((a.y - b.y).abs() < 1e-12);
        prop_assert!((b.x - a.x - PMT_DISTANCE_BOTTOM).abs() < 1e-9);
    }

    #[test]
    fn bottom_pitch_scaling(n in 128i64..=248, pitch in 1.0f64..20.0) {
        let base = locate_bottom_with(n, 1.0).unwrap();
        let scaled = locate_bottom_with(n, pitch).unwrap();
        prop_assert!((scaled.x - pitch * base.x).abs() < 1e-9);
        prop_assert!((scaled.y - pitch * base.y).abs() < 1e-9);
    }

    #[test]
    fn bottom_rejects_outside(n in prop_oneof![i64::MIN..128i64, 249i64..i64::MAX]) {
        let is_out_of_range = matches!(locate_bottom(n), Err(LayoutError::OutOfRange { .. }));
        prop_assert!(is_out_of_range);
    }
}

// ── Channels and Rotation ────────────────────────────────────────────

proptest! {
    /// Channel -> (array, generation) -> channel is the identity.
    #[test]
    fn channel_mapping_inverse(ch in 0i64..248) {
        let (array, generation) = generation_of(ch).unwrap();
        prop_assert_eq!(channel_of(array, generation as i64).unwrap(), ch as usize);
        prop_assert!(pmt_position(ch).unwrap().is_finite());
    }

    #[test]
    fn channel_rejects_outside(ch in prop_oneof![i64::MIN..0i64, 248i64..i64::MAX]) {
        prop_assert!(pmt_position(ch).is_err());
    }

    /// Rotating by theta then -theta returns the start point.
    #[test]
    fn rotation_round_trip(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        theta in -10.0f64..10.0,
    ) {
        let p = Position::new(x, y);
        let back = rotate(rotate(p, theta), -theta);
        prop_assert!(back.approx_eq(&p, 1e-9), "{:?} -> {:?}", p, back);
        prop_assert!((rotate(p, theta).radius() - p.radius()).abs() < 1e-9);
    }
}
