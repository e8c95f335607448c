//! Top array: 127 tubes on seven concentric rings.
//!
//! Ring `i > 0` holds `6 * i` tubes spaced evenly by angle on a circle of
//! radius `i * pitch`. Ring 0 is the single centre tube.

use std::f64::consts::TAU;

use super::{N_TOP, PMT_DISTANCE_TOP, Position, prefix_sums, split_index};
use crate::error::{LayoutResult, check_range};

pub const N_RINGS: usize = 7;

/// Tubes per ring. Ring 0 holds one tube, not `0 * 6`.
pub const RING_COUNT: [usize; N_RINGS] = [1, 6, 12, 18, 24, 30, 36];

/// Tubes in rings `0..=i`.
pub const RING_TOTAL: [usize; N_RINGS] = prefix_sums(RING_COUNT);

const _: () = assert!(RING_TOTAL[N_RINGS - 1] == N_TOP);

/// Ring index and 1-based position within the ring for generation number `n`.
pub fn ring_of(n: i64) -> LayoutResult<(usize, usize)> {
    check_range("top generation number", n, 1, N_TOP as i64)?;
    Ok(split_index(&RING_TOTAL, &RING_COUNT, n as usize))
}

/// Array-local position of top tube `n` (1-based, `1..=127`).
pub fn locate_top(n: i64) -> LayoutResult<Position> {
    locate_top_with(n, PMT_DISTANCE_TOP)
}

/// As [`locate_top`] with an explicit ring spacing.
pub fn locate_top_with(n: i64, pitch: f64) -> LayoutResult<Position> {
    let (ring, within) = ring_of(n)?;
    if ring == 0 {
        return Ok(Position::ORIGIN);
    }
    let angle = within as f64 * TAU / RING_COUNT[ring] as f64;
    let radius = ring as f64 * pitch;
    log::trace!("top {n}: ring {ring}, slot {within}, r={radius:.3}");
    Ok(Position::from_polar(radius, angle))
}
