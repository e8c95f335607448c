//! Bottom array: 121 tubes on thirteen staggered rows.
//!
//! Rows are hexagonally close-packed: neighbouring rows sit
//! `sqrt(3)/2 * pitch` apart vertically. Row 0 is the topmost row and the
//! rows are symmetric about y = 0.
//!
//! Generation numbers continue the top-array numbering, so the valid
//! domain is `128..=248` and row lookup works on `n - 127`.

use super::{N_BOTTOM, N_PMTS, N_TOP, PMT_DISTANCE_BOTTOM, Position, prefix_sums, split_index};
use crate::error::{LayoutResult, check_range};

pub const N_ROWS: usize = 13;

/// Tubes per row, top row first.
pub const ROW_COUNT: [usize; N_ROWS] = [5, 8, 9, 10, 11, 12, 11, 12, 11, 10, 9, 8, 5];

/// Tubes in rows `0..=i`.
pub const ROW_TOTAL: [usize; N_ROWS] = prefix_sums(ROW_COUNT);

const _: () = assert!(ROW_TOTAL[N_ROWS - 1] == N_BOTTOM);

/// Vertical distance between neighbouring rows.
pub fn row_distance(pitch: f64) -> f64 {
    3f64.sqrt() / 2.0 * pitch
}

/// x of the slot before the first tube of `row`.
pub fn row_offset(row: usize, pitch: f64) -> f64 {
    -0.5 * (ROW_COUNT[row] as f64 - 1.0) * pitch
}

/// y of every tube in `row`.
pub fn row_height(row: usize, pitch: f64) -> f64 {
    (0.5 * (N_ROWS as f64 - 1.0) - row as f64) * row_distance(pitch)
}

/// Row index and 1-based position within the row for generation number `n`.
pub fn row_of(n: i64) -> LayoutResult<(usize, usize)> {
    check_range("bottom generation number", n, N_TOP as i64 + 1, N_PMTS as i64)?;
    Ok(split_index(&ROW_TOTAL, &ROW_COUNT, n as usize - N_TOP))
}

/// Array-local position of bottom tube `n` (`128..=248`).
pub fn locate_bottom(n: i64) -> LayoutResult<Position> {
    locate_bottom_with(n, PMT_DISTANCE_BOTTOM)
}

/// As [`locate_bottom`] with an explicit tube spacing.
pub fn locate_bottom_with(n: i64, pitch: f64) -> LayoutResult<Position> {
    let (row, within) = row_of(n)?;
    let x = row_offset(row, pitch) + within as f64 * pitch;
    let y = row_height(row, pitch);
    log::trace!("bottom {n}: row {row}, slot {within}");
    Ok(Position::new(x, y))
}
