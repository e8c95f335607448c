//! Static geometry of the two PMT arrays.
//!
//! The top array packs 127 tubes into concentric rings, the bottom array
//! packs 121 tubes into staggered rows. Both locators work in an
//! array-local frame; `rotation` turns that frame into the detector frame.

pub mod bottom;
pub mod rotation;
pub mod top;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LayoutError, LayoutResult};

/// Centre-to-centre spacing between neighbouring top-array rings [cm].
pub const PMT_DISTANCE_TOP: f64 = 7.95;

/// Centre-to-centre spacing between neighbouring bottom-array tubes [cm].
pub const PMT_DISTANCE_BOTTOM: f64 = 8.0;

/// Outer radius of one PMT face [cm].
pub const PMT_OUTER_RING_RADIUS: f64 = 3.875;

/// Number of tubes in the top array.
pub const N_TOP: usize = 127;

/// Number of tubes in the bottom array.
pub const N_BOTTOM: usize = 121;

/// Total channel count over both arrays.
pub const N_PMTS: usize = N_TOP + N_BOTTOM;

/// A point in the (x, y) plane, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Polar constructor.
    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }

    /// Distance from the origin.
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Position, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol && (self.y - other.y).abs() <= tol
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Which of the two PMT arrays a tube belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayId {
    Top,
    Bottom,
}

impl ArrayId {
    pub const ALL: &[ArrayId] = &[ArrayId::Top, ArrayId::Bottom];

    pub fn name(self) -> &'static str {
        match self {
            ArrayId::Top => "top",
            ArrayId::Bottom => "bottom",
        }
    }

    /// Number of tubes in this array.
    pub fn pmt_count(self) -> usize {
        match self {
            ArrayId::Top => N_TOP,
            ArrayId::Bottom => N_BOTTOM,
        }
    }

    /// Valid generation numbers for this array's locator, inclusive.
    pub fn generation_range(self) -> (i64, i64) {
        match self {
            ArrayId::Top => (1, N_TOP as i64),
            ArrayId::Bottom => (N_TOP as i64 + 1, N_PMTS as i64),
        }
    }
}

/// Physical constants injected into the locators.
///
/// `Default` gives the detector's nominal values. Loaded from JSON, any
/// omitted field keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub pmt_distance_top: f64,
    pub pmt_distance_bottom: f64,
    pub pmt_outer_ring_radius: f64,
    /// Top array rotation into the detector frame [rad].
    pub theta_top: f64,
    /// Bottom array rotation into the detector frame [rad].
    pub theta_bottom: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            pmt_distance_top: PMT_DISTANCE_TOP,
            pmt_distance_bottom: PMT_DISTANCE_BOTTOM,
            pmt_outer_ring_radius: PMT_OUTER_RING_RADIUS,
            theta_top: rotation::THETA_TOP,
            theta_bottom: rotation::THETA_BOTTOM,
        }
    }
}

impl GeometryConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LayoutResult<()> {
        let lengths = [
            ("pmt_distance_top", self.pmt_distance_top),
            ("pmt_distance_bottom", self.pmt_distance_bottom),
            ("pmt_outer_ring_radius", self.pmt_outer_ring_radius),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::Config(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        for (name, value) in [("theta_top", self.theta_top), ("theta_bottom", self.theta_bottom)] {
            if !value.is_finite() {
                return Err(LayoutError::Config(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Rotation angle for one array.
    pub fn theta(&self, array: ArrayId) -> f64 {
        match array {
            ArrayId::Top => self.theta_top,
            ArrayId::Bottom => self.theta_bottom,
        }
    }

    /// Array-local position of a generation number in the given array.
    pub fn locate(&self, array: ArrayId, n: i64) -> LayoutResult<Position> {
        match array {
            ArrayId::Top => top::locate_top_with(n, self.pmt_distance_top),
            ArrayId::Bottom => bottom::locate_bottom_with(n, self.pmt_distance_bottom),
        }
    }

    /// Detector-frame position of a generation number in the given array.
    pub fn locate_rotated(&self, array: ArrayId, n: i64) -> LayoutResult<Position> {
        let raw = self.locate(array, n)?;
        Ok(rotation::rotate(raw, self.theta(array)))
    }
}

/// Running totals of a capacity table: `out[i] = counts[0] + .. + counts[i]`.
pub(crate) const fn prefix_sums<const N: usize>(counts: [usize; N]) -> [usize; N] {
    let mut out = [0usize; N];
    let mut total = 0;
    let mut i = 0;
    while i < N {
        total += counts[i];
        out[i] = total;
        i += 1;
    }
    out
}

/// Resolve a 1-based index into `(group, within)` against a running-total
/// table. `within` is 1-based. `n` must already be in `1..=totals[N-1]`.
pub(crate) fn split_index(totals: &[usize], counts: &[usize], n: usize) -> (usize, usize) {
    let group = totals.partition_point(|&total| total < n);
    let within = n + counts[group] - totals[group];
    (group, within)
}
