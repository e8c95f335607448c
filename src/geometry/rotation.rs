//! Rotation of array-local coordinates into the detector frame.
//!
//! The two angles align the arrays with the detector door. They were chosen
//! by eye so that particular tube pairs line up with the x and y axes and
//! have not been checked against the survey drawings.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_8, TAU};

use super::Position;

/// Quarter turn plus 1.5 tube widths on a 72-slot circle.
pub const THETA_TOP: f64 = FRAC_PI_2 + (3.0 / 72.0) * TAU;

pub const THETA_BOTTOM: f64 = FRAC_PI_8;

/// Rotate `p` counter-clockwise by `theta` radians about the origin.
pub fn rotate(p: Position, theta: f64) -> Position {
    let (sin, cos) = theta.sin_cos();
    Position {
        x: p.x * cos - p.y * sin,
        y: p.x * sin + p.y * cos,
    }
}
