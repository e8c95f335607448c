//! PMT layout - library crate.
//!
//! Computes the (x, y) positions of the 248 photomultiplier tubes of the
//! two detector arrays and maps them to channel numbers 0..=247, for use
//! by the command line tool and the layout check binary.

pub mod assembly;
pub mod error;
pub mod export;
pub mod geometry;
pub mod reconstruct;

#[cfg(feature = "render")]
pub mod render;

pub use assembly::{PmtMap, pmt_position};
pub use error::{LayoutError, LayoutResult};
pub use geometry::bottom::locate_bottom;
pub use geometry::top::locate_top;
pub use geometry::{
    ArrayId, GeometryConfig, PMT_DISTANCE_BOTTOM, PMT_DISTANCE_TOP, PMT_OUTER_RING_RADIUS,
    Position,
};
