//! Channel map: both arrays merged into one list indexed by channel 0..=247.
//!
//! Channels 0..=126 are the top array in reverse generation order, so
//! channel 0 is the last tube of the outermost ring and channel 126 the
//! centre tube. Channels 127..=247 are the bottom array in generation order.

use rayon::prelude::*;
use serde::Serialize;
use std::ops::Range;

use crate::error::{LayoutResult, check_range};
use crate::geometry::{ArrayId, GeometryConfig, N_PMTS, N_TOP, Position, bottom, top};

/// Everything known about one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelInfo {
    pub channel: usize,
    pub array: ArrayId,
    /// Generation number passed to the array's locator.
    pub generation: usize,
    /// Ring (top) or row (bottom) index.
    pub group: usize,
    /// 1-based slot within the ring or row.
    pub within: usize,
    /// Detector-frame position [cm].
    pub position: Position,
}

fn check_channel(channel: i64) -> LayoutResult<usize> {
    check_range("channel", channel, 0, N_PMTS as i64 - 1)?;
    Ok(channel as usize)
}

/// Array and generation number behind a channel.
pub fn generation_of(channel: i64) -> LayoutResult<(ArrayId, usize)> {
    let channel = check_channel(channel)?;
    if channel < N_TOP {
        Ok((ArrayId::Top, N_TOP - channel))
    } else {
        Ok((ArrayId::Bottom, channel + 1))
    }
}

/// Inverse of [`generation_of`].
pub fn channel_of(array: ArrayId, generation: i64) -> LayoutResult<usize> {
    let (min, max) = array.generation_range();
    check_range("generation number", generation, min, max)?;
    let generation = generation as usize;
    Ok(match array {
        ArrayId::Top => N_TOP - generation,
        ArrayId::Bottom => generation - 1,
    })
}

/// Channels belonging to `array`, as a contiguous range.
pub fn channel_range(array: ArrayId) -> Range<usize> {
    match array {
        ArrayId::Top => 0..N_TOP,
        ArrayId::Bottom => N_TOP..N_PMTS,
    }
}

pub fn array_of(channel: i64) -> LayoutResult<ArrayId> {
    generation_of(channel).map(|(array, _)| array)
}

/// Detector-frame position of a channel with the nominal geometry.
pub fn pmt_position(channel: i64) -> LayoutResult<Position> {
    pmt_position_with(channel, &GeometryConfig::default())
}

pub fn pmt_position_with(channel: i64, config: &GeometryConfig) -> LayoutResult<Position> {
    let (array, generation) = generation_of(channel)?;
    config.locate_rotated(array, generation as i64)
}

pub fn channel_info(channel: i64, config: &GeometryConfig) -> LayoutResult<ChannelInfo> {
    let (array, generation) = generation_of(channel)?;
    let (group, within) = match array {
        ArrayId::Top => top::ring_of(generation as i64)?,
        ArrayId::Bottom => bottom::row_of(generation as i64)?,
    };
    Ok(ChannelInfo {
        channel: channel as usize,
        array,
        generation,
        group,
        within,
        position: config.locate_rotated(array, generation as i64)?,
    })
}

/// Precomputed positions for all 248 channels.
#[derive(Debug, Clone)]
pub struct PmtMap {
    config: GeometryConfig,
    channels: Vec<ChannelInfo>,
}

impl PmtMap {
    /// Build the map for a validated configuration.
    pub fn build(config: GeometryConfig) -> LayoutResult<Self> {
        config.validate()?;
        let channels = (0..N_PMTS)
            .into_par_iter()
            .map(|ch| channel_info(ch as i64, &config))
            .collect::<LayoutResult<Vec<_>>>()?;
        log::debug!(
            "assembled {} channels (theta_top={:.4}, theta_bottom={:.4})",
            channels.len(),
            config.theta_top,
            config.theta_bottom
        );
        Ok(Self { config, channels })
    }

    /// Map for the nominal detector geometry.
    pub fn nominal() -> LayoutResult<Self> {
        Self::build(GeometryConfig::default())
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn channels(&self) -> &[ChannelInfo] {
        &self.channels
    }

    pub fn get(&self, channel: usize) -> Option<&ChannelInfo> {
        self.channels.get(channel)
    }

    pub fn position(&self, channel: i64) -> LayoutResult<Position> {
        let channel = check_channel(channel)?;
        Ok(self.channels[channel].position)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.channels.iter().map(|c| c.position).collect()
    }

    pub fn channels_in(&self, array: ArrayId) -> impl Iterator<Item = &ChannelInfo> {
        self.channels[channel_range(array)].iter()
    }

    /// Channel whose tube face in `array` covers `p`, if any.
    pub fn channel_at(&self, array: ArrayId, p: Position) -> Option<usize> {
        let radius = self.config.pmt_outer_ring_radius;
        self.channels_in(array)
            .find(|c| c.position.distance(&p) <= radius)
            .map(|c| c.channel)
    }

    /// Channel in `array` with the tube centre closest to `p`.
    pub fn nearest(&self, array: ArrayId, p: Position) -> Option<usize> {
        self.channels_in(array)
            .min_by(|a, b| a.position.distance(&p).total_cmp(&b.position.distance(&p)))
            .map(|c| c.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::geometry::rotation::{THETA_BOTTOM, THETA_TOP, rotate};
    use crate::geometry::{PMT_OUTER_RING_RADIUS, bottom::locate_bottom, top::locate_top};

    fn nominal() -> PmtMap {
        PmtMap::nominal().unwrap()
    }

    #[test]
    fn test_map_size() {
        let map = nominal();
        assert_eq!(map.channels().len(), N_PMTS);
        for (i, c) in map.channels().iter().enumerate() {
            assert_eq!(c.channel, i);
            assert!(c.position.is_finite());
        }
        assert_eq!(map.channels_in(ArrayId::Top).count(), 127);
        assert_eq!(map.channels_in(ArrayId::Bottom).count(), 121);
        for &array in ArrayId::ALL {
            for ch in channel_range(array) {
                assert_eq!(array_of(ch as i64).unwrap(), array);
            }
        }
    }

    #[test]
    fn test_top_reversal() {
        let p0 = pmt_position(0).unwrap();
        let expected = rotate(locate_top(127).unwrap(), THETA_TOP);
        assert!(p0.approx_eq(&expected, 1e-12));

        let p126 = pmt_position(126).unwrap();
        let expected = rotate(locate_top(1).unwrap(), THETA_TOP);
        assert!(p126.approx_eq(&expected, 1e-12));
        assert!(p126.radius() < 1e-12);
    }

    #[test]
    fn test_bottom_offset() {
        let p = pmt_position(127).unwrap();
        let expected = rotate(locate_bottom(128).unwrap(), THETA_BOTTOM);
        assert!(p.approx_eq(&expected, 1e-12));

        let p = pmt_position(247).unwrap();
        let expected = rotate(locate_bottom(248).unwrap(), THETA_BOTTOM);
        assert!(p.approx_eq(&expected, 1e-12));
    }

    #[test]
    fn test_generation_mapping_inverse() {
        for ch in 0..N_PMTS as i64 {
            let (array, generation) = generation_of(ch).unwrap();
            assert_eq!(channel_of(array, generation as i64).unwrap(), ch as usize);
        }
        assert_eq!(generation_of(0).unwrap(), (ArrayId::Top, 127));
        assert_eq!(generation_of(126).unwrap(), (ArrayId::Top, 1));
        assert_eq!(generation_of(127).unwrap(), (ArrayId::Bottom, 128));
        assert_eq!(generation_of(247).unwrap(), (ArrayId::Bottom, 248));
    }

    #[test]
    fn test_channel_out_of_range() {
        for ch in [-1, 248, 1000] {
            assert!(matches!(
                pmt_position(ch),
                Err(LayoutError::OutOfRange { .. })
            ));
        }
        assert!(channel_of(ArrayId::Top, 128).is_err());
        assert!(channel_of(ArrayId::Bottom, 127).is_err());
        assert!(nominal().position(248).is_err());
    }

    #[test]
    fn test_channel_info_groups() {
        let cfg = GeometryConfig::default();
        let info = channel_info(126, &cfg).unwrap();
        assert_eq!((info.array, info.group, info.within), (ArrayId::Top, 0, 1));
        let info = channel_info(0, &cfg).unwrap();
        assert_eq!((info.group, info.within), (6, 36));
        let info = channel_info(127, &cfg).unwrap();
        assert_eq!((info.array, info.group, info.within), (ArrayId::Bottom, 0, 1));
    }

    #[test]
    fn test_map_matches_free_function() {
        let map = nominal();
        for ch in 0..N_PMTS as i64 {
            assert_eq!(map.position(ch).unwrap(), pmt_position(ch).unwrap());
        }
    }

    #[test]
    fn test_channel_at_tube_centres() {
        let map = nominal();
        for c in map.channels() {
            assert_eq!(map.channel_at(c.array, c.position), Some(c.channel));
            assert_eq!(map.nearest(c.array, c.position), Some(c.channel));
        }
    }

    #[test]
    fn test_channel_at_misses_far_point() {
        let map = nominal();
        let far = Position::new(500.0, 500.0);
        assert_eq!(map.channel_at(ArrayId::Top, far), None);
        assert!(map.nearest(ArrayId::Top, far).is_some());
        // Just outside the centre tube face
        let edge = Position::new(PMT_OUTER_RING_RADIUS + 0.01, 0.0);
        let hit = map.channel_at(ArrayId::Top, edge);
        assert_ne!(hit, Some(126));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let cfg = GeometryConfig {
            pmt_distance_top: 0.0,
            ..Default::default()
        };
        assert!(matches!(PmtMap::build(cfg), Err(LayoutError::Config(_))));
    }
}
