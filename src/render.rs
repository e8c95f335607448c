//! PNG map of both arrays, top on the left and bottom on the right.

use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

use crate::assembly::PmtMap;
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{ArrayId, Position};

const BACKGROUND: Rgb<u8> = Rgb([16, 16, 24]);
const AXIS: Rgb<u8> = Rgb([70, 70, 80]);
const TOP_FACE: Rgb<u8> = Rgb([80, 150, 230]);
const BOTTOM_FACE: Rgb<u8> = Rgb([235, 160, 60]);
/// First channel of each array.
const MARKER: Rgb<u8> = Rgb([230, 50, 50]);

/// Half-width of the area drawn in each panel [cm].
fn extent(map: &PmtMap) -> f64 {
    let r_max = map
        .channels()
        .iter()
        .map(|c| c.position.radius())
        .fold(0.0, f64::max);
    (r_max + map.config().pmt_outer_ring_radius) * 1.05
}

/// Render the layout into a `2 * size_px` by `size_px` image.
pub fn render_layout(map: &PmtMap, size_px: u32) -> LayoutResult<RgbImage> {
    if size_px < 16 {
        return Err(LayoutError::Render(format!(
            "image size {size_px} px too small"
        )));
    }
    let mut img = ImageBuffer::from_pixel(size_px * 2, size_px, BACKGROUND);
    let scale = size_px as f64 / (2.0 * extent(map));
    let radius_px = map.config().pmt_outer_ring_radius * scale;

    for (panel, &array) in ArrayId::ALL.iter().enumerate() {
        let cx = size_px as f64 * (panel as f64 + 0.5);
        let cy = size_px as f64 * 0.5;
        draw_axes(&mut img, panel as u32 * size_px, size_px);

        let face = match array {
            ArrayId::Top => TOP_FACE,
            ArrayId::Bottom => BOTTOM_FACE,
        };
        let mut channels = map.channels_in(array);
        if let Some(first) = channels.next() {
            fill_disc(&mut img, to_pixel(first.position, cx, cy, scale), radius_px, MARKER);
        }
        for info in channels {
            fill_disc(&mut img, to_pixel(info.position, cx, cy, scale), radius_px, face);
        }
    }
    log::debug!(
        "rendered {}x{} layout at {scale:.2} px/cm",
        img.width(),
        img.height()
    );
    Ok(img)
}

pub fn save_png(img: &RgbImage, path: &Path) -> LayoutResult<()> {
    img.save(path)
        .map_err(|e| LayoutError::Render(format!("Failed to save image: {e}")))
}

fn to_pixel(p: Position, cx: f64, cy: f64, scale: f64) -> (f64, f64) {
    (cx + p.x * scale, cy - p.y * scale)
}

fn draw_axes(img: &mut RgbImage, x0: u32, size: u32) {
    let mid = size / 2;
    for i in 0..size {
        img.put_pixel(x0 + i, mid, AXIS);
        img.put_pixel(x0 + mid, i, AXIS);
    }
}

fn fill_disc(img: &mut RgbImage, (px, py): (f64, f64), radius: f64, color: Rgb<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x_min = ((px - radius).floor() as i64).max(0);
    let x_max = ((px + radius).ceil() as i64).min(w - 1);
    let y_min = ((py - radius).floor() as i64).max(0);
    let y_max = ((py + radius).ceil() as i64).min(h - 1);
    let r2 = radius * radius;
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = x as f64 + 0.5 - px;
            let dy = y as f64 + 0.5 - py;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
