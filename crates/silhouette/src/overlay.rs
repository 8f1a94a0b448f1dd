//! Debug overlay rendering: contours and center markers drawn onto the
//! intensity frame for the display sink. Purely informational.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_line_segment_mut};

use crate::{error::Result, traits::OverlaySink, types::Silhouette};

pub fn to_canvas(image: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(image.clone()).to_rgb8()
}

/// Draw the silhouette's perimeter walk, closing the final edge.
pub fn draw_silhouette(canvas: &mut RgbImage, silhouette: &Silhouette, color: [u8; 3]) {
    let points = silhouette.points();
    let rgb = Rgb(color);
    for i in 0..points.len() {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % points.len()];
        draw_line_segment_mut(canvas, (x0 as f32, y0 as f32), (x1 as f32, y1 as f32), rgb);
    }
}

pub fn draw_center(canvas: &mut RgbImage, center: (f64, f64), color: [u8; 3]) {
    draw_cross_mut(canvas, Rgb(color), center.0 as i32, center.1 as i32);
}

/// Sink that drops every frame; used where no display is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardOverlay;

impl OverlaySink for DiscardOverlay {
    fn present(&mut self, _frame: &RgbImage) -> Result<()> {
        Ok(())
    }
}
