use image::GrayImage;
use imageproc::contours::BorderType;

use crate::{error::Result, traits::ContourExtractor, types::Silhouette};

/// Hierarchy rank of a traced boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryRank {
    /// Outer boundary of a region.
    Outer,
    /// Boundary of a hole nested inside a region.
    Hole,
}

/// A traced silhouette tagged with its hierarchy rank, in discovery
/// order from the boundary-tracing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub silhouette: Silhouette,
    pub rank: BoundaryRank,
}

impl Boundary {
    pub fn into_silhouette(self) -> Silhouette {
        self.silhouette
    }
}

/// Boundary tracer over `imageproc::contours::find_contours`. Non-zero
/// pixels are foreground; callers binarize first (see
/// `ThresholdPreprocessor`). With `external_only` set, hole boundaries
/// are dropped and only outer boundaries are reported.
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourExtractor {
    pub external_only: bool,
}

impl ContourExtractor for ImageprocContourExtractor {
    fn extract(&self, image: &GrayImage) -> Result<Vec<Boundary>> {
        let contours = imageproc::contours::find_contours::<i32>(image);
        let (max_x, max_y) = (image.width() as i32 - 1, image.height() as i32 - 1);

        let mut boundaries = Vec::new();
        for contour in contours {
            // A boundary spanning the whole image is the frame itself
            // (all-saturated input), not an object silhouette.
            if spans_full_frame(&contour.points, max_x, max_y) {
                continue;
            }
            let rank = match contour.border_type {
                BorderType::Outer => BoundaryRank::Outer,
                BorderType::Hole => BoundaryRank::Hole,
            };
            if self.external_only && rank != BoundaryRank::Outer {
                continue;
            }
            let points: Vec<[f64; 2]> = contour
                .points
                .iter()
                .map(|p| [p.x as f64, p.y as f64])
                .collect();
            // Traces shorter than 3 distinct points cannot form a closed
            // polygon; they are not silhouettes, not a size filter.
            if let Ok(silhouette) = Silhouette::new(points) {
                boundaries.push(Boundary { silhouette, rank });
            }
        }
        Ok(boundaries)
    }
}

fn spans_full_frame(points: &[imageproc::point::Point<i32>], max_x: i32, max_y: i32) -> bool {
    if points.is_empty() {
        return false;
    }
    let mut min = (i32::MAX, i32::MAX);
    let mut max = (i32::MIN, i32::MIN);
    for p in points {
        min = (min.0.min(p.x), min.1.min(p.y));
        max = (max.0.max(p.x), max.1.max(p.y));
    }
    min == (0, 0) && max == (max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn filled_rect(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut img = GrayImage::new(width, height);
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        img
    }

    #[test]
    fn finds_square_boundary() {
        let img = filled_rect(64, 64, 20, 20, 40, 40);
        let boundaries = ImageprocContourExtractor::default().extract(&img).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].rank, BoundaryRank::Outer);
        assert!(boundaries[0].silhouette.len() >= 4);
    }

    #[test]
    fn all_zero_image_yields_empty_list() {
        let img = GrayImage::new(32, 32);
        let boundaries = ImageprocContourExtractor::default().extract(&img).unwrap();
        assert!(boundaries.is_empty());
    }

    #[test]
    fn all_saturated_image_yields_empty_list() {
        let img = GrayImage::from_pixel(32, 32, Luma([255u8]));
        let boundaries = ImageprocContourExtractor::default().extract(&img).unwrap();
        assert!(boundaries.is_empty());
    }

    #[test]
    fn external_only_drops_hole_boundaries() {
        // Ring: filled square with a hollow core.
        let mut img = filled_rect(64, 64, 10, 10, 50, 50);
        for y in 25..35 {
            for x in 25..35 {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }

        let all = ImageprocContourExtractor {
            external_only: false,
        }
        .extract(&img)
        .unwrap();
        assert!(all.iter().any(|b| b.rank == BoundaryRank::Hole));

        let outer_only = ImageprocContourExtractor {
            external_only: true,
        }
        .extract(&img)
        .unwrap();
        assert!(!outer_only.is_empty());
        assert!(outer_only.iter().all(|b| b.rank == BoundaryRank::Outer));
    }
}
