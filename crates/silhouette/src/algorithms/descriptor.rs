use std::f64::consts::PI;

use geo::MinimumRotatedRect;

use crate::types::{ShapeDescriptor, Silhouette};

/// Relative tolerance for treating the enclosing rectangle's sides as
/// equal; a square's orientation resolves to the smaller edge angle.
const SIDE_EPS: f64 = 1e-9;

/// Principal orientation of the silhouette in radians, normalized into
/// `[0, π)`. Orientation is axis-symmetric: a silhouette and its
/// 180°-rotated or point-reversed twin yield the same angle, since "up"
/// cannot be inferred from shape alone. Collinear input falls back to 0.
pub fn angle(silhouette: &Silhouette) -> f64 {
    match enclosing_rect_corners(silhouette) {
        Some(corners) => rect_angle(&corners),
        None => 0.0,
    }
}

/// Center of the minimum-area enclosing rectangle (mean of its corners).
/// Not the polygon's area centroid; matching uses centers for overlay
/// placement only, so rectangle-center consistency is what matters.
/// Collinear input falls back to the mean of the points.
pub fn center(silhouette: &Silhouette) -> (f64, f64) {
    match enclosing_rect_corners(silhouette) {
        Some(corners) => point_mean(&corners),
        None => point_mean(silhouette.points()),
    }
}

/// Full descriptor: rectangle center, orientation angle, point count.
pub fn describe(silhouette: &Silhouette) -> ShapeDescriptor {
    match enclosing_rect_corners(silhouette) {
        Some(corners) => ShapeDescriptor {
            centroid: point_mean(&corners),
            angle: rect_angle(&corners),
            length: silhouette.len(),
        },
        None => ShapeDescriptor {
            centroid: point_mean(silhouette.points()),
            angle: 0.0,
            length: silhouette.len(),
        },
    }
}

/// Corners of the minimum-area rotated rectangle, or `None` when the
/// points are degenerate (collinear).
fn enclosing_rect_corners(silhouette: &Silhouette) -> Option<[[f64; 2]; 4]> {
    let rect = silhouette.to_geo_polygon().minimum_rotated_rect()?;
    let ring: Vec<[f64; 2]> = rect
        .exterior()
        .coords()
        .map(|c| [c.x, c.y])
        .collect();
    // The exterior ring closes back on its first coordinate.
    if ring.len() < 5 {
        return None;
    }
    let corners = [ring[0], ring[1], ring[2], ring[3]];
    let side = |a: [f64; 2], b: [f64; 2]| ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
    // A zero-width rectangle means the input was collinear.
    if side(corners[0], corners[1]).min(side(corners[1], corners[2])) < 1e-12 {
        return None;
    }
    Some(corners)
}

fn rect_angle(corners: &[[f64; 2]; 4]) -> f64 {
    let e0 = [corners[1][0] - corners[0][0], corners[1][1] - corners[0][1]];
    let e1 = [corners[2][0] - corners[1][0], corners[2][1] - corners[1][1]];
    let len0 = (e0[0] * e0[0] + e0[1] * e0[1]).sqrt();
    let len1 = (e1[0] * e1[0] + e1[1] * e1[1]).sqrt();

    let a0 = edge_angle(e0);
    let a1 = edge_angle(e1);

    let longest = len0.max(len1).max(1.0);
    if (len0 - len1).abs() <= SIDE_EPS * longest {
        a0.min(a1)
    } else if len0 > len1 {
        a0
    } else {
        a1
    }
}

/// Angle of an edge direction folded into `[0, π)`.
fn edge_angle(edge: [f64; 2]) -> f64 {
    let mut a = edge[1].atan2(edge[0]);
    if a < 0.0 {
        a += PI;
    }
    if a >= PI {
        a -= PI;
    }
    a
}

fn point_mean(points: &[[f64; 2]]) -> (f64, f64) {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &[x, y]| (sx + x, sy + y));
    (sx / n, sy / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_aligned_square() -> Silhouette {
        Silhouette::new(vec![[10.0, 10.0], [30.0, 10.0], [30.0, 30.0], [10.0, 30.0]]).unwrap()
    }

    fn rotate(s: &Silhouette, radians: f64) -> Silhouette {
        let (sin, cos) = radians.sin_cos();
        let (cx, cy) = point_mean(s.points());
        let points = s
            .points()
            .iter()
            .map(|&[x, y]| {
                let (dx, dy) = (x - cx, y - cy);
                [cx + dx * cos - dy * sin, cy + dx * sin + dy * cos]
            })
            .collect();
        Silhouette::new(points).unwrap()
    }

    #[test]
    fn axis_aligned_square_has_zero_angle() {
        assert!(angle(&axis_aligned_square()).abs() < 1e-9);
    }

    #[test]
    fn angle_is_stable_under_point_reversal() {
        let square = axis_aligned_square();
        let reversed =
            Silhouette::new(square.points().iter().rev().copied().collect()).unwrap();
        assert!((angle(&square) - angle(&reversed)).abs() < 1e-9);
    }

    #[test]
    fn angle_is_stable_under_half_turn() {
        let rect =
            Silhouette::new(vec![[0.0, 0.0], [40.0, 0.0], [40.0, 10.0], [0.0, 10.0]]).unwrap();
        let tilted = rotate(&rect, 0.4);
        let half_turned = rotate(&tilted, PI);
        assert!((angle(&tilted) - angle(&half_turned)).abs() < 1e-6);
    }

    #[test]
    fn tilted_rectangle_reports_its_tilt() {
        let rect =
            Silhouette::new(vec![[0.0, 0.0], [40.0, 0.0], [40.0, 10.0], [0.0, 10.0]]).unwrap();
        let tilted = rotate(&rect, 0.3);
        assert!((angle(&tilted) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn center_is_rectangle_center() {
        let (cx, cy) = center(&axis_aligned_square());
        assert!((cx - 20.0).abs() < 1e-9);
        assert!((cy - 20.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_points_fall_back_without_failing() {
        let line = Silhouette::new(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]).unwrap();
        assert_eq!(angle(&line), 0.0);
        let (cx, cy) = center(&line);
        assert!((cx - 1.0).abs() < 1e-9);
        assert!((cy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn describe_reports_point_count() {
        let d = describe(&axis_aligned_square());
        assert_eq!(d.length, 4);
        assert!(d.angle.abs() < 1e-9);
    }
}
