//! Polygon moments and Hu invariants.
//!
//! Spatial moments are integrated over the region enclosed by the
//! contour using Green's theorem, so the result depends on the boundary
//! geometry rather than on how densely the boundary happens to be
//! sampled. The seven Hu invariants derived from the normalized central
//! moments are invariant to translation, scale and rotation, which is
//! what makes them usable as a silhouette signature under camera noise.

/// Region too thin to integrate; moments collapse to zero below this.
const AREA_EPS: f64 = 1e-12;

/// Spatial, central and normalized central moments of a closed contour.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContourMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,

    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
    pub mu30: f64,
    pub mu21: f64,
    pub mu12: f64,
    pub mu03: f64,

    pub nu20: f64,
    pub nu11: f64,
    pub nu02: f64,
    pub nu30: f64,
    pub nu21: f64,
    pub nu12: f64,
    pub nu03: f64,
}

/// Integrate the moments of the region enclosed by `points`, treated as
/// a closed polygon (the edge from last back to first is implicit).
/// Clockwise and counter-clockwise walks yield identical results.
pub fn contour_moments(points: &[[f64; 2]]) -> ContourMoments {
    let n = points.len();
    if n < 3 {
        return ContourMoments::default();
    }

    let (mut a00, mut a10, mut a01) = (0.0f64, 0.0f64, 0.0f64);
    let (mut a20, mut a11, mut a02) = (0.0f64, 0.0f64, 0.0f64);
    let (mut a30, mut a21, mut a12, mut a03) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);

    let mut prev = points[n - 1];
    for &cur in points {
        let [xi, yi] = prev;
        let [xi1, yi1] = cur;
        let dxy = xi * yi1 - xi1 * yi;

        let xi2 = xi * xi;
        let yi2 = yi * yi;
        let xi1_2 = xi1 * xi1;
        let yi1_2 = yi1 * yi1;

        a00 += dxy;
        a10 += dxy * (xi + xi1);
        a01 += dxy * (yi + yi1);
        a20 += dxy * (xi2 + xi * xi1 + xi1_2);
        a11 += dxy * (xi * (2.0 * yi + yi1) + xi1 * (yi + 2.0 * yi1));
        a02 += dxy * (yi2 + yi * yi1 + yi1_2);
        a30 += dxy * (xi + xi1) * (xi2 + xi1_2);
        a21 += dxy
            * (xi2 * (3.0 * yi + yi1)
                + 2.0 * xi * xi1 * (yi + yi1)
                + xi1_2 * (yi + 3.0 * yi1));
        a12 += dxy
            * (yi2 * (3.0 * xi + xi1)
                + 2.0 * yi * yi1 * (xi + xi1)
                + yi1_2 * (xi + 3.0 * xi1));
        a03 += dxy * (yi + yi1) * (yi2 + yi1_2);

        prev = cur;
    }

    // Normalize walk orientation so both directions agree.
    let sign = if a00 < 0.0 { -1.0 } else { 1.0 };

    let mut m = ContourMoments {
        m00: sign * a00 / 2.0,
        m10: sign * a10 / 6.0,
        m01: sign * a01 / 6.0,
        m20: sign * a20 / 12.0,
        m11: sign * a11 / 24.0,
        m02: sign * a02 / 12.0,
        m30: sign * a30 / 20.0,
        m21: sign * a21 / 60.0,
        m12: sign * a12 / 60.0,
        m03: sign * a03 / 20.0,
        ..ContourMoments::default()
    };

    if m.m00.abs() < AREA_EPS {
        return ContourMoments::default();
    }

    let cx = m.m10 / m.m00;
    let cy = m.m01 / m.m00;

    m.mu20 = m.m20 - cx * m.m10;
    m.mu11 = m.m11 - cx * m.m01;
    m.mu02 = m.m02 - cy * m.m01;
    m.mu30 = m.m30 - 3.0 * cx * m.m20 + 2.0 * cx * cx * m.m10;
    m.mu21 = m.m21 - 2.0 * cx * m.m11 - cy * m.m20 + 2.0 * cx * cx * m.m01;
    m.mu12 = m.m12 - 2.0 * cy * m.m11 - cx * m.m02 + 2.0 * cy * cy * m.m10;
    m.mu03 = m.m03 - 3.0 * cy * m.m02 + 2.0 * cy * cy * m.m01;

    let s2 = m.m00 * m.m00;
    let s3 = s2 * m.m00.sqrt();
    m.nu20 = m.mu20 / s2;
    m.nu11 = m.mu11 / s2;
    m.nu02 = m.mu02 / s2;
    m.nu30 = m.mu30 / s3;
    m.nu21 = m.mu21 / s3;
    m.nu12 = m.mu12 / s3;
    m.nu03 = m.mu03 / s3;

    m
}

/// The seven Hu invariants of a contour's normalized central moments.
pub fn hu_invariants(m: &ContourMoments) -> [f64; 7] {
    let t0 = m.nu30 + m.nu12;
    let t1 = m.nu21 + m.nu03;
    let q0 = t0 * t0;
    let q1 = t1 * t1;
    let n4 = 4.0 * m.nu11;
    let s = m.nu20 + m.nu02;
    let d = m.nu20 - m.nu02;

    let h0 = s;
    let h1 = d * d + n4 * m.nu11;
    let h3 = q0 + q1;
    let h5 = d * (q0 - q1) + n4 * t0 * t1;

    let t2 = m.nu30 - 3.0 * m.nu12;
    let t3 = 3.0 * m.nu21 - m.nu03;
    let h2 = t2 * t2 + t3 * t3;
    let h4 = t2 * t0 * (q0 - 3.0 * q1) + t3 * t1 * (3.0 * q0 - q1);
    let h6 = t3 * t0 * (q0 - 3.0 * q1) - t2 * t1 * (3.0 * q0 - q1);

    [h0, h1, h2, h3, h4, h5, h6]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    #[test]
    fn unit_square_spatial_moments() {
        let m = contour_moments(&unit_square());
        assert!((m.m00 - 1.0).abs() < 1e-12);
        assert!((m.m10 - 0.5).abs() < 1e-12);
        assert!((m.m01 - 0.5).abs() < 1e-12);
        assert!((m.m20 - 1.0 / 3.0).abs() < 1e-12);
        assert!((m.m11 - 0.25).abs() < 1e-12);
        assert!((m.m30 - 0.25).abs() < 1e-12);
        assert!((m.m21 - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn walk_orientation_does_not_matter() {
        let mut reversed = unit_square();
        reversed.reverse();
        let a = contour_moments(&unit_square());
        let b = contour_moments(&reversed);
        assert!((a.m00 - b.m00).abs() < 1e-12);
        assert!((a.nu20 - b.nu20).abs() < 1e-12);
        assert!((a.mu11 - b.mu11).abs() < 1e-12);
    }

    #[test]
    fn hu_invariants_are_scale_and_translation_invariant() {
        let small = unit_square();
        let moved_scaled: Vec<[f64; 2]> = small
            .iter()
            .map(|&[x, y]| [x * 7.0 + 30.0, y * 7.0 + 11.0])
            .collect();

        let ha = hu_invariants(&contour_moments(&small));
        let hb = hu_invariants(&contour_moments(&moved_scaled));
        for (a, b) in ha.iter().zip(hb.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn hu_invariants_are_rotation_invariant() {
        let square = unit_square();
        let angle = 0.61f64;
        let (sin, cos) = angle.sin_cos();
        let rotated: Vec<[f64; 2]> = square
            .iter()
            .map(|&[x, y]| [x * cos - y * sin, x * sin + y * cos])
            .collect();

        let ha = hu_invariants(&contour_moments(&square));
        let hb = hu_invariants(&contour_moments(&rotated));
        for (a, b) in ha.iter().zip(hb.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn degenerate_contour_yields_zero_moments() {
        let collinear = vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        let m = contour_moments(&collinear);
        assert_eq!(m.m00, 0.0);
        assert_eq!(m.nu20, 0.0);
    }
}
