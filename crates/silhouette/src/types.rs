use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Closed boundary polygon of a detected region, stored as an ordered
/// perimeter walk. Construction guarantees at least 3 points with no
/// consecutive duplicates; order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Silhouette {
    points: Vec<[f64; 2]>,
}

impl Silhouette {
    /// Build a silhouette from a perimeter walk. Consecutive duplicate
    /// points are collapsed (including a trailing repeat of the first
    /// point); fewer than 3 points remaining is a degenerate boundary.
    pub fn new(points: Vec<[f64; 2]>) -> Result<Self> {
        let mut walk: Vec<[f64; 2]> = Vec::with_capacity(points.len());
        for p in points {
            if walk.last() != Some(&p) {
                walk.push(p);
            }
        }
        if walk.len() > 1 && walk.first() == walk.last() {
            walk.pop();
        }
        if walk.len() < 3 {
            return Err(Error::DegenerateSilhouette(walk.len()));
        }
        Ok(Self { points: walk })
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Number of boundary points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        false // invariant: at least 3 points
    }

    /// Convert to a geo-types polygon; the exterior ring is closed by the
    /// polygon constructor.
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect();
        Polygon::new(LineString::new(coords), vec![])
    }
}

impl TryFrom<Vec<[f64; 2]>> for Silhouette {
    type Error = Error;

    fn try_from(points: Vec<[f64; 2]>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Silhouette> for Vec<[f64; 2]> {
    fn from(silhouette: Silhouette) -> Self {
        silhouette.points
    }
}

/// Rotation/translation-stable summary of a silhouette. Derived from the
/// point sequence on demand, never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    /// Centroid of the minimum-area enclosing rectangle.
    pub centroid: (f64, f64),
    /// Orientation in radians, normalized to `[0, π)`.
    pub angle: f64,
    /// Boundary point count.
    pub length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_consecutive_duplicates() {
        let s = Silhouette::new(vec![
            [0.0, 0.0],
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [4.0, 4.0],
        ])
        .unwrap();
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn drops_closing_repeat_of_first_point() {
        let s = Silhouette::new(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]]).unwrap();
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn rejects_fewer_than_three_distinct_points() {
        let err = Silhouette::new(vec![[1.0, 1.0], [1.0, 1.0], [2.0, 2.0]]).unwrap_err();
        assert!(matches!(err, Error::DegenerateSilhouette(2)));
    }

    #[test]
    fn serde_round_trips_as_point_array() {
        let s = Silhouette::new(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[[0.0,0.0],[4.0,0.0],[4.0,4.0],[0.0,4.0]]");
        let back: Silhouette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn serde_rejects_degenerate_input() {
        let result: std::result::Result<Silhouette, _> = serde_json::from_str("[[0.0,0.0]]");
        assert!(result.is_err());
    }
}
