use crate::{
    algorithms::moments::{contour_moments, hu_invariants},
    traits::SilhouetteMatcher,
    types::Silhouette,
};

/// Hu terms with magnitude at or below this carry no usable signal and
/// are excluded from the log-signature comparison.
const HU_EPS: f64 = 1e-5;

/// Outcome of matching a reference against a candidate list: index of
/// the best candidate and its dissimilarity score (lower = more alike).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub index: usize,
    pub score: f64,
}

/// Matcher over weighted log-moment signatures: each silhouette is
/// reduced to its seven Hu invariants, and two silhouettes are compared
/// by `Σ |1/mᵃ − 1/mᵇ|` over the terms significant on both sides, where
/// `m = sign(h)·log₁₀|h|`. Invariant to translation, rotation and scale.
#[derive(Debug, Clone, Default)]
pub struct HuMomentMatcher;

impl HuMomentMatcher {
    /// Dissimilarity between two silhouettes; 0 for identical shapes.
    pub fn dissimilarity(&self, a: &Silhouette, b: &Silhouette) -> f64 {
        let ha = hu_invariants(&contour_moments(a.points()));
        let hb = hu_invariants(&contour_moments(b.points()));

        let mut score = 0.0;
        for (&va, &vb) in ha.iter().zip(hb.iter()) {
            if va.abs() > HU_EPS && vb.abs() > HU_EPS {
                let ma = va.signum() * va.abs().log10();
                let mb = vb.signum() * vb.abs().log10();
                score += (1.0 / ma - 1.0 / mb).abs();
            }
        }
        score
    }
}

impl SilhouetteMatcher for HuMomentMatcher {
    fn find_best_match(
        &self,
        reference: &Silhouette,
        candidates: &[Silhouette],
    ) -> Option<MatchResult> {
        let mut best: Option<MatchResult> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = self.dissimilarity(reference, candidate);
            // Strict comparison: the first candidate wins ties.
            if best.map_or(true, |b| score < b.score) {
                best = Some(MatchResult { index, score });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Silhouette {
        Silhouette::new(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]).unwrap()
    }

    fn shifted_square() -> Silhouette {
        Silhouette::new(vec![[50.0, 20.0], [70.0, 20.0], [70.0, 40.0], [50.0, 40.0]]).unwrap()
    }

    fn triangle() -> Silhouette {
        Silhouette::new(vec![[0.0, 0.0], [12.0, 0.0], [0.0, 12.0]]).unwrap()
    }

    fn long_rectangle() -> Silhouette {
        Silhouette::new(vec![[0.0, 0.0], [40.0, 0.0], [40.0, 5.0], [0.0, 5.0]]).unwrap()
    }

    #[test]
    fn empty_candidate_list_is_no_match() {
        assert_eq!(HuMomentMatcher.find_best_match(&square(), &[]), None);
    }

    #[test]
    fn identical_shape_scores_zero() {
        let score = HuMomentMatcher.dissimilarity(&square(), &square());
        assert!(score.abs() < 1e-12);
    }

    #[test]
    fn picks_the_same_shape_over_different_ones() {
        let candidates = vec![triangle(), long_rectangle(), shifted_square()];
        let result = HuMomentMatcher
            .find_best_match(&square(), &candidates)
            .unwrap();
        assert_eq!(result.index, 2);
        assert!(result.score < 1e-9);
        assert!(
            HuMomentMatcher.dissimilarity(&square(), &triangle()) > result.score,
            "different shapes must score strictly worse"
        );
    }

    #[test]
    fn always_returns_the_arg_min_even_when_scores_are_large() {
        let candidates = vec![long_rectangle()];
        let result = HuMomentMatcher
            .find_best_match(&square(), &candidates)
            .unwrap();
        assert_eq!(result.index, 0);
        assert!(result.score > 0.0);
    }

    #[test]
    fn ties_resolve_to_the_first_candidate() {
        // Identical candidates produce identical scores by construction.
        let candidates = vec![shifted_square(), shifted_square()];
        let result = HuMomentMatcher
            .find_best_match(&square(), &candidates)
            .unwrap();
        assert_eq!(result.index, 0);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let candidates = vec![triangle(), square(), long_rectangle()];
        let first = HuMomentMatcher
            .find_best_match(&square(), &candidates)
            .unwrap();
        for _ in 0..10 {
            let again = HuMomentMatcher
                .find_best_match(&square(), &candidates)
                .unwrap();
            assert_eq!(again.index, first.index);
            assert_eq!(again.score, first.score);
        }
    }

    #[test]
    fn score_ignores_rotation_and_scale() {
        let rotated: Vec<[f64; 2]> = square()
            .points()
            .iter()
            .map(|&[x, y]| {
                let (sin, cos) = 0.9f64.sin_cos();
                [3.0 * (x * cos - y * sin) + 80.0, 3.0 * (x * sin + y * cos) + 15.0]
            })
            .collect();
        let rotated = Silhouette::new(rotated).unwrap();
        let score = HuMomentMatcher.dissimilarity(&square(), &rotated);
        assert!(score < 1e-6, "score was {score}");
    }
}
