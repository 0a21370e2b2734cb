//! Five-tier rating buckets from an error-shrunk z-score.

use super::stats::inverse_normal_cdf;
use serde::Serialize;

/// Ordinal rating tier. Scores are a sparse scale (0, 1, 2, 4, 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(into = "u8")]
pub enum Bucket {
    #[default]
    Zero,
    One,
    Two,
    Four,
    Eight,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Zero,
        Bucket::One,
        Bucket::Two,
        Bucket::Four,
        Bucket::Eight,
    ];

    pub fn score(self) -> u8 {
        match self {
            Bucket::Zero => 0,
            Bucket::One => 1,
            Bucket::Two => 2,
            Bucket::Four => 4,
            Bucket::Eight => 8,
        }
    }

    pub fn points(self) -> f64 {
        f64::from(self.score())
    }
}

impl From<Bucket> for u8 {
    fn from(bucket: Bucket) -> u8 {
        bucket.score()
    }
}

/// Ratio between the population shares of neighbouring tiers.
const TIER_RATIO: f64 = 5.0 / 3.0;

/// Z-score cut points between the five tiers, lowest first.
///
/// Tier shares are proportional to `ratio^4, ratio^3, .., ratio^0`, so each
/// tier is rarer than the one below it.
pub fn tier_thresholds() -> [f64; 4] {
    let weights: Vec<f64> = (0..5).rev().map(|k| TIER_RATIO.powi(k)).collect();
    let total: f64 = weights.iter().sum();

    let mut thresholds = [0.0; 4];
    let mut cumulative = 0.0;
    for (threshold, weight) in thresholds.iter_mut().zip(&weights) {
        cumulative += weight / total;
        *threshold = inverse_normal_cdf(cumulative);
    }
    thresholds
}

#[derive(Debug, Clone)]
pub struct RatingClassifier {
    mean: f64,
    between_variance: f64,
    thresholds: [f64; 4],
}

impl RatingClassifier {
    /// Fits population statistics over `(value, sampling_error)` samples.
    ///
    /// The between-item variance is the raw variance minus the mean squared
    /// sampling error, floored at zero.
    pub fn fit(samples: &[(f64, f64)]) -> Self {
        let thresholds = tier_thresholds();
        if samples.is_empty() {
            return RatingClassifier {
                mean: 0.0,
                between_variance: 0.0,
                thresholds,
            };
        }

        let n = samples.len() as f64;
        let mean = samples.iter().map(|&(value, _)| value).sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|&(value, _)| (value - mean).powi(2))
            .sum::<f64>()
            / n;
        let noise = samples.iter().map(|&(_, error)| error * error).sum::<f64>() / n;

        RatingClassifier {
            mean,
            between_variance: (variance - noise).max(0.0),
            thresholds,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn between_variance(&self) -> f64 {
        self.between_variance
    }

    pub fn thresholds(&self) -> [f64; 4] {
        self.thresholds
    }

    /// `None` when the population shows no spread beyond sampling noise.
    pub fn z_score(&self, value: f64, error: f64) -> Option<f64> {
        if self.between_variance <= 0.0 {
            return None;
        }
        Some((value - self.mean) / (self.between_variance + error * error).sqrt())
    }

    pub fn bucket_for_z(&self, z: f64) -> Bucket {
        let [z1, z2, z3, z4] = self.thresholds;
        if z < z1 {
            Bucket::Zero
        } else if z < z2 {
            Bucket::One
        } else if z < z3 {
            Bucket::Two
        } else if z < z4 {
            Bucket::Four
        } else {
            Bucket::Eight
        }
    }

    pub fn classify(&self, value: f64, error: f64) -> Bucket {
        match self.z_score(value, error) {
            Some(z) => self.bucket_for_z(z),
            None => Bucket::Zero,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::sampling_error;
    use proptest::prelude::*;

    #[test]
    fn bucket_scores_are_sparse() {
        let scores: Vec<u8> = Bucket::ALL.iter().map(|b| b.score()).collect();
        assert_eq!(scores, vec![0, 1, 2, 4, 8]);
        assert_eq!(serde_json::to_string(&Bucket::Four).unwrap(), "4");
    }

    #[test]
    fn thresholds_follow_geometric_shares() {
        let expected = [0.43373, 0.69396, 0.85010, 0.94379].map(inverse_normal_cdf);
        for (got, want) in tier_thresholds().iter().zip(expected) {
            assert!((got - want).abs() < 1e-3, "{} vs {}", got, want);
        }
        let t = tier_thresholds();
        assert!(t[0] < t[1] && t[1] < t[2] && t[2] < t[3]);
    }

    #[test]
    fn no_true_spread_means_bucket_zero() {
        // Spread entirely explained by sampling error
        let samples = vec![(0.45, 0.1), (0.55, 0.1), (0.5, 0.1)];
        let classifier = RatingClassifier::fit(&samples);
        assert_eq!(classifier.between_variance(), 0.0);
        assert_eq!(classifier.classify(0.9, 0.0), Bucket::Zero);
        assert!(classifier.z_score(0.9, 0.0).is_none());
    }

    #[test]
    fn empty_population_is_all_zero() {
        let classifier = RatingClassifier::fit(&[]);
        assert_eq!(classifier.classify(0.7, 0.01), Bucket::Zero);
    }

    #[test]
    fn low_sample_items_are_pulled_toward_the_mean() {
        let mut samples: Vec<(f64, f64)> = (0..50)
            .map(|i| (0.44 + 0.12 * i as f64 / 49.0, 0.01))
            .collect();
        let small = (0.56, sampling_error(6, 4));
        let large = (0.56, sampling_error(560, 440));
        samples.push(small);
        samples.push(large);

        let classifier = RatingClassifier::fit(&samples);
        let z_small = classifier.z_score(small.0, small.1).unwrap();
        let z_large = classifier.z_score(large.0, large.1).unwrap();

        assert!(z_small.abs() < z_large.abs());
        assert!(classifier.classify(small.0, small.1) <= classifier.classify(large.0, large.1));
        assert_eq!(classifier.classify(large.0, large.1), Bucket::Eight);
    }

    #[test]
    fn spread_population_uses_every_tier() {
        let samples: Vec<(f64, f64)> = (0..200).map(|i| (i as f64 / 200.0, 0.0)).collect();
        let classifier = RatingClassifier::fit(&samples);
        let mut seen: Vec<Bucket> = samples
            .iter()
            .map(|&(v, e)| classifier.classify(v, e))
            .collect();
        seen.dedup();
        assert_eq!(seen, Bucket::ALL.to_vec());
    }

    proptest! {
        #[test]
        fn buckets_are_monotone_in_z(a in -5.0..5.0f64, b in -5.0..5.0f64) {
            let classifier = RatingClassifier::fit(&[(0.0, 0.0), (1.0, 0.0)]);
            if a < b {
                prop_assert!(classifier.bucket_for_z(a) <= classifier.bucket_for_z(b));
            }
        }
    }
}
