//! Small numeric helpers shared by the rating stages.

/// Keeps a probability away from 0 and 1 so its log-odds stay finite.
const PROBABILITY_EPSILON: f64 = 1e-6;

/// Standard error of a binomial proportion; 0 when there are no games.
pub fn sampling_error(wins: u64, losses: u64) -> f64 {
    let games = wins.saturating_add(losses);
    if games == 0 {
        return 0.0;
    }
    let n = games as f64;
    let p = wins as f64 / n;
    (p * (1.0 - p) / n).sqrt()
}

pub fn logit(p: f64) -> f64 {
    let p = p.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
    (p / (1.0 - p)).ln()
}

/// Expected win-rate of a pair, averaging the two solo win-rates in log-odds space.
pub fn normalized_winrate(a: f64, b: f64) -> f64 {
    let combined = 0.5 * (logit(a) + logit(b));
    1.0 / (1.0 + (-combined).exp())
}

/// Truncates (not rounds) to two decimals.
pub fn floor2(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

/// Inverse of the standard normal CDF (Acklam's rational approximation,
/// relative error below 1.2e-9 over (0, 1)).
pub fn inverse_normal_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn error_of_empty_sample_is_zero() {
        assert_eq!(sampling_error(0, 0), 0.0);
    }

    #[test]
    fn error_matches_binomial_formula() {
        // p = 0.6, n = 100
        let expected = (0.6_f64 * 0.4 / 100.0).sqrt();
        assert!((sampling_error(60, 40) - expected).abs() < 1e-12);
        assert_eq!(sampling_error(10, 0), 0.0);
    }

    #[test]
    fn error_of_huge_counts_stays_finite() {
        let error = sampling_error(u64::MAX - 1, 10);
        assert!(error.is_finite());
        assert!(error >= 0.0);
    }

    #[test]
    fn symmetric_offsets_average_to_even() {
        assert!((normalized_winrate(0.6, 0.4) - 0.5).abs() < 1e-12);
        assert!((normalized_winrate(0.7, 0.7) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn extreme_winrates_stay_finite() {
        let value = normalized_winrate(1.0, 0.0);
        assert!(value.is_finite());
        assert!((value - 0.5).abs() < 1e-9);
        assert!(normalized_winrate(1.0, 0.5) < 1.0);
    }

    #[test]
    fn floor2_truncates() {
        assert_eq!(floor2(3.456), 3.45);
        assert_eq!(floor2(3.0), 3.0);
        assert_eq!(floor2(-0.001), -0.01);
    }

    #[test]
    fn inverse_cdf_known_quantiles() {
        assert!(inverse_normal_cdf(0.5).abs() < 1e-9);
        assert!((inverse_normal_cdf(0.975) - 1.959963985).abs() < 1e-6);
        assert!((inverse_normal_cdf(0.025) + 1.959963985).abs() < 1e-6);
        assert!((inverse_normal_cdf(0.9) - 1.281551566).abs() < 1e-6);
        assert!((inverse_normal_cdf(0.01) + 2.326347874).abs() < 1e-6);
        assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
    }

    proptest! {
        #[test]
        fn normalized_winrate_is_symmetric(a in 0.001..0.999f64, b in 0.001..0.999f64) {
            let ab = normalized_winrate(a, b);
            let ba = normalized_winrate(b, a);
            prop_assert!((ab - ba).abs() < 1e-12);
            prop_assert!(ab > 0.0 && ab < 1.0);
        }

        #[test]
        fn error_is_non_negative(wins in 0u64..10_000, losses in 0u64..10_000) {
            prop_assert!(sampling_error(wins, losses) >= 0.0);
        }

        #[test]
        fn error_peaks_at_even_split(half in 1u64..5_000, shift in 0u64..5_000) {
            let n = half * 2;
            let wins = half + shift.min(half);
            prop_assert!(sampling_error(half, half) >= sampling_error(wins, n - wins));
        }

        #[test]
        fn inverse_cdf_is_increasing(a in 0.001..0.999f64, b in 0.001..0.999f64) {
            if b - a > 1e-6 {
                prop_assert!(inverse_normal_cdf(a) < inverse_normal_cdf(b));
            }
        }
    }
}
