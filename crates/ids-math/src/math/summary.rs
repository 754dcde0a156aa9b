//! Sample summaries: arithmetic mean and Bessel-corrected standard deviation.

use serde::{Deserialize, Serialize};

/// Mean and spread of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Number of observations.
    pub n: usize,
    /// Arithmetic mean (0.0 for an empty sample).
    pub mean: f64,
    /// Sample standard deviation (0.0 when `n < 2`).
    pub std_dev: f64,
}

impl SampleSummary {
    /// Summary of an empty sample.
    pub const EMPTY: SampleSummary = SampleSummary {
        n: 0,
        mean: 0.0,
        std_dev: 0.0,
    };

    /// Summarize a sample. Never divides by zero.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::EMPTY;
        }
        let mean = mean(values);
        Self {
            n: values.len(),
            mean,
            std_dev: sample_std_dev_about(values, mean),
        }
    }
}

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with Bessel's correction (`n - 1` denominator).
///
/// Returns 0.0 when fewer than two values are present.
pub fn sample_variance(values: &[f64]) -> f64 {
    sample_variance_about(values, mean(values))
}

/// Sample standard deviation with Bessel's correction.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

fn sample_variance_about(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    ss / (n - 1) as f64
}

fn sample_std_dev_about(values: &[f64], mean: f64) -> f64 {
    sample_variance_about(values, mean).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn empty_sample_is_degenerate() {
        let s = SampleSummary::from_values(&[]);
        assert_eq!(s, SampleSummary::EMPTY);
    }

    #[test]
    fn single_value_has_zero_spread() {
        let s = SampleSummary::from_values(&[42.0]);
        assert_eq!(s.n, 1);
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.std_dev, 0.0);
    }

    #[test]
    fn bessel_correction_applied() {
        // Population sd of [2,4,4,4,5,5,7,9] is 2.0; sample sd is sqrt(32/7).
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx_eq(mean(&v), 5.0, 1e-12));
        assert!(approx_eq(sample_variance(&v), 32.0 / 7.0, 1e-12));
        assert!(approx_eq(sample_std_dev(&v), (32.0f64 / 7.0).sqrt(), 1e-12));
    }

    #[test]
    fn two_values() {
        let s = SampleSummary::from_values(&[1.0, 3.0]);
        assert!(approx_eq(s.mean, 2.0, 1e-12));
        assert!(approx_eq(s.std_dev, 2.0f64.sqrt(), 1e-12));
    }
}
