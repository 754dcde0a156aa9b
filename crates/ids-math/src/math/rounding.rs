//! Rounding and clamping with a single fixed tie-break policy.
//!
//! Every rounding step in the workspace goes through this module so that
//! generated values, persisted baselines and displayed scores agree on how
//! `x.5` boundaries resolve. Ties round half to even.

/// Round to the nearest integer, ties to even.
///
/// `2.5 -> 2`, `3.5 -> 4`, `-2.5 -> -2`. Non-finite input is returned as-is.
pub fn round_half_even(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    x.round_ties_even()
}

/// Round to `places` decimal places.
///
/// Rounds the exact binary value of `x`, so `0.065` (stored just above
/// 0.065) gives `0.07` while the exact tie `2.125` gives `2.12`. Scaling by
/// `10^places` first would round twice.
pub fn round_dp(x: f64, places: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    format!("{:.*}", places as usize, x).parse::<f64>().unwrap_or(x)
}

/// Round to two decimal places, the storage precision for continuous values
/// and baseline statistics.
pub fn round2(x: f64) -> f64 {
    round_dp(x, 2)
}

/// Clamp `x` to optional lower then upper bounds.
///
/// The lower bound is applied first, then the upper bound, so with inverted
/// bounds (`lo > hi`) the upper bound wins.
pub fn clamp_opt(x: f64, lo: Option<f64>, hi: Option<f64>) -> f64 {
    let mut v = x;
    if let Some(lo) = lo {
        v = v.max(lo);
    }
    if let Some(hi) = hi {
        v = v.min(hi);
    }
    v
}

/// True when `x` is finite and has no fractional part.
pub fn is_integral(x: f64) -> bool {
    x.is_finite() && x.fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_even_ties() {
        assert_eq!(round_half_even(0.5), 0.0);
        assert_eq!(round_half_even(1.5), 2.0);
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(-2.5), -2.0);
        assert_eq!(round_half_even(2.4999), 2.0);
        assert_eq!(round_half_even(2.5001), 3.0);
    }

    #[test]
    fn round_dp_two_places() {
        assert!((round2(3.14159) - 3.14).abs() < 1e-12);
        assert!((round2(-1.006) - -1.01).abs() < 1e-12);
        assert_eq!(round2(7.0), 7.0);
    }

    #[test]
    fn round2_uses_exact_binary_value() {
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(0.065), 0.07);
        assert_eq!(round2(1.115), 1.11);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(13.0 / 200.0), 0.07);
        // exact binary tie
        assert_eq!(round2(2.125), 2.12);
        assert_eq!(round2(-0.065), -0.07);
    }

    #[test]
    fn round_dp_non_finite_passthrough() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_dp(f64::MAX, 2), f64::MAX);
    }

    #[test]
    fn clamp_applies_lower_then_upper() {
        assert_eq!(clamp_opt(-3.0, Some(0.0), Some(10.0)), 0.0);
        assert_eq!(clamp_opt(12.0, Some(0.0), Some(10.0)), 10.0);
        assert_eq!(clamp_opt(4.0, None, None), 4.0);
        assert_eq!(clamp_opt(4.0, Some(5.0), None), 5.0);
        // Inverted bounds: upper bound applied last.
        assert_eq!(clamp_opt(7.0, Some(8.0), Some(6.0)), 6.0);
    }

    #[test]
    fn integral_detection() {
        assert!(is_integral(5.0));
        assert!(is_integral(-3.0));
        assert!(!is_integral(5.5));
        assert!(!is_integral(f64::NAN));
        assert!(!is_integral(f64::INFINITY));
    }
}
