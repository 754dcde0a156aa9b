//! Property tests for value generation.

use ids_common::{EventDefinition, EventKind, EventStatistics, SampleValue};
use ids_core::{sample, seeded_rng};
use proptest::prelude::*;

fn bounds() -> impl Strategy<Value = (f64, f64)> {
    (-1_000.0f64..1_000.0, 0.0f64..500.0).prop_map(|(lo, width)| (lo, lo + width))
}

proptest! {
    #[test]
    fn discrete_values_stay_within_integer_bounds(
        (lo, hi) in bounds(),
        mean in -2_000.0f64..2_000.0,
        std_dev in 0.0f64..300.0,
        seed in any::<u64>(),
    ) {
        let def = EventDefinition::new("A", EventKind::Discrete).with_bounds(Some(lo), Some(hi));
        let stat = EventStatistics::new(mean, std_dev);
        let mut rng = seeded_rng(Some(seed));
        for _ in 0..16 {
            match sample(&def, &stat, &mut rng) {
                SampleValue::Int(v) => {
                    prop_assert!(v >= lo as i64 && v <= hi as i64, "{} outside [{}, {}]", v, lo, hi);
                }
                other => prop_assert!(false, "discrete produced {:?}", other),
            }
        }
    }

    #[test]
    fn continuous_values_have_two_decimals_within_bounds(
        (lo, hi) in bounds(),
        mean in -2_000.0f64..2_000.0,
        std_dev in 0.0f64..300.0,
        seed in any::<u64>(),
    ) {
        // Bounds on the two-decimal grid so rounding cannot step outside them.
        let lo = (lo * 100.0).round() / 100.0;
        let hi = (hi * 100.0).round() / 100.0;
        let def = EventDefinition::new("B", EventKind::Continuous).with_bounds(Some(lo), Some(hi));
        let stat = EventStatistics::new(mean, std_dev);
        let mut rng = seeded_rng(Some(seed));
        for _ in 0..16 {
            match sample(&def, &stat, &mut rng) {
                SampleValue::Real(v) => {
                    prop_assert!(v >= lo && v <= hi, "{} outside [{}, {}]", v, lo, hi);
                    let scaled = v * 100.0;
                    prop_assert!((scaled - scaled.round()).abs() < 1e-6, "{} has more than two decimals", v);
                }
                other => prop_assert!(false, "continuous produced {:?}", other),
            }
        }
    }

    #[test]
    fn zero_variance_returns_the_mean(
        mean in 0i64..1_000,
        cents in 0i64..100,
        seed in any::<u64>(),
    ) {
        let discrete = EventDefinition::new("A", EventKind::Discrete);
        let continuous = EventDefinition::new("B", EventKind::Continuous);
        let real_mean = mean as f64 + cents as f64 / 100.0;
        let mut rng = seeded_rng(Some(seed));

        prop_assert_eq!(
            sample(&discrete, &EventStatistics::new(mean as f64, 0.0), &mut rng),
            SampleValue::Int(mean)
        );
        match sample(&continuous, &EventStatistics::new(real_mean, 0.0), &mut rng) {
            SampleValue::Real(v) => prop_assert!((v - real_mean).abs() < 1e-9),
            other => prop_assert!(false, "continuous produced {:?}", other),
        }
    }
}
