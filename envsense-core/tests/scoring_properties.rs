//! Property tests for the air quality scorer and burn-in baseline

use envsense_core::{
    burn_in::BurnInAggregator,
    scoring::{air_quality_index, gas_score, humidity_score, ScoringConfig},
};
use proptest::prelude::*;

fn config_strategy() -> impl Strategy<Value = ScoringConfig> {
    (1.0f64..99.0, 0.0f64..=100.0).prop_map(|(baseline, weighting)| ScoringConfig::new(baseline, weighting))
}

proptest! {
    /// Within the physical humidity range, the index stays on the 0-500 scale
    #[test]
    fn index_stays_on_scale(
        config in config_strategy(),
        humidity in 0.0f64..=100.0,
        gas in 1.0f64..1_000_000.0,
        baseline in 1.0f64..1_000_000.0,
    ) {
        let aqi = air_quality_index(humidity, gas, Some(baseline), &config).unwrap();
        prop_assert!((0..=500).contains(&aqi), "aqi {} out of range", aqi);
    }

    /// Humidity never contributes more than its weighting
    #[test]
    fn humidity_score_peaks_at_baseline(
        config in config_strategy(),
        humidity in 0.0f64..=100.0,
    ) {
        let peak = humidity_score(config.humidity_baseline_percent, &config);
        prop_assert!((peak - config.humidity_weighting_percent).abs() < 1e-9);
        prop_assert!(humidity_score(humidity, &config) <= peak + 1e-9);
    }

    /// Lower resistance (more VOCs) never improves the gas score
    #[test]
    fn gas_score_is_monotonic(
        config in config_strategy(),
        baseline in 1.0f64..1_000_000.0,
        a in 0.0f64..2_000_000.0,
        b in 0.0f64..2_000_000.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(gas_score(low, baseline, &config) <= gas_score(high, baseline, &config) + 1e-9);
    }

    /// Baseline is the mean of at most the last 50 samples
    #[test]
    fn baseline_is_trailing_mean(samples in prop::collection::vec(1.0f64..1_000_000.0, 1..200)) {
        let mut aggregator = BurnInAggregator::new();
        for &sample in &samples {
            aggregator.record_sample(sample);
        }

        let tail = &samples[samples.len().saturating_sub(50)..];
        let expected = tail.iter().sum::<f64>() / tail.len() as f64;
        let baseline = aggregator.compute_baseline().unwrap();
        prop_assert!((baseline - expected).abs() <= expected * 1e-12);
    }
}
