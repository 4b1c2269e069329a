//! Air Quality Index from Humidity and Gas Resistance
//!
//! ## Overview
//!
//! The index combines two sub-scores into a 0-100 quality score and maps it
//! onto the conventional 0-500 AQI scale, where **higher means worse air**.
//!
//! ### Humidity Sub-Score
//!
//! Humidity is scored by its distance from an ideal baseline (40 %RH by
//! default). The maximum contribution is `humidity_weighting_percent`.
//!
//! ```text
//! offset = humidity - hum_baseline
//! offset > 0:  hum_score = (100 - hum_baseline - offset) / (100 - hum_baseline) * weighting
//! offset ≤ 0:  hum_score = (hum_baseline + offset) / hum_baseline * weighting
//! ```
//!
//! ### Gas Sub-Score
//!
//! VOCs lower the resistance of the heated plate. A reading below the
//! burn-in baseline scales the gas share down proportionally; a reading at or
//! above the baseline earns the full share.
//!
//! ```text
//! baseline - gas > 0:  gas_score = gas / baseline * (100 - weighting)
//! otherwise:           gas_score = 100 - weighting
//! ```
//!
//! ### Index
//!
//! ```text
//! aqi = round(500 - 5 * (hum_score + gas_score))
//! ```
//!
//! Intermediate scores are kept at full precision; rounding happens only on
//! the final index.
//!
//! ## Example
//!
//! ```rust
//! use envsense_core::scoring::{air_quality_index, ScoringConfig};
//!
//! let config = ScoringConfig::default(); // 40 %RH baseline, 25 % weighting
//!
//! // Ideal humidity and clean air
//! assert_eq!(air_quality_index(40.0, 1100.0, Some(1100.0), &config), Ok(0));
//!
//! // No baseline yet: the index is undefined
//! assert!(air_quality_index(40.0, 1100.0, None, &config).is_err());
//! ```

use crate::constants::{
    AQI_POINTS_PER_SCORE, AQI_SCALE_MAX, DEFAULT_HUM_BASELINE_PCT, DEFAULT_HUM_WEIGHTING_PCT,
};
use crate::errors::{ScoreError, ScoreResult};

/// Upper bound of the quality score
const FULL_SCORE: f64 = 100.0;

/// Humidity reference and weighting for the quality score
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringConfig {
    /// Humidity considered ideal (%RH)
    pub humidity_baseline_percent: f64,
    /// Share of the score contributed by humidity (%)
    pub humidity_weighting_percent: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            humidity_baseline_percent: DEFAULT_HUM_BASELINE_PCT,
            humidity_weighting_percent: DEFAULT_HUM_WEIGHTING_PCT,
        }
    }
}

impl ScoringConfig {
    /// Create a scoring configuration
    pub const fn new(humidity_baseline_percent: f64, humidity_weighting_percent: f64) -> Self {
        Self {
            humidity_baseline_percent,
            humidity_weighting_percent,
        }
    }

    /// Check that both formulas stay finite
    pub fn validate(&self) -> ScoreResult<()> {
        let baseline = self.humidity_baseline_percent;
        if !(baseline > 0.0 && baseline < FULL_SCORE) {
            return Err(ScoreError::InvalidConfig {
                reason: "humidity baseline must lie in (0, 100)",
            });
        }

        let weighting = self.humidity_weighting_percent;
        if !(0.0..=FULL_SCORE).contains(&weighting) {
            return Err(ScoreError::InvalidConfig {
                reason: "humidity weighting must lie in [0, 100]",
            });
        }

        Ok(())
    }

    /// Share of the score contributed by gas resistance
    pub fn gas_weighting_percent(&self) -> f64 {
        FULL_SCORE - self.humidity_weighting_percent
    }
}

/// Humidity contribution to the quality score
pub fn humidity_score(humidity_percent: f64, config: &ScoringConfig) -> f64 {
    let baseline = config.humidity_baseline_percent;
    let weighting = config.humidity_weighting_percent;
    let offset = humidity_percent - baseline;

    if offset > 0.0 {
        (FULL_SCORE - baseline - offset) / (FULL_SCORE - baseline) * weighting
    } else {
        (baseline + offset) / baseline * weighting
    }
}

/// Gas contribution to the quality score
pub fn gas_score(gas_resistance_ohm: f64, baseline_ohm: f64, config: &ScoringConfig) -> f64 {
    let offset = baseline_ohm - gas_resistance_ohm;

    if offset > 0.0 {
        (gas_resistance_ohm / baseline_ohm) * config.gas_weighting_percent()
    } else {
        config.gas_weighting_percent()
    }
}

/// Combined quality score, 100 being the best air
pub fn air_quality_score(
    humidity_percent: f64,
    gas_resistance_ohm: f64,
    baseline_ohm: f64,
    config: &ScoringConfig,
) -> f64 {
    humidity_score(humidity_percent, config) + gas_score(gas_resistance_ohm, baseline_ohm, config)
}

/// Map a quality score onto the index scale
pub fn index_from_score(score: f64) -> i32 {
    libm::round(AQI_SCALE_MAX - AQI_POINTS_PER_SCORE * score) as i32
}

/// Compute the air quality index for one reading
///
/// Fails when no baseline exists yet, when the baseline is not a positive
/// resistance, or when the configuration would divide by zero.
pub fn air_quality_index(
    humidity_percent: f64,
    gas_resistance_ohm: f64,
    baseline_ohm: Option<f64>,
    config: &ScoringConfig,
) -> ScoreResult<i32> {
    let baseline = baseline_ohm.ok_or(ScoreError::NoBaseline)?;
    if !(baseline.is_finite() && baseline > 0.0) {
        return Err(ScoreError::InvalidBaseline { baseline });
    }
    config.validate()?;

    if !humidity_percent.is_finite() || !gas_resistance_ohm.is_finite() {
        return Err(ScoreError::InvalidValue);
    }

    let score = air_quality_score(humidity_percent, gas_resistance_ohm, baseline, config);
    Ok(index_from_score(score))
}
