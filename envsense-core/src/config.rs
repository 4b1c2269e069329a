//! Plugin Options
//!
//! The host hands the plugin its options as a JSON object. Every field has a
//! default, so `{}` is a valid configuration:
//!
//! ```rust
//! use envsense_core::config::SamplerConfig;
//!
//! let config = SamplerConfig::from_json(r#"{ "rate": 5, "path": "cabin" }"#).unwrap();
//! assert_eq!(config.rate, 5.0);
//! assert_eq!(config.burn_in_time, 500.0);
//! assert_eq!(config.path, "cabin");
//! assert_eq!(config.i2c_address().unwrap(), 0x77);
//! ```
//!
//! Options are read once at start and stay fixed for the lifetime of a run.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::burn_in::WarmupPolicy;
use crate::constants::{
    DEFAULT_BURN_IN_INTERVAL_S, DEFAULT_BURN_IN_TIME_S, DEFAULT_HUM_BASELINE_PCT,
    DEFAULT_HUM_WEIGHTING_PCT, DEFAULT_RATE_S, MAX_DURATION_S,
};
use crate::errors::ConfigError;
use crate::machine::{SamplingMachine, Timing};
use crate::scoring::ScoringConfig;

/// Highest 7-bit I2C address
const MAX_I2C_ADDRESS: u32 = 0x7F;

/// Seconds to `Duration`; values `validate` rejects map to zero
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

/// Finite, at most one week, and above zero unless `allow_zero`
fn in_duration_range(value: f64, allow_zero: bool) -> bool {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 && !seconds(value).is_zero() };
    value.is_finite() && lower_ok && value <= MAX_DURATION_S
}

/// Options consumed by the sampling engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Steady-state sample period (seconds)
    pub rate: f64,
    /// Warm-up duration (seconds)
    pub burn_in_time: f64,
    /// Burn-in tick period (seconds)
    pub burn_in_interval: f64,
    /// Ideal humidity (%RH)
    pub hum_baseline: f64,
    /// Humidity share of the quality score (%)
    pub hum_weighting: f64,
    /// Path segment appended to `environment.`
    pub path: String,
    /// I2C bus number
    pub i2c_bus: u8,
    /// I2C address, hex (`0x77`) or decimal
    pub i2c_address: String,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE_S,
            burn_in_time: DEFAULT_BURN_IN_TIME_S,
            burn_in_interval: DEFAULT_BURN_IN_INTERVAL_S,
            hum_baseline: DEFAULT_HUM_BASELINE_PCT,
            hum_weighting: DEFAULT_HUM_WEIGHTING_PCT,
            path: "inside".into(),
            i2c_bus: 1,
            i2c_address: "0x77".into(),
        }
    }
}

impl SamplerConfig {
    /// Parse and validate a JSON options object
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Malformed {
            reason: match e.classify() {
                serde_json::error::Category::Io => "io error",
                serde_json::error::Category::Syntax => "invalid JSON",
                serde_json::error::Category::Data => "unexpected option type",
                serde_json::error::Category::Eof => "truncated JSON",
            },
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject options the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !in_duration_range(self.rate, false) {
            return Err(ConfigError::InvalidRate(self.rate));
        }
        if !in_duration_range(self.burn_in_interval, false) {
            return Err(ConfigError::InvalidBurnInInterval(self.burn_in_interval));
        }
        if !in_duration_range(self.burn_in_time, true) {
            return Err(ConfigError::InvalidBurnInTime(self.burn_in_time));
        }
        if !(self.hum_baseline > 0.0 && self.hum_baseline < 100.0) {
            return Err(ConfigError::InvalidHumidityBaseline(self.hum_baseline));
        }
        if !(0.0..=100.0).contains(&self.hum_weighting) {
            return Err(ConfigError::InvalidHumidityWeighting(self.hum_weighting));
        }
        self.i2c_address()?;
        Ok(())
    }

    /// Steady-state tick period
    pub fn rate(&self) -> Duration {
        seconds(self.rate)
    }

    /// Burn-in tick period
    pub fn burn_in_interval(&self) -> Duration {
        seconds(self.burn_in_interval)
    }

    /// Warm-up duration
    pub fn burn_in_time(&self) -> Duration {
        seconds(self.burn_in_time)
    }

    /// Humidity reference and weighting
    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig::new(self.hum_baseline, self.hum_weighting)
    }

    /// Tick periods and warm-up length
    pub fn timing(&self) -> Timing {
        Timing {
            rate: self.rate(),
            burn_in_interval: self.burn_in_interval(),
            warmup: WarmupPolicy::from_durations(self.burn_in_time(), self.burn_in_interval()),
        }
    }

    /// Build an idle state machine for one run
    pub fn machine(&self) -> Result<SamplingMachine, ConfigError> {
        self.validate()?;
        Ok(SamplingMachine::new(self.timing(), self.scoring()))
    }

    /// Parsed 7-bit I2C address
    pub fn i2c_address(&self) -> Result<u8, ConfigError> {
        let text = self.i2c_address.trim();
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => text.parse::<u32>(),
        };

        match parsed {
            Ok(address) if address <= MAX_I2C_ADDRESS => Ok(address as u8),
            _ => Err(ConfigError::InvalidI2cAddress),
        }
    }

    /// Signal K path prefix, `environment.<path>`
    pub fn path_prefix(&self) -> String {
        format!("environment.{}", self.path)
    }
}
