//! Error Types for Sampling, Baseline and Scoring Failures
//!
//! ## Design Philosophy
//!
//! The sampling engine runs on small devices next to an I2C bus, so errors
//! follow the same rules as the rest of the core crate:
//!
//! 1. **No Heap Allocation**: messages are `&'static str`, never `String`.
//! 2. **Copy Semantics**: every error is `Copy` and cheap to return from a tick.
//! 3. **Local Recovery**: sensor errors are absorbed at the tick boundary and
//!    turned into an all-absent [`SampleResult`](crate::sample::SampleResult).
//!    They never reach the host as a crash.
//!
//! ## Error Categories
//!
//! ### Sensor Transport
//! - `SensorError::InitializationFailure`: the sensor could not be brought
//!   online. One absent sample is emitted and the run does not retry.
//! - `SensorError::ReadFailure`: a single tick's read failed. One absent
//!   sample is emitted and the timer keeps running.
//!
//! ### Contract Violations
//! - `BaselineError::InsufficientBurnInData`: a baseline was requested before
//!   any gas sample was recorded. Correct state-machine sequencing never does this.
//! - `ScoreError::NoBaseline`: the scorer was invoked before warm-up finished.
//!
//! ### Setup
//! - `ConfigError`: rejected plugin options.
//! - `SamplerError`: an illegal lifecycle request (e.g. starting twice).
//!
//! ```rust
//! use envsense_core::errors::SensorError;
//! use envsense_core::sample::SampleResult;
//!
//! fn on_read(result: Result<f64, SensorError>) -> Option<f64> {
//!     match result {
//!         Ok(value) => Some(value),
//!         Err(SensorError::ReadFailure { .. }) => None, // publish an absent sample
//!         Err(SensorError::InitializationFailure { .. }) => None,
//!     }
//! }
//! # let _ = SampleResult::absent(0);
//! ```

use crate::machine::SamplerState;
use thiserror_no_std::Error;

/// Result type for sensor transport operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Result type for scoring operations
pub type ScoreResult<T> = Result<T, ScoreError>;

/// Sensor transport failures. The core only distinguishes "succeeded" from
/// "failed"; the reason is carried for logging.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Sensor transport could not be brought online
    #[error("Sensor initialization failed: {reason}")]
    InitializationFailure {
        /// Driver supplied reason
        reason: &'static str,
    },

    /// A single reading could not be obtained
    #[error("Sensor read failed: {reason}")]
    ReadFailure {
        /// Driver supplied reason
        reason: &'static str,
    },
}

/// Gas baseline errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineError {
    /// Baseline requested while the burn-in window is empty
    #[error("Insufficient burn-in data: no gas samples recorded")]
    InsufficientBurnInData,
}

/// Air quality scoring errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ScoreError {
    /// Scorer invoked before a baseline exists
    #[error("No gas baseline available")]
    NoBaseline,

    /// Baseline is zero, negative or not a number
    #[error("Invalid gas baseline {baseline}")]
    InvalidBaseline {
        /// Offending baseline resistance (ohm)
        baseline: f64,
    },

    /// Humidity baseline or weighting outside the usable range
    #[error("Invalid scoring configuration: {reason}")]
    InvalidConfig {
        /// Which parameter was rejected
        reason: &'static str,
    },

    /// Humidity or gas resistance is NaN or infinite
    #[error("Invalid value: not a valid number")]
    InvalidValue,
}

/// Configuration errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Sample rate must be a positive, finite number of seconds
    #[error("Invalid sample rate {0}s")]
    InvalidRate(f64),

    /// Burn-in tick interval must be a positive, finite number of seconds
    #[error("Invalid burn-in interval {0}s")]
    InvalidBurnInInterval(f64),

    /// Burn-in time must be a non-negative, finite number of seconds
    #[error("Invalid burn-in time {0}s")]
    InvalidBurnInTime(f64),

    /// Humidity baseline must lie strictly between 0 and 100 percent
    #[error("Invalid humidity baseline {0}%")]
    InvalidHumidityBaseline(f64),

    /// Humidity weighting must lie between 0 and 100 percent
    #[error("Invalid humidity weighting {0}%")]
    InvalidHumidityWeighting(f64),

    /// I2C address is not a 7-bit hex or decimal number
    #[error("Invalid I2C address")]
    InvalidI2cAddress,

    /// Options document could not be parsed
    #[error("Malformed options: {reason}")]
    Malformed {
        /// Parser category
        reason: &'static str,
    },
}

/// Sampler lifecycle errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerError {
    /// Requested transition is not valid from the current state
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        /// State the machine was in
        state: SamplerState,
        /// Requested action
        action: &'static str,
    },

    /// No async runtime is available to drive the sampler
    #[error("No async runtime available")]
    NoRuntime,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InitializationFailure { reason } =>
                defmt::write!(fmt, "Init failed: {}", reason),
            Self::ReadFailure { reason } =>
                defmt::write!(fmt, "Read failed: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScoreError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NoBaseline => defmt::write!(fmt, "No baseline"),
            Self::InvalidBaseline { baseline } =>
                defmt::write!(fmt, "Invalid baseline {}", baseline),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
            Self::InvalidValue => defmt::write!(fmt, "Invalid value"),
        }
    }
}
