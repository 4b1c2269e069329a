//! Sampling and air quality engine for EnvSense
//!
//! Periodically samples a BME680-class environmental sensor (temperature,
//! humidity, pressure, gas resistance), burns in the gas sensor to derive a
//! clean-air baseline, and scores every steady-state reading into an Air
//! Quality Index.
//!
//! Key constraints:
//! - Pure modules run without `std` or heap allocation
//! - A failing sensor never aborts a run; it yields an absent sample
//! - One sample per tick, published in tick order
//!
//! ```no_run
//! use envsense_core::{air_quality_index, ScoringConfig};
//!
//! let config = ScoringConfig::default();
//!
//! // Score a reading against a burn-in baseline of 1100 Ω
//! match air_quality_index(55.0, 900.0, Some(1100.0), &config) {
//!     Ok(aqi) => {},  // publish
//!     Err(e) => {},   // still burning in
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod buffer;
pub mod burn_in;
pub mod constants;
pub mod errors;
pub mod machine;
pub mod sample;
pub mod scoring;
pub mod time;
pub mod units;

#[cfg(feature = "std")]
pub mod config;
pub mod sensor;

#[cfg(feature = "runtime")]
pub mod runtime;

// Public API
pub use burn_in::{BurnInAggregator, WarmupPolicy};
pub use errors::{BaselineError, ConfigError, SamplerError, ScoreError, SensorError, SensorResult};
pub use machine::{SamplerState, SamplingMachine, Timing};
pub use sample::SampleResult;
pub use scoring::{air_quality_index, ScoringConfig};
pub use sensor::SampleSink;
pub use units::{ConvertedReading, RawReading};

#[cfg(feature = "std")]
pub use config::SamplerConfig;

#[cfg(feature = "runtime")]
pub use runtime::{Sampler, SamplerHandle, StartError};
#[cfg(feature = "runtime")]
pub use sensor::SensorReader;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
