//! Constants for EnvSense Core
//!
//! Centralized numeric values used by the sampling engine. Every constant
//! carries its unit in the name.
//!
//! ## Organization
//!
//! - **Physics**: unit conversion factors
//! - **Sampling**: burn-in window and default plugin options

/// Unit conversion factors.
pub mod physics;

/// Burn-in window size and default sampling options.
pub mod sampling;

pub use physics::{KELVIN_OFFSET, PA_PER_HPA};

pub use sampling::{
    BASELINE_WINDOW_SAMPLES, DEFAULT_RATE_S, DEFAULT_BURN_IN_TIME_S,
    DEFAULT_BURN_IN_INTERVAL_S, DEFAULT_HUM_BASELINE_PCT, DEFAULT_HUM_WEIGHTING_PCT, MAX_DURATION_S,
    AQI_SCALE_MAX, AQI_POINTS_PER_SCORE,
};
