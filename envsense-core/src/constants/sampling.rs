//! Sampling and Scoring Defaults
//!
//! Defaults match the options a freshly installed plugin starts with.

// ===== BURN-IN =====

/// Number of trailing burn-in samples averaged into the gas baseline.
///
/// Early readings after power-up are dominated by heater stabilization, so
/// only the most recent window is trusted.
pub const BASELINE_WINDOW_SAMPLES: usize = 50;

/// Default warm-up duration (seconds).
///
/// Source: Bosch BME680 application note, gas sensor stabilization time
pub const DEFAULT_BURN_IN_TIME_S: f64 = 500.0;

/// Default burn-in tick period (seconds).
///
/// Independent of the steady-state rate so the baseline window fills quickly.
pub const DEFAULT_BURN_IN_INTERVAL_S: f64 = 1.0;

/// Longest accepted tick period or warm-up duration (seconds), one week.
pub const MAX_DURATION_S: f64 = 604_800.0;

// ===== STEADY STATE =====

/// Default steady-state sample period (seconds).
pub const DEFAULT_RATE_S: f64 = 60.0;

/// Default humidity considered ideal for indoor air (%RH).
pub const DEFAULT_HUM_BASELINE_PCT: f64 = 40.0;

/// Default share of the quality score contributed by humidity (%).
///
/// The remaining share is contributed by gas resistance.
pub const DEFAULT_HUM_WEIGHTING_PCT: f64 = 25.0;

// ===== AIR QUALITY INDEX =====

/// Index value for the worst possible air (score of 0).
pub const AQI_SCALE_MAX: f64 = 500.0;

/// Index points per quality score point.
pub const AQI_POINTS_PER_SCORE: f64 = 5.0;
