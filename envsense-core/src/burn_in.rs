//! Gas Sensor Burn-In and Baseline Calibration
//!
//! ## Background
//!
//! The BME680 gas channel is a heated metal-oxide plate. For the first minutes
//! after power-up its resistance drifts while the heater settles, so raw
//! readings cannot be compared against anything. The engine therefore runs a
//! warm-up ("burn-in") phase: every burn-in tick records one gas resistance
//! sample, and when warm-up ends the mean of the trailing window becomes the
//! **baseline**, the resistance that represents "clean air" for this run.
//!
//! ```text
//! samples:  s0 s1 s2 ... s29 | s30 ... s79
//!           └─ ignored ──────┘└─ last 50 ─┘ → baseline = mean(s30..s79)
//! ```
//!
//! ## Warm-up Threshold
//!
//! Warm-up ends once the number of *successfully recorded* samples reaches
//!
//! ```text
//! required = max(1, ceil(burn_in_time / burn_in_interval))
//! ```
//!
//! Failed reads do not count, so transient bus errors extend the warm-up and
//! the window is never empty when the baseline is computed.
//!
//! ## Set-Once Baseline
//!
//! The baseline is computed exactly once per run. Later calls to
//! [`BurnInAggregator::compute_baseline`] return the stored value even if more
//! samples were recorded in between.

use core::time::Duration;

use crate::buffer::CircularBuffer;
use crate::constants::BASELINE_WINDOW_SAMPLES;
use crate::errors::BaselineError;

/// Number of recorded samples that ends the warm-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupPolicy {
    required_samples: usize,
}

impl WarmupPolicy {
    /// Warm-up ends after exactly `samples` recorded samples (at least one)
    pub const fn from_samples(samples: usize) -> Self {
        Self {
            required_samples: if samples == 0 { 1 } else { samples },
        }
    }

    /// Derive the sample count from the warm-up duration and the burn-in tick period
    pub fn from_durations(burn_in_time: Duration, burn_in_interval: Duration) -> Self {
        let interval = burn_in_interval.as_secs_f64();
        if interval <= 0.0 {
            return Self::from_samples(1);
        }

        let ticks = libm::ceil(burn_in_time.as_secs_f64() / interval);
        Self::from_samples(ticks as usize)
    }

    /// Samples needed before the baseline is computed
    pub fn required_samples(&self) -> usize {
        self.required_samples
    }

    /// Check whether `recorded` samples complete the warm-up
    pub fn is_complete(&self, recorded: usize) -> bool {
        recorded >= self.required_samples
    }
}

/// Collects burn-in gas samples and derives the baseline
#[derive(Debug, Clone, Default)]
pub struct BurnInAggregator {
    window: CircularBuffer<f64, BASELINE_WINDOW_SAMPLES>,
    recorded: usize,
    baseline: Option<f64>,
}

impl BurnInAggregator {
    /// Create an empty aggregator with no baseline
    pub const fn new() -> Self {
        Self {
            window: CircularBuffer::new(),
            recorded: 0,
            baseline: None,
        }
    }

    /// Record one gas resistance sample (Ω)
    pub fn record_sample(&mut self, gas_resistance_ohm: f64) {
        self.window.push(gas_resistance_ohm);
        self.recorded += 1;
    }

    /// Compute the baseline from the trailing window, or return the stored one
    pub fn compute_baseline(&mut self) -> Result<f64, BaselineError> {
        if let Some(baseline) = self.baseline {
            return Ok(baseline);
        }

        if self.window.is_empty() {
            return Err(BaselineError::InsufficientBurnInData);
        }

        let sum: f64 = self.window.iter().sum();
        let baseline = sum / self.window.len() as f64;
        self.baseline = Some(baseline);

        log_info!(
            "Gas baseline {} Ω from last {} of {} burn-in samples",
            baseline,
            self.window.len(),
            self.recorded
        );

        Ok(baseline)
    }

    /// Baseline, once computed
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Total number of samples recorded this run
    pub fn samples_recorded(&self) -> usize {
        self.recorded
    }

    /// Number of samples currently contributing to the baseline
    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}
