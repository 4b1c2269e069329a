//! Sampling State Machine
//!
//! ## Overview
//!
//! [`SamplingMachine`] owns everything stateful about a run: the current
//! lifecycle state, the burn-in window and the gas baseline. It performs no
//! I/O and never sleeps. A driver (see `runtime`) feeds it the outcome of
//! each sensor operation and publishes whatever it returns, which keeps every
//! transition deterministic and testable without timers.
//!
//! ## States
//!
//! ```text
//!            start()          init Ok                warm-up done
//!   Idle ─────────────▶ Initializing ───────▶ BurnIn ─────────────▶ Steady
//!                            │ init Err
//!                            ▼
//!                         Stopped ◀──────── stop() from any state
//! ```
//!
//! | State        | Tick period        | Each tick emits                        |
//! |--------------|--------------------|----------------------------------------|
//! | BurnIn       | `burn_in_interval` | converted reading, no index            |
//! | Steady       | `rate`             | converted reading with index           |
//! | other states | none               | nothing                                |
//!
//! A failed read emits an absent sample and leaves the state unchanged.
//! After `stop()` the machine emits nothing, so a read that was in flight
//! when the run was stopped is discarded.
//!
//! ## Example
//!
//! ```rust
//! use core::time::Duration;
//! use envsense_core::burn_in::WarmupPolicy;
//! use envsense_core::machine::{SamplerState, SamplingMachine, Timing};
//! use envsense_core::scoring::ScoringConfig;
//! use envsense_core::units::RawReading;
//!
//! let timing = Timing {
//!     rate: Duration::from_secs(5),
//!     burn_in_interval: Duration::from_secs(5),
//!     warmup: WarmupPolicy::from_samples(1),
//! };
//! let mut machine = SamplingMachine::new(timing, ScoringConfig::default());
//!
//! machine.start().unwrap();
//! assert!(machine.on_initialized(Ok(()), 0).is_none());
//!
//! let raw = RawReading {
//!     temperature_celsius: 20.0,
//!     pressure_hpa: 1013.0,
//!     humidity_percent: 40.0,
//!     gas_resistance_ohm: 1100.0,
//! };
//! machine.on_tick(Ok(raw), 5_000);
//! assert_eq!(machine.state(), SamplerState::Steady);
//!
//! let sample = machine.on_tick(Ok(raw), 10_000).unwrap();
//! assert_eq!(sample.air_quality_index, Some(0));
//! ```

use core::fmt;
use core::time::Duration;

use crate::burn_in::{BurnInAggregator, WarmupPolicy};
use crate::errors::{SamplerError, SensorResult};
use crate::sample::SampleResult;
use crate::scoring::{air_quality_index, ScoringConfig};
use crate::time::Timestamp;
use crate::units::RawReading;

/// Lifecycle state of a sampling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplerState {
    /// Created, not started
    Idle,
    /// Waiting for the sensor transport to come online
    Initializing,
    /// Collecting gas samples for the baseline
    BurnIn,
    /// Scoring every reading against the baseline
    Steady,
    /// Terminal; no further samples are emitted
    Stopped,
}

impl SamplerState {
    /// States in which a tick timer runs
    pub fn is_sampling(&self) -> bool {
        matches!(self, Self::BurnIn | Self::Steady)
    }
}

impl fmt::Display for SamplerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::BurnIn => "burning in",
            Self::Steady => "sampling",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Tick periods and warm-up length of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Steady-state tick period
    pub rate: Duration,
    /// Burn-in tick period
    pub burn_in_interval: Duration,
    /// When the warm-up ends
    pub warmup: WarmupPolicy,
}

/// Burn-in, baseline and scoring state for one run
#[derive(Debug, Clone)]
pub struct SamplingMachine {
    state: SamplerState,
    timing: Timing,
    scoring: ScoringConfig,
    burn_in: BurnInAggregator,
}

impl SamplingMachine {
    /// Create an idle machine
    pub fn new(timing: Timing, scoring: ScoringConfig) -> Self {
        Self {
            state: SamplerState::Idle,
            timing,
            scoring,
            burn_in: BurnInAggregator::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Gas baseline, once warm-up has finished
    pub fn baseline(&self) -> Option<f64> {
        self.burn_in.baseline()
    }

    /// Burn-in samples recorded so far
    pub fn samples_recorded(&self) -> usize {
        self.burn_in.samples_recorded()
    }

    /// Scoring parameters of this run
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Period of the timer that should currently be running, if any
    pub fn tick_period(&self) -> Option<Duration> {
        match self.state {
            SamplerState::BurnIn => Some(self.timing.burn_in_interval),
            SamplerState::Steady => Some(self.timing.rate),
            _ => None,
        }
    }

    /// Begin a run: `Idle → Initializing`
    pub fn start(&mut self) -> Result<(), SamplerError> {
        match self.state {
            SamplerState::Idle => {
                self.state = SamplerState::Initializing;
                Ok(())
            }
            state => Err(SamplerError::InvalidTransition {
                state,
                action: "start",
            }),
        }
    }

    /// Feed the outcome of sensor initialization
    ///
    /// Success enters burn-in. Failure stops the run and yields one absent
    /// sample; initialization is not retried.
    pub fn on_initialized(&mut self, outcome: SensorResult<()>, now: Timestamp) -> Option<SampleResult> {
        if self.state != SamplerState::Initializing {
            return None;
        }

        match outcome {
            Ok(()) => {
                log_debug!("BME680 sensor initialized");
                self.state = SamplerState::BurnIn;
                log_info!(
                    "Burning in gas sensor for {} samples",
                    self.timing.warmup.required_samples()
                );
                None
            }
            Err(error) => {
                log_warn!("Unable to initialize BME680");
                self.state = SamplerState::Stopped;
                Some(SampleResult::from_failure(&error, now))
            }
        }
    }

    /// Feed the outcome of one timer tick's read
    ///
    /// Returns the sample to publish, or `None` when no timer should be
    /// running (including after `stop()`).
    pub fn on_tick(&mut self, reading: SensorResult<RawReading>, now: Timestamp) -> Option<SampleResult> {
        if !self.state.is_sampling() {
            return None;
        }

        let raw = match reading {
            Ok(raw) => raw,
            Err(error) => return Some(SampleResult::from_failure(&error, now)),
        };

        let converted = raw.convert();
        match self.state {
            SamplerState::BurnIn => {
                self.burn_in.record_sample(converted.gas_resistance_ohm);
                log_debug!(
                    "Burn-in sample {}/{}: {} Ω",
                    self.burn_in.samples_recorded(),
                    self.timing.warmup.required_samples(),
                    converted.gas_resistance_ohm
                );

                if self.timing.warmup.is_complete(self.burn_in.samples_recorded()) {
                    self.finish_burn_in();
                }

                Some(SampleResult::from_reading(&converted, None, now))
            }
            _ => {
                match air_quality_index(
                    converted.humidity_percent,
                    converted.gas_resistance_ohm,
                    self.burn_in.baseline(),
                    &self.scoring,
                ) {
                    Ok(index) => Some(SampleResult::from_reading(&converted, Some(index), now)),
                    Err(error) => {
                        log_warn!("Air quality scoring failed: {}; publishing absent sample", error);
                        Some(SampleResult::absent(now))
                    }
                }
            }
        }
    }

    /// Stop the run from any state; subsequent feeds emit nothing
    pub fn stop(&mut self) {
        if self.state != SamplerState::Stopped {
            log_info!("Stopping sampler (was {})", self.state);
            self.state = SamplerState::Stopped;
        }
    }

    fn finish_burn_in(&mut self) {
        match self.burn_in.compute_baseline() {
            Ok(_) => self.state = SamplerState::Steady,
            Err(error) => {
                log_warn!("Burn-in could not finish: {}", error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SensorError;

    fn raw(humidity: f64, gas: f64) -> RawReading {
        RawReading {
            temperature_celsius: 20.0,
            pressure_hpa: 1000.0,
            humidity_percent: humidity,
            gas_resistance_ohm: gas,
        }
    }

    fn machine(required: usize) -> SamplingMachine {
        let timing = Timing {
            rate: Duration::from_secs(5),
            burn_in_interval: Duration::from_secs(1),
            warmup: WarmupPolicy::from_samples(required),
        };
        SamplingMachine::new(timing, ScoringConfig::default())
    }

    fn started(required: usize) -> SamplingMachine {
        let mut machine = machine(required);
        machine.start().unwrap();
        assert_eq!(machine.on_initialized(Ok(()), 0), None);
        machine
    }

    const READ_FAILED: SensorError = SensorError::ReadFailure { reason: "bus error" };

    #[test]
    fn starts_idle_without_timer() {
        let machine = machine(2);
        assert_eq!(machine.state(), SamplerState::Idle);
        assert_eq!(machine.tick_period(), None);
    }

    #[test]
    fn cannot_start_twice() {
        let mut machine = machine(2);
        machine.start().unwrap();
        assert_eq!(
            machine.start(),
            Err(SamplerError::InvalidTransition {
                state: SamplerState::Initializing,
                action: "start",
            })
        );
    }

    #[test]
    fn init_failure_emits_absent_and_stops() {
        let mut machine = machine(2);
        machine.start().unwrap();

        let error = SensorError::InitializationFailure { reason: "no device at 0x77" };
        let result = machine.on_initialized(Err(error), 100).unwrap();

        assert!(result.is_absent());
        assert_eq!(machine.state(), SamplerState::Stopped);
        assert_eq!(machine.on_tick(Ok(raw(40.0, 1000.0)), 200), None);
    }

    #[test]
    fn burn_in_emits_readings_without_index() {
        let mut machine = started(3);
        assert_eq!(machine.tick_period(), Some(Duration::from_secs(1)));

        let result = machine.on_tick(Ok(raw(40.0, 1000.0)), 1_000).unwrap();
        assert_eq!(result.gas_resistance, Some(1000.0));
        assert!((result.temperature.unwrap() - 293.15).abs() < 1e-9);
        assert_eq!(result.pressure, Some(100_000.0));
        assert_eq!(result.air_quality_index, None);
        assert_eq!(machine.state(), SamplerState::BurnIn);
    }

    #[test]
    fn warmup_end_computes_baseline_and_switches_rate() {
        let mut machine = started(2);
        machine.on_tick(Ok(raw(40.0, 1000.0)), 1_000);
        let last_burn_in = machine.on_tick(Ok(raw(40.0, 1200.0)), 2_000).unwrap();

        assert_eq!(last_burn_in.air_quality_index, None);
        assert_eq!(machine.state(), SamplerState::Steady);
        assert_eq!(machine.baseline(), Some(1100.0));
        assert_eq!(machine.tick_period(), Some(Duration::from_secs(5)));

        let steady = machine.on_tick(Ok(raw(40.0, 1100.0)), 7_000).unwrap();
        assert_eq!(steady.air_quality_index, Some(0));
    }

    #[test]
    fn failed_burn_in_reads_do_not_count() {
        let mut machine = started(2);
        machine.on_tick(Ok(raw(40.0, 1000.0)), 1_000);

        let result = machine.on_tick(Err(READ_FAILED), 2_000).unwrap();
        assert!(result.is_absent());
        assert_eq!(machine.state(), SamplerState::BurnIn);
        assert_eq!(machine.samples_recorded(), 1);

        machine.on_tick(Ok(raw(40.0, 1200.0)), 3_000);
        assert_eq!(machine.state(), SamplerState::Steady);
    }

    #[test]
    fn steady_read_failure_keeps_sampling() {
        let mut machine = started(1);
        machine.on_tick(Ok(raw(40.0, 1100.0)), 1_000);

        let result = machine.on_tick(Err(READ_FAILED), 6_000).unwrap();
        assert!(result.is_absent());
        assert_eq!(result.captured_at, 6_000);
        assert_eq!(machine.state(), SamplerState::Steady);

        let next = machine.on_tick(Ok(raw(40.0, 1100.0)), 11_000).unwrap();
        assert_eq!(next.air_quality_index, Some(0));
    }

    #[test]
    fn steady_readings_do_not_move_baseline() {
        let mut machine = started(1);
        machine.on_tick(Ok(raw(40.0, 1100.0)), 1_000);
        machine.on_tick(Ok(raw(40.0, 300.0)), 6_000);
        machine.on_tick(Ok(raw(40.0, 9_000.0)), 11_000);

        assert_eq!(machine.baseline(), Some(1100.0));
    }

    #[test]
    fn stop_discards_in_flight_read() {
        let mut machine = started(1);
        machine.stop();

        assert_eq!(machine.state(), SamplerState::Stopped);
        assert_eq!(machine.tick_period(), None);
        assert_eq!(machine.on_tick(Ok(raw(40.0, 1100.0)), 1_000), None);
    }

    #[test]
    fn stop_during_initialization_discards_outcome() {
        let mut machine = machine(1);
        machine.start().unwrap();
        machine.stop();

        let error = SensorError::InitializationFailure { reason: "timeout" };
        assert_eq!(machine.on_initialized(Err(error), 0), None);
        assert_eq!(machine.state(), SamplerState::Stopped);
    }
}
