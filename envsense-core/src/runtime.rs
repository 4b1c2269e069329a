//! Tokio driver for the sampling state machine
//!
//! ## Overview
//!
//! [`Sampler::start`] spawns one task per run. The task owns the sensor
//! reader and walks the [`SamplingMachine`] through its lifecycle:
//!
//! 1. await `initialize()` and feed the outcome to the machine
//! 2. arm an interval with the machine's current tick period
//! 3. on each tick await one `read()`, feed it to the machine, publish the result
//! 4. when the machine changes state, re-arm the interval with the new period
//!
//! The first tick of an interval fires one full period after it is armed.
//! Ticks are strictly serialized: the next tick is not awaited until the
//! previous read has completed and its result has been published.
//!
//! ## Cancellation
//!
//! The machine and the sink live behind one mutex. Publishing happens while
//! that lock is held, and [`SamplerHandle::stop`] takes the same lock to move
//! the machine to `Stopped`. Once `stop()` returns:
//! - the machine emits nothing, so a read that resolves afterwards is dropped
//! - the task is signalled and exits at its next await point
//!
//! Dropping the handle also ends the task.
//!
//! ## Example
//!
//! ```rust,no_run
//! use envsense_core::config::SamplerConfig;
//! use envsense_core::runtime::Sampler;
//! use envsense_core::sample::SampleResult;
//! use envsense_core::time::SystemTime;
//! # use envsense_core::{errors::SensorResult, sensor::SensorReader, units::RawReading};
//! # struct Bme680;
//! # #[async_trait::async_trait]
//! # impl SensorReader for Bme680 {
//! #     async fn initialize(&mut self) -> SensorResult<()> { Ok(()) }
//! #     async fn read(&mut self) -> SensorResult<RawReading> { unimplemented!() }
//! # }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SamplerConfig::from_json(r#"{ "rate": 5 }"#)?;
//! let handle = Sampler::start(&config, Bme680, |sample: &SampleResult| {
//!     println!("{:?}", sample);
//! }, SystemTime)?;
//!
//! // ... later
//! handle.stop();
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror_no_std::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::SamplerConfig;
use crate::errors::{ConfigError, SamplerError};
use crate::machine::{SamplerState, SamplingMachine};
use crate::sensor::{SampleSink, SensorReader};
use crate::time::TimeSource;

/// Why a sampler could not be started
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum StartError {
    /// Options were rejected
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Lifecycle error
    #[error("{0}")]
    Sampler(#[from] SamplerError),
}

/// State shared between the task and the handle
struct Shared {
    machine: SamplingMachine,
    sink: Box<dyn SampleSink>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Entry point for timer-driven sampling
pub struct Sampler;

impl Sampler {
    /// Validate the options and spawn the sampling task on the current runtime
    pub fn start<R, S, C>(
        config: &SamplerConfig,
        reader: R,
        sink: S,
        clock: C,
    ) -> Result<SamplerHandle, StartError>
    where
        R: SensorReader + 'static,
        S: SampleSink + 'static,
        C: TimeSource + 'static,
    {
        let mut machine = config.machine()?;
        machine.start()?;

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SamplerError::NoRuntime)?;

        let shared = Arc::new(Mutex::new(Shared {
            machine,
            sink: Box::new(sink),
        }));
        let (stop_tx, stop_rx) = watch::channel(false);

        log_info!(
            "Starting sampler: rate {}s, burn-in {}s every {}s",
            config.rate,
            config.burn_in_time,
            config.burn_in_interval
        );

        let task = runtime.spawn(drive(Arc::clone(&shared), reader, clock, stop_rx));

        Ok(SamplerHandle {
            shared,
            stop_tx,
            task,
        })
    }
}

/// Control handle for a running sampler
pub struct SamplerHandle {
    shared: Arc<Mutex<Shared>>,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Stop sampling; no sample is published after this returns
    pub fn stop(&self) {
        lock(&self.shared).machine.stop();
        // Receiver may already be gone if the task ended on its own
        let _ = self.stop_tx.send(true);
    }

    /// Current lifecycle state
    pub fn state(&self) -> SamplerState {
        lock(&self.shared).machine.state()
    }

    /// Gas baseline, once warm-up has finished
    pub fn baseline(&self) -> Option<f64> {
        lock(&self.shared).machine.baseline()
    }

    /// Burn-in samples recorded so far
    pub fn samples_recorded(&self) -> usize {
        lock(&self.shared).machine.samples_recorded()
    }

    /// Check whether the sampling task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop sampling and wait for the task to exit
    pub async fn shutdown(self) {
        self.stop();
        if let Err(error) = self.task.await {
            log_warn!("Sampler task ended abnormally: {}", error);
        }
    }
}

async fn drive<R, C>(
    shared: Arc<Mutex<Shared>>,
    mut reader: R,
    clock: C,
    mut stop_rx: watch::Receiver<bool>,
) where
    R: SensorReader,
    C: TimeSource,
{
    let outcome = tokio::select! {
        biased;
        _ = stop_rx.changed() => return,
        outcome = reader.initialize() => outcome,
    };

    {
        let mut guard = lock(&shared);
        let shared = &mut *guard;
        if let Some(result) = shared.machine.on_initialized(outcome, clock.now()) {
            shared.sink.emit(&result);
        }
    }

    loop {
        let period = lock(&shared).machine.tick_period();
        let Some(period) = period else { break };

        if run_phase(&shared, &mut reader, &clock, &mut stop_rx, period).await.is_break() {
            break;
        }
    }

    log_debug!("Sampler task finished");
}

/// Tick at `period` until the machine leaves its current state
async fn run_phase<R, C>(
    shared: &Mutex<Shared>,
    reader: &mut R,
    clock: &C,
    stop_rx: &mut watch::Receiver<bool>,
    period: Duration,
) -> std::ops::ControlFlow<()>
where
    R: SensorReader,
    C: TimeSource,
{
    use std::ops::ControlFlow;

    let Some(first_tick) = Instant::now().checked_add(period) else {
        log_warn!("Tick period {:?} is out of range; stopping", period);
        lock(shared).machine.stop();
        return ControlFlow::Break(());
    };
    let mut interval = time::interval_at(first_tick, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => return ControlFlow::Break(()),
            _ = interval.tick() => {}
        }

        let reading = tokio::select! {
            biased;
            _ = stop_rx.changed() => return ControlFlow::Break(()),
            reading = reader.read() => reading,
        };

        let mut guard = lock(shared);
        let state = &mut *guard;
        let before = state.machine.state();
        if let Some(result) = state.machine.on_tick(reading, clock.now()) {
            state.sink.emit(&result);
        }

        if state.machine.state() != before {
            return ControlFlow::Continue(());
        }
    }
}
