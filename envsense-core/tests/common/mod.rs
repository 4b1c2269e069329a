//! Common test utilities for sampler integration tests
//!
//! This module provides:
//! - A scripted sensor whose initialization and reads are predetermined
//! - A recording sink that captures every published sample
//! - Reading builders

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use envsense_core::{
    errors::{SensorError, SensorResult},
    sample::SampleResult,
    sensor::{SampleSink, SensorReader},
    units::RawReading,
};

pub const READ_FAILED: SensorError = SensorError::ReadFailure { reason: "i2c nack" };

/// Reading at 20 °C and 1000 hPa with the given humidity and gas resistance
pub fn reading(humidity: f64, gas_resistance: f64) -> RawReading {
    RawReading {
        temperature_celsius: 20.0,
        pressure_hpa: 1000.0,
        humidity_percent: humidity,
        gas_resistance_ohm: gas_resistance,
    }
}

/// Sensor that replays a script of read outcomes
///
/// Once the script is exhausted every read fails.
pub struct ScriptedSensor {
    init: SensorResult<()>,
    reads: VecDeque<SensorResult<RawReading>>,
    read_delay: Duration,
    reads_started: Arc<Mutex<usize>>,
}

impl ScriptedSensor {
    pub fn new<I>(reads: I) -> Self
    where
        I: IntoIterator<Item = SensorResult<RawReading>>,
    {
        Self {
            init: Ok(()),
            reads: reads.into_iter().collect(),
            read_delay: Duration::ZERO,
            reads_started: Arc::new(Mutex::new(0)),
        }
    }

    /// Sensor whose initialization fails
    pub fn failing_init() -> Self {
        let mut sensor = Self::new([]);
        sensor.init = Err(SensorError::InitializationFailure { reason: "no device at 0x77" });
        sensor
    }

    /// Every read takes `delay` to complete
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    /// Counter of reads that have been started
    pub fn reads_started(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.reads_started)
    }
}

#[async_trait]
impl SensorReader for ScriptedSensor {
    async fn initialize(&mut self) -> SensorResult<()> {
        self.init
    }

    async fn read(&mut self) -> SensorResult<RawReading> {
        *self.reads_started.lock().unwrap() += 1;
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }
        self.reads.pop_front().unwrap_or(Err(READ_FAILED))
    }
}

/// Sink that keeps every published sample
#[derive(Clone, Default)]
pub struct RecordingSink {
    samples: Arc<Mutex<Vec<SampleResult>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> Vec<SampleResult> {
        self.samples.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }
}

impl SampleSink for RecordingSink {
    fn emit(&mut self, result: &SampleResult) {
        self.samples.lock().unwrap().push(*result);
    }
}
