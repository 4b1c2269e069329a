//! Integration tests for the timer-driven sampler
//!
//! Tests run on a paused tokio clock, so timer ticks are deterministic and
//! a 60 second warm-up completes instantly.

#![cfg(feature = "runtime")]

mod common;

use std::time::Duration;

use envsense_core::{
    config::SamplerConfig,
    errors::{ConfigError, SamplerError},
    machine::SamplerState,
    runtime::{Sampler, StartError},
    time::FixedTime,
};

use common::{reading, RecordingSink, ScriptedSensor, READ_FAILED};

fn config(rate: f64, burn_in_time: f64, burn_in_interval: f64) -> SamplerConfig {
    SamplerConfig {
        rate,
        burn_in_time,
        burn_in_interval,
        hum_baseline: 40.0,
        hum_weighting: 25.0,
        ..SamplerConfig::default()
    }
}

async fn advance(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}

#[tokio::test(start_paused = true)]
async fn burn_in_then_scored_sample() {
    let sensor = ScriptedSensor::new([
        Ok(reading(40.0, 1000.0)),
        Ok(reading(40.0, 1200.0)),
        Ok(reading(40.0, 1100.0)),
    ]);
    let sink = RecordingSink::new();

    let handle = Sampler::start(&config(5.0, 10.0, 5.0), sensor, sink.clone(), FixedTime::new(0)).unwrap();

    advance(11).await;
    assert_eq!(handle.state(), SamplerState::Steady);
    assert_eq!(handle.baseline(), Some(1100.0));
    assert_eq!(handle.samples_recorded(), 2);

    advance(5).await;
    let samples = sink.samples();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].gas_resistance, Some(1000.0));
    assert_eq!(samples[0].air_quality_index, None);
    assert_eq!(samples[1].gas_resistance, Some(1200.0));
    assert_eq!(samples[1].air_quality_index, None);
    assert_eq!(samples[2].air_quality_index, Some(0));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn burn_in_ticks_independently_of_rate() {
    let sensor = ScriptedSensor::new([
        Ok(reading(40.0, 900.0)),
        Ok(reading(40.0, 1000.0)),
        Ok(reading(40.0, 1100.0)),
        Ok(reading(40.0, 1000.0)),
    ]);
    let sink = RecordingSink::new();

    let handle = Sampler::start(&config(60.0, 3.0, 1.0), sensor, sink.clone(), FixedTime::new(0)).unwrap();

    advance(4).await;
    assert_eq!(sink.len(), 3);
    assert_eq!(handle.state(), SamplerState::Steady);
    assert_eq!(handle.baseline(), Some(1000.0));

    // First steady tick one full rate period after warm-up ended
    advance(58).await;
    assert_eq!(sink.len(), 3);
    advance(2).await;
    assert_eq!(sink.len(), 4);
    assert_eq!(sink.samples()[3].air_quality_index, Some(0));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn steady_read_failure_publishes_absent_and_keeps_ticking() {
    let sensor = ScriptedSensor::new([
        Ok(reading(40.0, 1000.0)),
        Ok(reading(40.0, 1200.0)),
        Err(READ_FAILED),
        Ok(reading(40.0, 1100.0)),
    ]);
    let sink = RecordingSink::new();

    let handle = Sampler::start(&config(5.0, 10.0, 5.0), sensor, sink.clone(), FixedTime::new(0)).unwrap();

    advance(21).await;
    let samples = sink.samples();
    assert_eq!(samples.len(), 4);
    assert!(samples[2].is_absent());
    assert_eq!(samples[3].air_quality_index, Some(0));
    assert_eq!(handle.state(), SamplerState::Steady);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn burn_in_read_failure_extends_warmup() {
    let sensor = ScriptedSensor::new([
        Ok(reading(40.0, 1000.0)),
        Err(READ_FAILED),
        Ok(reading(40.0, 1200.0)),
    ]);
    let sink = RecordingSink::new();

    let handle = Sampler::start(&config(5.0, 10.0, 5.0), sensor, sink.clone(), FixedTime::new(0)).unwrap();

    advance(11).await;
    assert_eq!(handle.state(), SamplerState::BurnIn);
    assert!(sink.samples()[1].is_absent());

    advance(5).await;
    assert_eq!(handle.state(), SamplerState::Steady);
    assert_eq!(handle.baseline(), Some(1100.0));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn initialization_failure_publishes_once_and_stops() {
    let sink = RecordingSink::new();
    let handle = Sampler::start(
        &config(5.0, 10.0, 5.0),
        ScriptedSensor::failing_init(),
        sink.clone(),
        FixedTime::new(0),
    )
    .unwrap();

    advance(60).await;
    let samples = sink.samples();
    assert_eq!(samples.len(), 1);
    assert!(samples[0].is_absent());
    assert_eq!(handle.state(), SamplerState::Stopped);
    assert!(handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn stop_discards_in_flight_read() {
    let sensor = ScriptedSensor::new([Ok(reading(40.0, 1000.0)), Ok(reading(40.0, 1200.0))])
        .with_read_delay(Duration::from_secs(3));
    let reads_started = sensor.reads_started();
    let sink = RecordingSink::new();

    let handle = Sampler::start(&config(5.0, 10.0, 5.0), sensor, sink.clone(), FixedTime::new(0)).unwrap();

    // First tick at 5s starts a read that would complete at 8s
    advance(6).await;
    assert_eq!(*reads_started.lock().unwrap(), 1);
    handle.stop();
    assert_eq!(handle.state(), SamplerState::Stopped);

    advance(30).await;
    assert_eq!(sink.len(), 0);
    assert_eq!(*reads_started.lock().unwrap(), 1);
    assert!(handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn stop_before_first_tick_publishes_nothing() {
    let sensor = ScriptedSensor::new([Ok(reading(40.0, 1000.0))]);
    let sink = RecordingSink::new();

    let handle = Sampler::start(&config(5.0, 10.0, 5.0), sensor, sink.clone(), FixedTime::new(0)).unwrap();
    handle.stop();

    advance(30).await;
    assert_eq!(sink.len(), 0);
    assert!(handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn invalid_options_are_rejected() {
    let result = Sampler::start(
        &config(0.0, 10.0, 5.0),
        ScriptedSensor::new([]),
        RecordingSink::new(),
        FixedTime::new(0),
    );

    assert!(matches!(result, Err(StartError::Config(ConfigError::InvalidRate(_)))));
}

#[test]
fn start_requires_a_runtime() {
    let result = Sampler::start(
        &SamplerConfig::default(),
        ScriptedSensor::new([]),
        RecordingSink::new(),
        FixedTime::new(0),
    );

    assert!(matches!(result, Err(StartError::Sampler(SamplerError::NoRuntime))));
}
