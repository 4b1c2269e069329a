//! Simulated Air Quality Monitor
//!
//! Drives the sampler with a simulated BME680: the gas plate settles during
//! burn-in, then a VOC source appears and the index climbs.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example simulated_monitor
//! ```

use std::time::Duration;

use async_trait::async_trait;
use envsense_core::{
    config::SamplerConfig,
    errors::{SensorError, SensorResult},
    runtime::Sampler,
    sample::SampleResult,
    sensor::SensorReader,
    time::SystemTime,
    units::RawReading,
};

/// BME680 stand-in with a settling heater and a VOC event
struct SimulatedBme680 {
    tick: u32,
}

#[async_trait]
impl SensorReader for SimulatedBme680 {
    async fn initialize(&mut self) -> SensorResult<()> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(())
    }

    async fn read(&mut self) -> SensorResult<RawReading> {
        self.tick += 1;

        // Every 7th read fails like a NACK on a noisy bus
        if self.tick % 7 == 0 {
            return Err(SensorError::ReadFailure { reason: "simulated nack" });
        }

        // Resistance rises towards 120 kΩ while the heater settles,
        // then drops once VOCs appear after tick 12
        let settled = 120_000.0 - 60_000.0 / self.tick as f64;
        let voc_drop = if self.tick > 12 { 4_000.0 * (self.tick - 12) as f64 } else { 0.0 };

        Ok(RawReading {
            temperature_celsius: 21.0 + 0.05 * self.tick as f64,
            pressure_hpa: 1012.4,
            humidity_percent: 45.0 + 0.5 * self.tick as f64,
            gas_resistance_ohm: settled - voc_drop,
        })
    }
}

fn print_sample(sample: &SampleResult) {
    if sample.is_absent() {
        println!("  [no reading]");
        return;
    }

    println!(
        "  T={:>7.2} K  RH={:>5.1} %  P={:>9.0} Pa  gas={:>8.0} Ω  AQI={}",
        sample.temperature.unwrap_or_default(),
        sample.humidity.unwrap_or_default(),
        sample.pressure.unwrap_or_default(),
        sample.gas_resistance.unwrap_or_default(),
        sample
            .air_quality_index
            .map(|aqi| aqi.to_string())
            .unwrap_or_else(|| "burning in".into()),
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("EnvSense Simulated Monitor");
    println!("==========================\n");

    let config = SamplerConfig::from_json(
        r#"{ "rate": 1, "burn_in_time": 6, "burn_in_interval": 0.5, "path": "cabin" }"#,
    )?;
    println!(
        "Burn-in: {} samples every {}s, then one sample every {}s\n",
        config.timing().warmup.required_samples(),
        config.burn_in_interval,
        config.rate
    );

    let handle = Sampler::start(&config, SimulatedBme680 { tick: 0 }, print_sample, SystemTime)?;

    tokio::time::sleep(Duration::from_secs(20)).await;

    println!("\nBaseline: {:?} Ω", handle.baseline());
    handle.shutdown().await;
    println!("Stopped.");

    Ok(())
}
