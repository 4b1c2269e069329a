//! Collaborator seams: the sensor driver and the publisher
//!
//! The engine never talks to I2C or to the host's message bus directly.
//! It sees two capabilities:
//!
//! - [`SensorReader`]: brings the sensor online and produces one
//!   [`RawReading`] per call. Failures are opaque; the engine only cares that
//!   the call failed.
//! - [`SampleSink`]: receives every [`SampleResult`] in tick order. Sinks
//!   are synchronous and must not block; publishing happens while the sampler
//!   holds its state lock so that `stop()` can guarantee nothing is emitted
//!   after it returns. A sink must not call back into the sampler handle.
//!
//! Any `FnMut(&SampleResult)` closure is a sink:
//!
//! ```rust
//! use envsense_core::sample::SampleResult;
//! use envsense_core::sensor::SampleSink;
//!
//! let mut seen = Vec::new();
//! {
//!     let mut sink = |result: &SampleResult| seen.push(*result);
//!     sink.emit(&SampleResult::absent(0));
//! }
//! assert_eq!(seen.len(), 1);
//! ```

use crate::sample::SampleResult;

#[cfg(feature = "runtime")]
use crate::errors::SensorResult;
#[cfg(feature = "runtime")]
use crate::units::RawReading;

/// Receives one sample per tick
pub trait SampleSink: Send {
    /// Publish a sample
    fn emit(&mut self, result: &SampleResult);
}

impl<F> SampleSink for F
where
    F: FnMut(&SampleResult) + Send,
{
    fn emit(&mut self, result: &SampleResult) {
        self(result)
    }
}

/// Sensor driver capability
///
/// # Example Implementation
///
/// ```ignore
/// struct Bme680Reader {
///     device: Bme680<I2cdev, Delay>,
/// }
///
/// #[async_trait]
/// impl SensorReader for Bme680Reader {
///     async fn initialize(&mut self) -> SensorResult<()> {
///         self.device.init().await.map_err(|_| SensorError::InitializationFailure {
///             reason: "bme680 init",
///         })
///     }
///
///     async fn read(&mut self) -> SensorResult<RawReading> {
///         let data = self.device.measure().await.map_err(|_| SensorError::ReadFailure {
///             reason: "bme680 measure",
///         })?;
///         Ok(RawReading {
///             temperature_celsius: data.temperature_celsius() as f64,
///             pressure_hpa: data.pressure_hpa() as f64,
///             humidity_percent: data.humidity_percent() as f64,
///             gas_resistance_ohm: data.gas_resistance_ohm() as f64,
///         })
///     }
/// }
/// ```
#[cfg(feature = "runtime")]
#[async_trait::async_trait]
pub trait SensorReader: Send {
    /// Bring the sensor transport online
    async fn initialize(&mut self) -> SensorResult<()>;

    /// Take one reading
    async fn read(&mut self) -> SensorResult<RawReading>;
}
