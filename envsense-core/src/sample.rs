//! Per-tick sample results and the absent-value fallback
//!
//! Every tick produces exactly one [`SampleResult`], whatever happened on the
//! bus. When anything fails the engine emits [`SampleResult::absent`], which
//! keeps the same shape with every field set to `None`, so publishers never
//! special-case failure.

use crate::errors::SensorError;
use crate::time::Timestamp;
use crate::units::ConvertedReading;

/// One published update
///
/// Units: temperature K, humidity %RH, pressure Pa, gas resistance Ω.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleResult {
    /// Air temperature (K)
    pub temperature: Option<f64>,
    /// Relative humidity (%)
    pub humidity: Option<f64>,
    /// Barometric pressure (Pa)
    pub pressure: Option<f64>,
    /// Gas sensor resistance (Ω)
    pub gas_resistance: Option<f64>,
    /// Air quality index, higher is worse
    pub air_quality_index: Option<i32>,
    /// Capture time (milliseconds since the clock's epoch)
    pub captured_at: Timestamp,
}

impl SampleResult {
    /// A result with every field absent
    pub const fn absent(captured_at: Timestamp) -> Self {
        Self {
            temperature: None,
            humidity: None,
            pressure: None,
            gas_resistance: None,
            air_quality_index: None,
            captured_at,
        }
    }

    /// Fallback for a failed initialization or read
    pub fn from_failure(error: &SensorError, captured_at: Timestamp) -> Self {
        log_warn!("{}; publishing absent sample", error);
        Self::absent(captured_at)
    }

    /// A result carrying a converted reading and an optional index
    pub fn from_reading(
        reading: &ConvertedReading,
        air_quality_index: Option<i32>,
        captured_at: Timestamp,
    ) -> Self {
        Self {
            temperature: Some(reading.temperature_kelvin),
            humidity: Some(reading.humidity_percent),
            pressure: Some(reading.pressure_pa),
            gas_resistance: Some(reading.gas_resistance_ohm),
            air_quality_index,
            captured_at,
        }
    }

    /// Check whether every measured field is absent
    pub fn is_absent(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.pressure.is_none()
            && self.gas_resistance.is_none()
            && self.air_quality_index.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_has_every_field_empty() {
        let result = SampleResult::absent(42);
        assert!(result.is_absent());
        assert_eq!(result.captured_at, 42);
    }

    #[test]
    fn failure_maps_to_absent() {
        let error = SensorError::ReadFailure { reason: "i2c nack" };
        assert_eq!(SampleResult::from_failure(&error, 7), SampleResult::absent(7));
    }

    #[test]
    fn reading_without_index_is_not_absent() {
        let reading = ConvertedReading {
            temperature_kelvin: 293.15,
            pressure_pa: 101_325.0,
            humidity_percent: 40.0,
            gas_resistance_ohm: 1100.0,
        };

        let result = SampleResult::from_reading(&reading, None, 0);
        assert!(!result.is_absent());
        assert_eq!(result.temperature, Some(293.15));
        assert_eq!(result.air_quality_index, None);
    }
}
