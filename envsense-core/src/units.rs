//! Unit Conversion for BME680 Readings
//!
//! The sensor driver hands back engineering units (°C, hPa). Everything the
//! engine publishes is in SI base units:
//!
//! | Quantity       | Driver unit | Published unit |
//! |----------------|-------------|----------------|
//! | Temperature    | °C          | K              |
//! | Pressure       | hPa         | Pa             |
//! | Humidity       | %RH         | %RH            |
//! | Gas resistance | Ω           | Ω              |
//!
//! Conversion is pure and infallible.
//!
//! ```rust
//! use envsense_core::units::{to_kelvin, to_pascal};
//!
//! assert_eq!(to_kelvin(0.0), 273.15);
//! assert_eq!(to_pascal(1000.0), 100_000.0);
//! ```

use crate::constants::{KELVIN_OFFSET, PA_PER_HPA};

/// Convert Celsius to Kelvin
#[inline]
pub fn to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Convert hectopascal to pascal
#[inline]
pub fn to_pascal(hpa: f64) -> f64 {
    hpa * PA_PER_HPA
}

/// One reading as produced by the sensor driver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawReading {
    /// Air temperature (°C)
    pub temperature_celsius: f64,
    /// Barometric pressure (hPa)
    pub pressure_hpa: f64,
    /// Relative humidity (%)
    pub humidity_percent: f64,
    /// Heated metal-oxide gas sensor resistance (Ω)
    pub gas_resistance_ohm: f64,
}

/// A reading in published units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvertedReading {
    /// Air temperature (K)
    pub temperature_kelvin: f64,
    /// Barometric pressure (Pa)
    pub pressure_pa: f64,
    /// Relative humidity (%)
    pub humidity_percent: f64,
    /// Gas sensor resistance (Ω)
    pub gas_resistance_ohm: f64,
}

impl RawReading {
    /// Convert to published units
    pub fn convert(&self) -> ConvertedReading {
        ConvertedReading {
            temperature_kelvin: to_kelvin(self.temperature_celsius),
            pressure_pa: to_pascal(self.pressure_hpa),
            humidity_percent: self.humidity_percent,
            gas_resistance_ohm: self.gas_resistance_ohm,
        }
    }
}

impl From<RawReading> for ConvertedReading {
    fn from(raw: RawReading) -> Self {
        raw.convert()
    }
}
