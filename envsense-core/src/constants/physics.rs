//! Physical Conversion Constants
//!
//! The BME680 driver reports Celsius and hectopascal; published values use
//! SI base units.

/// Offset between Celsius and Kelvin.
///
/// Source: NIST Special Publication 330 (2019)
pub const KELVIN_OFFSET: f64 = 273.15;

/// Pascal per hectopascal.
pub const PA_PER_HPA: f64 = 100.0;
