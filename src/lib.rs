//! Decoder for Sensirion gadget BLE advertisements.
//!
//! Turns the manufacturer-specific data of an advertisement into typed
//! temperature, humidity and CO2 readings. Discovery and transport of the
//! advertisements are left to the caller.

pub mod converters;
pub mod error;
pub mod measurement;
pub mod models;
pub mod registry;

pub use error::{DecodeError, Result};
pub use measurement::{
    MeasurementKey, SensorClass, Unit, CO2_PPM, RH_PERCENTAGE, TEMP_CELSIUS,
};
pub use models::{ConversionResult, Value};
pub use registry::{decode, decode_manufacturer_data, GadgetType, SENSIRION_MANUFACTURER_ID};
