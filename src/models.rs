use std::collections::HashMap;
use std::fmt;

use crate::measurement::MeasurementKey;
use crate::registry::GadgetType;

/// A single decoded number.
///
/// Rounded temperature and humidity readings are `Decimal`; the CO2
/// pass-through and the integer-percent humidity of the CO2 gadget are
/// `Integer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Decimal(f64),
    Integer(i64),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Decimal(v) => v,
            Value::Integer(v) => v as f64,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
        }
    }
}

/// Output of a successful decode. Always complete: every key the gadget
/// family reports is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub gadget: GadgetType,
    /// Uppercase hex of payload bytes 2..4. Set by the gadget firmware, not a
    /// device address and not guaranteed unique.
    pub identifier: String,
    pub readings: HashMap<MeasurementKey, Value>,
}

impl ConversionResult {
    pub fn get(&self, key: &MeasurementKey) -> Option<Value> {
        self.readings.get(key).copied()
    }

    /// Name a host would display for the gadget, e.g. `MyCO2 ABCD`.
    pub fn device_name(&self) -> String {
        format!("{} {}", self.gadget.model_name(), self.identifier)
    }
}
