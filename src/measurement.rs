/// Measurement keys shared by every decoder output
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorClass {
    Temperature,
    Humidity,
    Co2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unit {
    Celsius,
    Percent,
    PartsPerMillion,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Percent => "%",
            Unit::PartsPerMillion => "ppm",
        }
    }
}

/// What a decoded number represents: a sensor class paired with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeasurementKey {
    pub class: SensorClass,
    pub unit: Unit,
}

pub const TEMP_CELSIUS: MeasurementKey = MeasurementKey {
    class: SensorClass::Temperature,
    unit: Unit::Celsius,
};

pub const RH_PERCENTAGE: MeasurementKey = MeasurementKey {
    class: SensorClass::Humidity,
    unit: Unit::Percent,
};

pub const CO2_PPM: MeasurementKey = MeasurementKey {
    class: SensorClass::Co2,
    unit: Unit::PartsPerMillion,
};

impl fmt::Display for SensorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorClass::Temperature => "temperature",
            SensorClass::Humidity => "humidity",
            SensorClass::Co2 => "CO2",
        };
        f.write_str(name)
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.class, self.unit.symbol())
    }
}
