/// Per-family decoding of Sensirion gadget advertisement payloads
use std::collections::HashMap;

use crate::error::{DecodeError, Result};
use crate::measurement::{CO2_PPM, RH_PERCENTAGE, TEMP_CELSIUS};
use crate::models::{ConversionResult, Value};
use crate::registry::GadgetType;

// All sensor formulas divide by 2^16 - 1, not 2^16
const TICK_DIVISOR: f64 = 65535.0;

/// Bytes 0..4 every CO2 gadget (0x000a) payload starts with
pub const CO2_GADGET_SIGNATURE: [u8; 4] = [0x00, 0x0a, 0x00, 0x51];

/// Round `value` to `decimals` places.
///
/// Rounds half away from zero (`f64::round`), so `0.25` at one decimal
/// becomes `0.3` and `-0.25` becomes `-0.3`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

fn require_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(DecodeError::MalformedPayload {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn identifier(data: &[u8]) -> String {
    hex::encode_upper(&data[2..4])
}

fn sht_temperature(ticks: u16) -> f64 {
    -45.0 + (175.0 * ticks as f64) / TICK_DIVISOR
}

fn sht3x_humidity(ticks: u16) -> f64 {
    (100.0 * ticks as f64) / TICK_DIVISOR
}

/// Decode an SHT3x gadget payload (type 0x0004).
///
/// - Bytes 0-1: Type tag
/// - Bytes 2-3: Identifier
/// - Bytes 4-5: Temperature ticks (little-endian)
/// - Bytes 6-7: Humidity ticks (little-endian)
///
/// Both values are rounded to one decimal.
pub fn convert_sht3x(data: &[u8]) -> Result<ConversionResult> {
    require_len(data, GadgetType::Sht3x.min_len())?;

    let temp_ticks = read_u16_le(data, 4);
    let humidity_ticks = read_u16_le(data, 6);

    let readings = HashMap::from([
        (
            TEMP_CELSIUS,
            Value::Decimal(round_to(sht_temperature(temp_ticks), 1)),
        ),
        (
            RH_PERCENTAGE,
            Value::Decimal(round_to(sht3x_humidity(humidity_ticks), 1)),
        ),
    ]);

    Ok(ConversionResult {
        gadget: GadgetType::Sht3x,
        identifier: identifier(data),
        readings,
    })
}

/// Decode an SHT4x gadget payload (type 0x0006).
///
/// Same layout as the SHT3x gadget, but humidity is `-6 + 125 * t / 65535`
/// and both values keep two decimals.
pub fn convert_sht4x(data: &[u8]) -> Result<ConversionResult> {
    require_len(data, GadgetType::Sht4x.min_len())?;

    let temp_ticks = read_u16_le(data, 4);
    let humidity_ticks = read_u16_le(data, 6);
    let humidity = -6.0 + (125.0 * humidity_ticks as f64) / TICK_DIVISOR;

    let readings = HashMap::from([
        (
            TEMP_CELSIUS,
            Value::Decimal(round_to(sht_temperature(temp_ticks), 2)),
        ),
        (RH_PERCENTAGE, Value::Decimal(round_to(humidity, 2))),
    ]);

    Ok(ConversionResult {
        gadget: GadgetType::Sht4x,
        identifier: identifier(data),
        readings,
    })
}

/// Decode a MyCO2 payload (type 0x0008).
///
/// - Bytes 4-5: Temperature ticks
/// - Bytes 6-7: Humidity ticks
/// - Bytes 8-9: CO2 in ppm, transmitted as-is
///
/// The SCD4x temperature is only accurate to ±0.8°C, one decimal is plenty.
pub fn convert_myco2(data: &[u8]) -> Result<ConversionResult> {
    require_len(data, GadgetType::MyCo2.min_len())?;

    let temp_ticks = read_u16_le(data, 4);
    let humidity_ticks = read_u16_le(data, 6);
    let co2 = read_u16_le(data, 8);

    let readings = HashMap::from([
        (
            TEMP_CELSIUS,
            Value::Decimal(round_to(sht_temperature(temp_ticks), 1)),
        ),
        (
            RH_PERCENTAGE,
            Value::Decimal(round_to(sht3x_humidity(humidity_ticks), 1)),
        ),
        (CO2_PPM, Value::Integer(i64::from(co2))),
    ]);

    Ok(ConversionResult {
        gadget: GadgetType::MyCo2,
        identifier: identifier(data),
        readings,
    })
}

/// Decode a CO2 gadget payload (type 0x000a).
///
/// Unlike the other families the tag alone is not trusted: bytes 0..4 must
/// equal [`CO2_GADGET_SIGNATURE`], otherwise the payload is some other
/// format sharing the tag and [`DecodeError::FormatMismatch`] is returned.
/// Humidity is reported as a whole percent.
pub fn convert_co2_gadget(data: &[u8]) -> Result<ConversionResult> {
    require_len(data, CO2_GADGET_SIGNATURE.len())?;
    if data[0..4] != CO2_GADGET_SIGNATURE {
        return Err(DecodeError::FormatMismatch);
    }
    require_len(data, GadgetType::Co2Gadget.min_len())?;

    let temp_raw = read_u16_le(data, 4);
    let humidity_raw = read_u16_le(data, 6);
    let co2_raw = read_u16_le(data, 8);

    let temperature = (temp_raw as f64 * 175.0 / TICK_DIVISOR) - 45.0;
    let humidity = (humidity_raw as f64 * 100.0 / TICK_DIVISOR).round() as i64;

    let readings = HashMap::from([
        (TEMP_CELSIUS, Value::Decimal(round_to(temperature, 1))),
        (RH_PERCENTAGE, Value::Integer(humidity)),
        (CO2_PPM, Value::Integer(i64::from(co2_raw))),
    ]);

    Ok(ConversionResult {
        gadget: GadgetType::Co2Gadget,
        identifier: identifier(data),
        readings,
    })
}
