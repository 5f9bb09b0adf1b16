/// Dispatch from the 2-byte gadget type tag to the matching decoder
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt;

use crate::converters::{convert_co2_gadget, convert_myco2, convert_sht3x, convert_sht4x};
use crate::error::{DecodeError, Result};
use crate::models::ConversionResult;

/// Bluetooth SIG company identifier of Sensirion AG
pub const SENSIRION_MANUFACTURER_ID: u16 = 0x06D5;

/// Gadget families this crate can decode, one per type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GadgetType {
    /// Tag 0x0004
    Sht3x,
    /// Tag 0x0006
    Sht4x,
    /// Tag 0x0008
    MyCo2,
    /// Tag 0x000a
    Co2Gadget,
}

impl GadgetType {
    pub const ALL: [GadgetType; 4] = [
        GadgetType::Sht3x,
        GadgetType::Sht4x,
        GadgetType::MyCo2,
        GadgetType::Co2Gadget,
    ];

    /// Exact match on the whole 2-byte tag.
    pub fn from_tag(tag: [u8; 2]) -> Option<Self> {
        match tag {
            [0x00, 0x04] => Some(GadgetType::Sht3x),
            [0x00, 0x06] => Some(GadgetType::Sht4x),
            [0x00, 0x08] => Some(GadgetType::MyCo2),
            [0x00, 0x0a] => Some(GadgetType::Co2Gadget),
            _ => None,
        }
    }

    pub fn tag(&self) -> [u8; 2] {
        match self {
            GadgetType::Sht3x => [0x00, 0x04],
            GadgetType::Sht4x => [0x00, 0x06],
            GadgetType::MyCo2 => [0x00, 0x08],
            GadgetType::Co2Gadget => [0x00, 0x0a],
        }
    }

    /// Shortest payload, tag included, the family's decoder accepts.
    pub fn min_len(&self) -> usize {
        match self {
            GadgetType::Sht3x | GadgetType::Sht4x => 8,
            GadgetType::MyCo2 | GadgetType::Co2Gadget => 10,
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            GadgetType::Sht3x => "SHT3x Gadget",
            GadgetType::Sht4x => "SHT4x Gadget",
            GadgetType::MyCo2 => "MyCO2",
            GadgetType::Co2Gadget => "CO2 Gadget",
        }
    }

    /// Run this family's decoder over the full payload.
    pub fn decode(&self, payload: &[u8]) -> Result<ConversionResult> {
        match self {
            GadgetType::Sht3x => convert_sht3x(payload),
            GadgetType::Sht4x => convert_sht4x(payload),
            GadgetType::MyCo2 => convert_myco2(payload),
            GadgetType::Co2Gadget => convert_co2_gadget(payload),
        }
    }
}

impl fmt::Display for GadgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{})", self.model_name(), hex::encode(self.tag()))
    }
}

/// Decode a Sensirion manufacturer-data payload.
///
/// The first two bytes select the gadget family; the whole payload, tag
/// included, is handed to that family's decoder.
///
/// # Errors
/// * [`DecodeError::MalformedPayload`] if the payload is shorter than the tag
///   or than the family's fields
/// * [`DecodeError::UnknownGadgetType`] if no family uses the tag
/// * [`DecodeError::FormatMismatch`] if a 0x000a payload lacks the CO2 gadget
///   signature
pub fn decode(payload: &[u8]) -> Result<ConversionResult> {
    let tag = match payload {
        [first, second, ..] => [*first, *second],
        _ => {
            return Err(DecodeError::MalformedPayload {
                expected: 2,
                actual: payload.len(),
            })
        }
    };

    let gadget = match GadgetType::from_tag(tag) {
        Some(gadget) => gadget,
        None => {
            trace!("No decoder for gadget type 0x{}", hex::encode(tag));
            return Err(DecodeError::UnknownGadgetType(tag));
        }
    };

    let result = gadget.decode(payload);
    if let Err(e) = &result {
        debug!("Failed to decode {} payload: {}", gadget, e);
    }
    result
}

/// Pick the Sensirion entry out of an advertisement's manufacturer data and
/// decode it.
///
/// Returns `None` when the advertisement carries no Sensirion data at all.
pub fn decode_manufacturer_data(
    manufacturer_data: &HashMap<u16, Vec<u8>>,
) -> Option<Result<ConversionResult>> {
    manufacturer_data
        .get(&SENSIRION_MANUFACTURER_ID)
        .map(|payload| decode(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{CO2_PPM, RH_PERCENTAGE, TEMP_CELSIUS};
    use crate::models::Value;

    #[test]
    fn tags_round_trip_through_lookup() {
        for gadget in GadgetType::ALL {
            assert_eq!(GadgetType::from_tag(gadget.tag()), Some(gadget));
        }
    }

    #[test]
    fn minimal_zero_payloads_decode_for_every_family() {
        for gadget in GadgetType::ALL {
            let mut payload = vec![0u8; gadget.min_len()];
            payload[..2].copy_from_slice(&gadget.tag());
            if gadget == GadgetType::Co2Gadget {
                payload[2..4].copy_from_slice(&[0x00, 0x51]);
            }
            let result = decode(&payload).unwrap();
            assert_eq!(result.gadget, gadget);
            assert_eq!(result.get(&TEMP_CELSIUS).map(|v| v.as_f64()), Some(-45.0));
            assert!(result.get(&RH_PERCENTAGE).is_some());
        }
    }

    #[test]
    fn reference_sht3x_payload() {
        let result = decode(&[0x00, 0x04, 0xAB, 0xCD, 0x00, 0x00, 0xFF, 0xFF]).unwrap();
        assert_eq!(result.gadget, GadgetType::Sht3x);
        assert_eq!(result.identifier, "ABCD");
        assert_eq!(result.get(&TEMP_CELSIUS), Some(Value::Decimal(-45.0)));
        assert_eq!(result.get(&RH_PERCENTAGE), Some(Value::Decimal(100.0)));
        assert_eq!(result.get(&CO2_PPM), None);
        assert_eq!(result.device_name(), "SHT3x Gadget ABCD");
    }

    #[test]
    fn reference_co2_gadget_payload() {
        let result =
            decode(&[0x00, 0x0A, 0x00, 0x51, 0x00, 0x80, 0x40, 0x00, 0x10, 0x27]).unwrap();
        assert_eq!(result.gadget, GadgetType::Co2Gadget);
        assert_eq!(result.get(&TEMP_CELSIUS), Some(Value::Decimal(42.5)));
        assert_eq!(result.get(&RH_PERCENTAGE), Some(Value::Integer(0)));
        assert_eq!(result.get(&CO2_PPM), Some(Value::Integer(10000)));
    }

    #[test]
    fn decoding_is_deterministic() {
        let payload = [0x00, 0x08, 0x0F, 0xA0, 0x34, 0x12, 0x78, 0x56, 0xE8, 0x03];
        assert_eq!(decode(&payload), decode(&payload));
    }

    #[test]
    fn unknown_tag_is_reported() {
        assert_eq!(
            decode(&[0x00, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(DecodeError::UnknownGadgetType([0x00, 0xFF]))
        );
        // No prefix matching: 0x0400 is not 0x0004
        assert_eq!(
            decode(&[0x04, 0x00, 0, 0, 0, 0, 0, 0]),
            Err(DecodeError::UnknownGadgetType([0x04, 0x00]))
        );
    }

    #[test]
    fn too_short_for_tag_is_malformed() {
        assert_eq!(
            decode(&[]),
            Err(DecodeError::MalformedPayload {
                expected: 2,
                actual: 0
            })
        );
        assert_eq!(
            decode(&[0x00]),
            Err(DecodeError::MalformedPayload {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn truncated_family_payload_is_malformed() {
        assert_eq!(
            decode(&[0x00, 0x08, 0, 0, 0, 0]),
            Err(DecodeError::MalformedPayload {
                expected: 10,
                actual: 6
            })
        );
        assert_eq!(
            decode(&[0x00, 0x04, 0, 0, 0, 0, 0]),
            Err(DecodeError::MalformedPayload {
                expected: 8,
                actual: 7
            })
        );
    }

    #[test]
    fn co2_gadget_tag_without_signature_is_a_mismatch() {
        assert_eq!(
            decode(&[0x00, 0x0A, 0xFF, 0xFF, 0, 0, 0, 0, 0, 0]),
            Err(DecodeError::FormatMismatch)
        );
    }

    #[test]
    fn manufacturer_data_is_filtered_by_company_id() {
        let mut data = HashMap::new();
        data.insert(0x0499u16, vec![0x05, 0x00]);
        assert!(decode_manufacturer_data(&data).is_none());

        data.insert(
            SENSIRION_MANUFACTURER_ID,
            vec![0x00, 0x06, 0x01, 0x02, 0, 0, 0, 0],
        );
        let result = decode_manufacturer_data(&data).unwrap().unwrap();
        assert_eq!(result.gadget, GadgetType::Sht4x);
        assert_eq!(result.identifier, "0102");
    }

    #[test]
    fn display_names_tag() {
        assert_eq!(GadgetType::Co2Gadget.to_string(), "CO2 Gadget (0x000a)");
    }
}
