/// Utility functions for replay input parsing, averaging and formatting
use std::collections::{BTreeMap, HashMap};
use time::{format_description, OffsetDateTime};

use sensirion_ble::{ConversionResult, MeasurementKey};

use crate::config::SensorConfig;

#[derive(Debug, Clone)]
pub struct AverageData {
    pub readings: BTreeMap<MeasurementKey, f64>,
    pub time: OffsetDateTime,
    pub name: String,
    pub samples: usize,
}

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    match format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]") {
        Ok(format) => dt.format(&format).unwrap_or_else(|_| dt.to_string()),
        Err(_) => dt.to_string(),
    }
}

/// Parse one line of replay input into payload bytes.
///
/// Returns `None` for blank lines and `#` comments. Whitespace and `:`
/// separators between hex digits are ignored.
pub fn parse_payload_line(line: &str) -> Option<Result<Vec<u8>, hex::FromHexError>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let digits: String = line
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    Some(hex::decode(digits))
}

/// Calculate average values from collected gadget readings
///
/// Every measurement key seen for a gadget is averaged over the samples that
/// carried it and rounded to two decimals.
///
/// # Arguments
/// * `measurements` - HashMap mapping gadget identifiers to decoded results
/// * `config` - Configuration containing gadget name mappings
///
/// # Returns
/// HashMap mapping gadget identifiers to calculated averages
pub fn calculate_averages(
    measurements: &HashMap<String, Vec<ConversionResult>>,
    config: &SensorConfig,
) -> HashMap<String, AverageData> {
    let mut averages = HashMap::new();

    for (gadget_id, results) in measurements {
        // Skip gadgets with no data
        let Some(first) = results.first() else {
            continue;
        };

        let mut sums: BTreeMap<MeasurementKey, (f64, usize)> = BTreeMap::new();
        for result in results {
            for (key, value) in &result.readings {
                let entry = sums.entry(*key).or_insert((0.0, 0));
                entry.0 += value.as_f64();
                entry.1 += 1;
            }
        }

        let readings = sums
            .into_iter()
            .map(|(key, (sum, count))| {
                (key, (sum / count as f64 * 100.0).round() / 100.0) // 2 decimal places
            })
            .collect();

        let avg_data = AverageData {
            readings,
            time: OffsetDateTime::now_utc(),
            name: config
                .names
                .get(gadget_id)
                .cloned()
                .unwrap_or_else(|| first.device_name()),
            samples: results.len(),
        };

        averages.insert(gadget_id.clone(), avg_data);
    }

    averages
}
