use log::{debug, info, warn};
use std::collections::HashMap;
use std::env;

const DEFAULT_COLLECTION_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Gadget identifier (uppercase hex) -> display name
    pub names: HashMap<String, String>,
    pub collection_interval_secs: u64,
}

impl SensorConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let names = match env::var("GADGET_NAMES") {
            Ok(value) => parse_gadget_names(&value),
            Err(_) => {
                debug!("GADGET_NAMES not set, gadgets will use their model names");
                HashMap::new()
            }
        };

        let collection_interval_secs =
            parse_interval(env::var("COLLECTION_INTERVAL_SECS").ok().as_deref())?;

        info!(
            "Loaded {} gadget names, collection interval {} s",
            names.len(),
            collection_interval_secs
        );
        for (id, name) in &names {
            debug!("Gadget: {} -> {}", id, name);
        }

        Ok(SensorConfig {
            names,
            collection_interval_secs,
        })
    }
}

/// Parse `ID=Name,ID=Name` pairs. Identifiers are uppercased to match the
/// decoder output; malformed pairs are skipped.
pub fn parse_gadget_names(value: &str) -> HashMap<String, String> {
    let mut names = HashMap::new();

    for pair in value.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((id, name)) => {
                let id = id.trim();
                let name = name.trim();
                if !id.is_empty() && !name.is_empty() {
                    names.insert(id.to_uppercase(), name.to_string());
                }
            }
            None => warn!("Ignoring gadget name entry without '=': '{}'", pair),
        }
    }

    names
}

fn parse_interval(value: Option<&str>) -> Result<u64, Box<dyn std::error::Error>> {
    let Some(value) = value else {
        return Ok(DEFAULT_COLLECTION_INTERVAL_SECS);
    };
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|e| format!("COLLECTION_INTERVAL_SECS '{}' is not a number: {}", value, e))?;
    if secs == 0 {
        return Err("COLLECTION_INTERVAL_SECS must be greater than zero".into());
    }
    Ok(secs)
}
