mod config;
mod utils;

use log::{debug, error, info, warn};
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration, MissedTickBehavior};

use config::SensorConfig;
use sensirion_ble::{decode, ConversionResult, DecodeError};
use utils::{calculate_averages, format_datetime, parse_payload_line};

/// Decode one input line and file the result under its gadget identifier
fn ingest_line(line: &str, measurements: &mut HashMap<String, Vec<ConversionResult>>) {
    let payload = match parse_payload_line(line) {
        None => return,
        Some(Ok(payload)) => payload,
        Some(Err(e)) => {
            warn!("Skipping line that is not hex ({}): '{}'", e, line.trim());
            return;
        }
    };

    match decode(&payload) {
        Ok(result) => {
            debug!(
                "Received data from {}: {}",
                result.device_name(),
                result
                    .readings
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, value))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            measurements
                .entry(result.identifier.clone())
                .or_insert_with(Vec::new)
                .push(result);
        }
        // Other gadget generations are expected in the stream
        Err(e @ DecodeError::UnknownGadgetType(_)) => debug!("{}", e),
        Err(e) => warn!("Dropping payload {}: {}", hex::encode(&payload), e),
    }
}

fn report_interval(
    measurements: &mut HashMap<String, Vec<ConversionResult>>,
    config: &SensorConfig,
) {
    let end_time = OffsetDateTime::now_utc();
    info!(
        "Collection interval complete at: {}",
        format_datetime(&end_time)
    );

    let averages = calculate_averages(measurements, config);
    measurements.clear();

    // Warning if no data collected
    if averages.is_empty() {
        warn!("No data collected during this interval!");
        return;
    }

    for (gadget_id, avg_data) in averages.iter() {
        info!("Summary for {} ({}):", avg_data.name, gadget_id);
        for (key, value) in &avg_data.readings {
            info!("  Average {}: {:.2} {}", key.class, value, key.unit.symbol());
        }
        info!(
            "  Based on {} samples, at {}",
            avg_data.samples,
            format_datetime(&avg_data.time)
        );
    }
}

async fn main_loop(config: SensorConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Sensirion gadget replay from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut measurements: HashMap<String, Vec<ConversionResult>> = HashMap::new();

    let mut ticker = interval(Duration::from_secs(config.collection_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    info!(
        "Starting collection interval at: {}",
        format_datetime(&OffsetDateTime::now_utc())
    );

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => ingest_line(&line, &mut measurements),
                    None => {
                        info!("Input closed");
                        report_interval(&mut measurements, &config);
                        return Ok(());
                    }
                }
            }
            _ = ticker.tick() => {
                report_interval(&mut measurements, &config);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match SensorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                // Keep the sender alive so shutdown is only driven by the loop
                std::future::pending::<()>().await;
                drop(tx);
            }
        }
    });

    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
