//! File logging example
//!
//! Sends records to the console and a rotating JSON file at the same time,
//! and copies records from the `storage` module into a second file.
//!
//! Run with: cargo run --example file_logging

use channel_logger::prelude::*;

mod storage {
    use channel_logger::Logger;

    pub fn open(logger: &Logger, path: &str) {
        channel_logger::info!(logger, "opened volume {}", path);
        channel_logger::warn!(logger, "volume {} is 91% full", path);
    }
}

fn main() -> Result<()> {
    println!("=== Channel Logger - File Logging Example ===\n");

    let config = LoggerConfig::new()
        .with_min_level(LogLevel::Debug)
        .with_format(OutputFormat::Structured)
        .with_targets(OutputTargets::CONSOLE | OutputTargets::FILE)
        .with_log_path("logs/application.json")
        .with_allowed_prefixes(["storage"])
        .with_filtered_log_path("logs_allowed/storage.log")
        .with_rotation(RotationPolicy::new().with_max_size(1024 * 1024).with_max_backups(3));

    let logger = Logger::new(config)?;

    println!("1. Logging to both console and file:");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.warn("Using default settings for some options");

    println!("\n2. Records from the storage module also go to the filtered file:");
    storage::open(&logger, "/var/data");

    for i in 1..=5 {
        logger.info(format!("Processing item {}/5", i));
    }
    logger.error("Failed to load optional plugin");

    logger.close();

    let metrics = logger.metrics();
    println!(
        "\nwritten: {}, sink failures: {}",
        metrics.records_written(),
        metrics.sink_failures()
    );
    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/application.json' and 'logs_allowed/storage.log'");

    Ok(())
}
