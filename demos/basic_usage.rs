//! Basic logger usage example
//!
//! Logs at every level to the console, then shows the level filter and the
//! macros.
//!
//! Run with: cargo run --example basic_usage

use channel_logger::prelude::*;
use channel_logger::{debug, info};

mod billing {
    use channel_logger::Logger;

    pub fn settle(logger: &Logger, invoice: u32) {
        channel_logger::info!(logger, "settled invoice #{}", invoice);
    }
}

fn main() -> Result<()> {
    println!("=== Channel Logger - Basic Usage Example ===\n");

    let logger = Logger::new(LoggerConfig::new().with_min_level(LogLevel::Debug))?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("2. Formatting with macros (the caller tag includes the module):");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    debug!(logger, "{} workers ready", 4);
    billing::settle(&logger, 1042);

    // Everything queued so far is written before close returns.
    logger.close();

    println!("\n3. A logger with minimum level WARN:");
    let quiet = Logger::new(LoggerConfig::new().with_min_level(LogLevel::Warn))?;
    quiet.debug("Debug message (hidden)");
    quiet.info("Info message (hidden)");
    quiet.warn("Warning message (visible)");
    quiet.close();

    println!(
        "   filtered: {}, written: {}",
        quiet.metrics().records_filtered(),
        quiet.metrics().records_written()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
