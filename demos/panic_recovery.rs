//! Panic recovery example
//!
//! Uses the global logger and turns panics in units of work into ERROR
//! records that are written before `recover` returns.
//!
//! Run with: cargo run --example panic_recovery

use channel_logger::prelude::*;
use std::thread;

fn parse_port(raw: &str) -> u16 {
    raw.parse().unwrap_or_else(|_| panic!("invalid port '{}'", raw))
}

fn main() -> Result<()> {
    println!("=== Channel Logger - Panic Recovery Example ===\n");

    // Silence the default hook; the logger reports the panic instead.
    std::panic::set_hook(Box::new(|_| {}));

    let logger = init(LoggerConfig::new().with_min_level(LogLevel::Debug))?;

    println!("1. A unit of work that succeeds:");
    let port = recover(|| parse_port("8080"));
    logger.info(format!("configured port: {:?}", port));

    println!("\n2. A unit of work that panics:");
    let port = recover(|| parse_port("eighty"));
    logger.warn(format!("falling back, recovered value was {:?}", port));

    println!("\n3. Panics on worker threads:");
    let handles: Vec<_> = (0..3)
        .map(|id| {
            thread::spawn(move || {
                global().recover(|| {
                    if id == 1 {
                        panic!("worker {} lost its connection", id);
                    }
                    global().info(format!("worker {} finished", id));
                });
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    println!("\npanics recovered: {}", logger.metrics().panics_recovered());

    // The global logger is never dropped; close it to drain the queue.
    global().close();

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
