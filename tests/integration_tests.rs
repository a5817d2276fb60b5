//! Integration tests for the logger pipeline
//!
//! These tests verify:
//! - File output through the worker, including the prefix-filtered file
//! - Structured lines that decode back to their records
//! - Drain on close and post-close behaviour
//! - Rotation driven by real log traffic
//! - Best-effort sink construction

use channel_logger::prelude::*;
use channel_logger::{info, warn};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

mod payments {
    use channel_logger::Logger;

    pub fn charge(logger: &Logger, amount: u32) {
        channel_logger::info!(logger, "charged {} cents", amount);
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_primary_and_filtered_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let primary = temp_dir.path().join("logs").join("app.log");
    let filtered = temp_dir.path().join("allowed").join("allowed.log");

    let config = LoggerConfig::new()
        .with_min_level(LogLevel::Debug)
        .with_targets(OutputTargets::FILE)
        .with_log_path(&primary)
        .with_allowed_prefixes(["payments"])
        .with_filtered_log_path(&filtered)
        .with_colors(false);
    let logger = Logger::new(config).expect("Failed to build logger");

    logger.debug("booting");
    payments::charge(&logger, 250);
    warn!(logger, "slow request: {} ms", 1200);
    logger.close();

    let primary_lines = read_lines(&primary);
    assert_eq!(primary_lines.len(), 3);
    assert!(primary_lines[0].starts_with("[DEBUG] "));
    assert!(primary_lines[0].contains("integration_tests.rs:"));
    assert!(primary_lines[1].contains("integration_tests.payments charged 250 cents"));
    assert!(primary_lines[2].starts_with("[WARN] "));

    let filtered_lines = read_lines(&filtered);
    assert_eq!(filtered_lines, vec![primary_lines[1].clone()]);
}

#[test]
fn test_structured_file_lines_decode() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("structured.log");

    let logger = Logger::builder()
        .config(
            LoggerConfig::new()
                .with_format(OutputFormat::Structured)
                .with_targets(OutputTargets::FILE)
                .with_log_path(&log_file),
        )
        .caller_resolver(FixedCallerResolver::new("logger.handler"))
        .build()
        .expect("Failed to build logger");

    let tricky = "quote \" backslash \\ newline \n tab \t done";
    logger.info(tricky);
    logger.error("plain failure");
    logger.close();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 2, "embedded newlines must stay escaped");

    let first = StructuredLine::parse(&lines[0]).expect("valid JSON line");
    assert_eq!(first.level().unwrap(), LogLevel::Info);
    assert_eq!(first.caller, "logger.handler");
    assert_eq!(first.message, tricky);
    assert!(first.timestamp().is_ok());

    let second = StructuredLine::parse(&lines[1]).expect("valid JSON line");
    assert_eq!(second.level().unwrap(), LogLevel::Error);
}

#[test]
fn test_console_filtered_scenario() {
    let console = MemorySink::new("console");
    let primary = MemorySink::new("primary");
    let filtered = MemorySink::new("filtered");

    let logger = Logger::builder()
        .config(
            LoggerConfig::new()
                .with_min_level(LogLevel::Debug)
                .with_targets(OutputTargets::CONSOLE)
                .with_allowed_prefixes(["logger"])
                .with_colors(false),
        )
        .sink(SinkId::Console, console.clone())
        .sink(SinkId::PrimaryFile, primary.clone())
        .sink(SinkId::FilteredFile, filtered.clone())
        .caller_resolver(FixedCallerResolver::new("logger.X"))
        .build()
        .unwrap();

    for level in LogLevel::ALL {
        logger.log(level, format!("{} msg", level));
    }
    logger.close();

    assert_eq!(console.lines().len(), 4);
    assert_eq!(filtered.lines().len(), 4);
    assert_eq!(primary.lines().len(), 0);
}

#[test]
fn test_min_level_warn_scenario() {
    let console = MemorySink::new("console");
    let logger = Logger::builder()
        .config(LoggerConfig::new().with_min_level(LogLevel::Warn))
        .sink(SinkId::Console, console.clone())
        .build()
        .unwrap();

    logger.debug("nope");
    info!(logger, "nope {}", 2);
    logger.close();

    assert!(console.contents().is_empty());
    assert_eq!(logger.metrics().records_filtered(), 2);
}

#[test]
fn test_unroutable_record_is_processed_but_not_written() {
    let filtered = MemorySink::new("filtered");
    let logger = Logger::builder()
        .config(
            LoggerConfig::new()
                .with_targets(OutputTargets::NONE)
                .with_allowed_prefixes(["logger"]),
        )
        .sink(SinkId::FilteredFile, filtered.clone())
        .caller_resolver(FixedCallerResolver::new("mainpkg.run"))
        .build()
        .unwrap();

    logger.info("goes nowhere");
    logger.close();

    assert!(filtered.contents().is_empty());
    assert_eq!(logger.metrics().records_written(), 1);
}

#[test]
fn test_close_drains_everything() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("drain.log");

    let logger = Logger::new(
        LoggerConfig::new()
            .with_targets(OutputTargets::FILE)
            .with_log_path(&log_file)
            .with_queue_capacity(8),
    )
    .unwrap();

    for i in 0..500 {
        logger.info(format!("Message {}", i));
    }
    logger.close();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 500);
    assert!(lines[499].ends_with("Message 499"));
    assert_eq!(logger.state(), LoggerState::Closed);

    assert!(matches!(
        logger.try_log(LogLevel::Error, "after close"),
        Err(LoggerError::LoggerClosed)
    ));
    assert_eq!(read_lines(&log_file).len(), 500);
}

#[test]
fn test_rotation_under_traffic() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("rotating.log");

    let rotation = RotationPolicy::never()
        .with_max_size(512)
        .with_max_backups(2)
        .with_compression(false);

    let logger = Logger::builder()
        .config(
            LoggerConfig::new()
                .with_targets(OutputTargets::FILE)
                .with_log_path(&log_file)
                .with_rotation(rotation),
        )
        .caller_resolver(FixedCallerResolver::new("logger.rotate"))
        .build()
        .unwrap();

    for i in 0..100 {
        logger.info(format!("rotation payload line {:03}", i));
    }
    logger.close();

    let current = fs::metadata(&log_file).unwrap().len();
    assert!(current <= 512);
    assert!(temp_dir.path().join("rotating.log.1").exists());
    assert!(temp_dir.path().join("rotating.log.2").exists());
    assert!(!temp_dir.path().join("rotating.log.3").exists());

    let last = read_lines(&log_file);
    assert!(last.last().unwrap().ends_with("rotation payload line 099"));
}

#[test]
fn test_unopenable_file_sink_is_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, b"occupied").unwrap();

    let console = MemorySink::new("console");
    let logger = Logger::builder()
        .config(
            LoggerConfig::new()
                .with_targets(OutputTargets::ALL)
                .with_log_path(blocker.join("app.log"))
                .with_colors(false),
        )
        .sink(SinkId::Console, console.clone())
        .build()
        .expect("sink failures must not fail the build");

    logger.info("still reaches the console");
    logger.close();

    assert_eq!(console.lines().len(), 1);
    assert_eq!(logger.metrics().sink_failures(), 0);
}

#[test]
fn test_config_from_json_drives_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("from_json.log");
    let json = format!(
        r#"{{"min_level":"WARN","format":"Structured","targets":2,"log_path":{}}}"#,
        serde_json::to_string(&log_file).unwrap()
    );

    let logger = Logger::new(LoggerConfig::from_json(&json).unwrap()).unwrap();
    logger.info("filtered");
    logger.warn("kept");
    logger.close();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    let parsed = StructuredLine::parse(&lines[0]).unwrap();
    assert_eq!(parsed.level, "WARN");
    assert_eq!(parsed.message, "kept");
}

#[test]
fn test_recover_reaches_file_before_close() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("panic.log");

    let logger = Logger::new(
        LoggerConfig::new()
            .with_targets(OutputTargets::FILE)
            .with_log_path(&log_file),
    )
    .unwrap();

    let result = logger.recover(|| {
        let values: Vec<u32> = Vec::new();
        values[3]
    });
    assert!(result.is_none());

    let content = fs::read_to_string(&log_file).unwrap();
    assert!(content.starts_with("[ERROR] "));
    assert!(content.contains("Panic recovered: index out of bounds"));
    logger.close();
}
