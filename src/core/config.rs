//! Logger configuration snapshot

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use super::output_target::OutputTargets;
use crate::sinks::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default queue capacity, large enough that ordinary bursts never block callers
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default location of the prefix-filtered log file
pub const DEFAULT_FILTERED_LOG_PATH: &str = "logs_allowed/allowed.log";

/// Immutable configuration of a [`Logger`](crate::Logger)
///
/// # Example
///
/// ```
/// use channel_logger::{LoggerConfig, LogLevel, OutputFormat, OutputTargets};
///
/// let config = LoggerConfig::new()
///     .with_min_level(LogLevel::Debug)
///     .with_format(OutputFormat::Structured)
///     .with_targets(OutputTargets::CONSOLE | OutputTargets::FILE)
///     .with_log_path("logs/app.log")
///     .with_allowed_prefixes(["main"]);
///
/// assert!(config.filtering_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub format: OutputFormat,
    pub targets: OutputTargets,
    /// Primary log file, written when `targets` contains `FILE`
    pub log_path: PathBuf,
    /// Caller-tag substrings selecting records for the filtered file
    pub allowed_prefixes: Vec<String>,
    pub filtered_log_path: PathBuf,
    pub queue_capacity: usize,
    /// Colorize console output by level
    pub colored: bool,
    pub rotation: RotationPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            format: OutputFormat::Plain,
            targets: OutputTargets::CONSOLE,
            log_path: PathBuf::from("logs/log.json"),
            allowed_prefixes: Vec::new(),
            filtered_log_path: PathBuf::from(DEFAULT_FILTERED_LOG_PATH),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            colored: true,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_targets(mut self, targets: OutputTargets) -> Self {
        self.targets = targets;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_allowed_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_filtered_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.filtered_log_path = path.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    /// Whether the filtered sink takes part in routing
    #[inline]
    pub fn filtering_enabled(&self) -> bool {
        !self.allowed_prefixes.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "queue_capacity must be greater than zero",
            ));
        }
        if self.targets.contains(OutputTargets::FILE) && self.log_path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "LoggerConfig",
                "log_path is required when the FILE target is enabled",
            ));
        }
        if self.filtering_enabled() && self.filtered_log_path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "LoggerConfig",
                "filtered_log_path is required when allowed_prefixes is set",
            ));
        }
        Ok(())
    }
}
