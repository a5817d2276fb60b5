//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};

/// One log call, captured on the producer's thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub caller: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>, caller: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            caller: caller.into(),
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
