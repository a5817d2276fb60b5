//! Output format for log records
//!
//! - Plain: `[INFO] 2025-01-08 10:30:45 main.rs:12 app Request processed`
//! - Structured: one JSON object per line

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::record::LogRecord;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

const PLAIN_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text line (default)
    #[default]
    Plain,

    /// JSON line with `level`, `time`, `caller` and `message`
    Structured,
}

impl OutputFormat {
    /// Render a record as a complete, newline-terminated line
    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            OutputFormat::Plain => format!(
                "[{}] {} {} {}\n",
                record.level.to_str(),
                record.timestamp.format(PLAIN_TIMESTAMP),
                record.caller,
                record.message
            ),
            OutputFormat::Structured => {
                let mut line = StructuredLine::from_record(record).to_json();
                line.push('\n');
                line
            }
        }
    }
}

/// Wire shape of a Structured line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredLine {
    pub level: String,
    /// RFC 3339, second precision
    pub time: String,
    pub caller: String,
    pub message: String,
}

impl StructuredLine {
    pub fn from_record(record: &LogRecord) -> Self {
        Self {
            level: record.level.to_str().to_string(),
            time: record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            caller: record.caller.clone(),
            message: record.message.clone(),
        }
    }

    fn to_json(&self) -> String {
        // Only string fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode one Structured line (the trailing newline is optional)
    pub fn parse(line: &str) -> Result<Self> {
        let parsed: StructuredLine = serde_json::from_str(line.trim_end_matches('\n'))?;
        Ok(parsed)
    }

    pub fn level(&self) -> Result<LogLevel> {
        self.level.parse().map_err(LoggerError::malformed)
    }

    pub fn timestamp(&self) -> Result<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.time)
            .map_err(|e| LoggerError::malformed(format!("bad time '{}': {}", self.time, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn sample(level: LogLevel, message: &str) -> LogRecord {
        let ts = Local.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
        LogRecord::new(level, message, "main.rs:12 app").with_timestamp(ts)
    }

    #[test]
    fn test_plain_format() {
        let line = OutputFormat::Plain.format(&sample(LogLevel::Info, "Request processed"));
        assert_eq!(line, "[INFO] 2025-01-08 10:30:45 main.rs:12 app Request processed\n");
    }

    #[test]
    fn test_structured_format() {
        let line = OutputFormat::Structured.format(&sample(LogLevel::Error, "Error occurred"));
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["message"], "Error occurred");
        assert_eq!(parsed["caller"], "main.rs:12 app");
        assert!(parsed["time"].as_str().unwrap().starts_with("2025-01-08T10:30:45"));
    }

    #[test]
    fn test_structured_escapes_multiline_messages() {
        let line = OutputFormat::Structured.format(&sample(LogLevel::Warn, "first\nsecond \"quoted\""));
        assert_eq!(line.matches('\n').count(), 1);

        let decoded = StructuredLine::parse(&line).unwrap();
        assert_eq!(decoded.message, "first\nsecond \"quoted\"");
    }

    #[test]
    fn test_structured_decode_recovers_fields() {
        let record = sample(LogLevel::Debug, "payload");
        let decoded = StructuredLine::parse(&OutputFormat::Structured.format(&record)).unwrap();

        assert_eq!(decoded.level().unwrap(), LogLevel::Debug);
        assert_eq!(decoded.caller, record.caller);
        assert_eq!(decoded.message, record.message);
        assert_eq!(decoded.timestamp().unwrap().timestamp(), record.timestamp.timestamp());
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(StructuredLine::parse("[INFO] not json").is_err());

        let bad_level = StructuredLine {
            level: "LOUD".into(),
            time: "nonsense".into(),
            caller: String::new(),
            message: String::new(),
        };
        assert!(matches!(bad_level.level(), Err(LoggerError::MalformedLine(_))));
        assert!(matches!(bad_level.timestamp(), Err(LoggerError::MalformedLine(_))));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }
}
