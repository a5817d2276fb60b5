//! Core logger types and traits

pub mod caller;
pub mod config;
pub mod error;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod output_target;
pub mod record;
mod recovery;
pub mod router;
pub mod sink;
pub mod sink_set;

pub use caller::{CallSite, CallerResolver, FixedCallerResolver, ShortCallerResolver};
pub use config::{LoggerConfig, DEFAULT_FILTERED_LOG_PATH, DEFAULT_QUEUE_CAPACITY};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, LoggerState};
pub use metrics::LoggerMetrics;
pub use output_format::{OutputFormat, StructuredLine};
pub use output_target::OutputTargets;
pub use record::LogRecord;
pub use router::{Route, SinkId};
pub use sink::Sink;
pub use sink_set::SinkSet;
