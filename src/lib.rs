//! # Channel Logger
//!
//! An in-process logger that keeps I/O off the calling thread. Log calls
//! build a record and push it onto a bounded queue; a single worker thread
//! formats each record and writes it to the outputs it is routed to.
//!
//! ## Features
//!
//! - **Level filtering** before any work is done on the caller's thread
//! - **Plain or structured (JSON) lines**, one per record
//! - **Routing** to the console, a primary rotating file, and a second file
//!   that only receives records whose caller matches an allowed prefix
//! - **Drain on close**: every record accepted before `close()` is written
//! - **Panic recovery** that writes an ERROR record synchronously
//!
//! ## Example
//!
//! ```no_run
//! use channel_logger::prelude::*;
//!
//! let config = LoggerConfig::new()
//!     .with_min_level(LogLevel::Debug)
//!     .with_targets(OutputTargets::CONSOLE | OutputTargets::FILE)
//!     .with_log_path("logs/app.log");
//!
//! let logger = Logger::new(config).unwrap();
//! logger.info("service started");
//! channel_logger::warn!(logger, "queue depth {}", 17);
//! logger.close();
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallSite, CallerResolver, FixedCallerResolver, LogLevel, LogRecord, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerState, OutputFormat,
        OutputTargets, Result, ShortCallerResolver, Sink, SinkId, StructuredLine,
    };
    pub use crate::global::{global, init, recover};
    pub use crate::sinks::{ConsoleSink, MemorySink, RotatingFileSink, RotationPolicy};
}

pub use crate::core::{
    CallSite, CallerResolver, FixedCallerResolver, LogLevel, LogRecord, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, LoggerState, OutputFormat, OutputTargets, Result,
    Route, ShortCallerResolver, Sink, SinkId, StructuredLine,
};
pub use global::{global, init, init_with, recover, try_global};
