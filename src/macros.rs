//! Logging macros with `format!`-style arguments.
//!
//! The macros check the level filter before formatting, so a filtered call
//! costs one comparison. The caller tag comes from the macro's expansion site
//! and includes the calling module.
//!
//! # Examples
//!
//! ```
//! use channel_logger::prelude::*;
//! use channel_logger::info;
//!
//! let console = MemorySink::new("console");
//! let logger = Logger::builder()
//!     .config(LoggerConfig::new().with_colors(false))
//!     .sink(SinkId::Console, console.clone())
//!     .build()
//!     .unwrap();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! logger.close();
//! assert!(console.contents().contains("Server listening on port 8080"));
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use channel_logger::prelude::*;
/// # let logger = Logger::builder().sink(SinkId::Console, MemorySink::new("c")).build().unwrap();
/// use channel_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log_at(
                level,
                format!($($arg)+),
                $crate::CallSite::new(file!(), line!(), module_path!()),
            );
        } else {
            logger.metrics().record_filtered();
        }
    }};
}

/// Log a debug-level message.
///
/// ```
/// # use channel_logger::prelude::*;
/// # let logger = Logger::builder().sink(SinkId::Console, MemorySink::new("c")).build().unwrap();
/// use channel_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use channel_logger::prelude::*;
/// # let logger = Logger::builder().sink(SinkId::Console, MemorySink::new("c")).build().unwrap();
/// use channel_logger::error;
/// let error_code = 404;
/// error!(logger, "Request failed with code: {}", error_code);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
