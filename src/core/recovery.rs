//! Turning panics into ERROR records
//!
//! Recovery writes synchronously: the record goes straight to the sinks and
//! is flushed before control returns, so it survives even if the process is
//! about to exit. It is written at ERROR regardless of the configured
//! minimum level.

use super::caller::CallSite;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::record::LogRecord;
use super::sink_set::panic_message;
use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{self, AssertUnwindSafe};

impl Logger {
    /// Run `f`, converting a panic into an ERROR record.
    ///
    /// Returns `Some` with the closure's value if it completed, `None` if it
    /// panicked. The record's message is `"Panic recovered: <payload>"`
    /// followed by a backtrace captured at the recovery point.
    ///
    /// # Example
    ///
    /// ```
    /// use channel_logger::prelude::*;
    ///
    /// let console = MemorySink::new("console");
    /// let logger = Logger::builder()
    ///     .config(LoggerConfig::new().with_colors(false))
    ///     .sink(SinkId::Console, console.clone())
    ///     .build()
    ///     .unwrap();
    ///
    /// let outcome = logger.recover(|| -> u32 { panic!("boom") });
    /// assert!(outcome.is_none());
    /// assert!(console.contents().contains("Panic recovered: boom"));
    /// logger.close();
    /// ```
    #[track_caller]
    pub fn recover<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce() -> R,
    {
        let site = CallSite::caller();
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                self.log_panic_at(payload.as_ref(), site);
                None
            }
        }
    }

    /// Write an ERROR record for an already-caught panic payload.
    #[track_caller]
    pub fn log_panic(&self, payload: &(dyn Any + Send)) {
        self.log_panic_at(payload, CallSite::caller());
    }

    fn log_panic_at(&self, payload: &(dyn Any + Send), site: CallSite) {
        let backtrace = Backtrace::force_capture();
        let message = format!("Panic recovered: {}\n{}", panic_message(payload), backtrace);
        let record = LogRecord::new(LogLevel::Error, message, self.resolver().resolve(&site));

        let shared = self.shared();
        shared.metrics.record_panic_recovered();
        shared.write_now(&record);
    }
}
