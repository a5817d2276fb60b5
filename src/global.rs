//! Process-wide logger
//!
//! The first successful initialization wins; later calls get the logger that
//! already exists and their configuration is ignored. The global logger lives
//! for the rest of the process and is never dropped, so call
//! `global().close()` before exit to drain it.

use crate::core::{Logger, LoggerBuilder, LoggerConfig, Result};
use parking_lot::Mutex;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();
static INIT: Mutex<()> = parking_lot::const_mutex(());

/// Initialize the global logger from `config`, or return the existing one.
///
/// # Errors
///
/// Returns an error if this call performed the initialization and building
/// the logger failed. The global stays unset in that case.
pub fn init(config: LoggerConfig) -> Result<&'static Logger> {
    init_with(Logger::builder().config(config))
}

/// Like [`init`], with full control over sinks and caller resolution.
///
/// # Errors
///
/// Returns an error if this call performed the initialization and
/// [`LoggerBuilder::build`] failed.
pub fn init_with(builder: LoggerBuilder) -> Result<&'static Logger> {
    if let Some(logger) = GLOBAL.get() {
        return Ok(logger);
    }

    let _guard = INIT.lock();
    if let Some(logger) = GLOBAL.get() {
        return Ok(logger);
    }

    let logger = builder.build()?;
    Ok(GLOBAL.get_or_init(move || logger))
}

/// The global logger if it has been initialized
pub fn get() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// The global logger, initialized with the default configuration on first use.
///
/// # Errors
///
/// Returns an error if the default logger could not be built.
pub fn try_global() -> Result<&'static Logger> {
    match GLOBAL.get() {
        Some(logger) => Ok(logger),
        None => init(LoggerConfig::default()),
    }
}

/// The global logger, initialized with the default configuration on first use.
///
/// # Panics
///
/// Panics if the default logger could not be built (the worker thread
/// failed to start).
pub fn global() -> &'static Logger {
    match try_global() {
        Ok(logger) => logger,
        Err(e) => panic!("channel_logger: failed to start the global logger: {}", e),
    }
}

/// [`Logger::recover`] through the global logger
#[track_caller]
pub fn recover<F, R>(f: F) -> Option<R>
where
    F: FnOnce() -> R,
{
    global().recover(f)
}
