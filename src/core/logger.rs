//! Main logger implementation
//!
//! Producers build records on their own thread and push them onto a bounded
//! queue; one worker thread formats, routes and writes them. Shutdown is an
//! explicit protocol:
//!
//! 1. `close()` moves the state from `Open` to `Closing` (a second call panics).
//! 2. The admission gate is shut. Sends already in flight finish first; any
//!    later `log` call fails fast.
//! 3. The stop signal is sent. The worker reads the queue until it is empty,
//!    then closes every sink and exits.
//! 4. `close()` joins the worker and the state becomes `Closed`.

use super::{
    caller::{CallSite, CallerResolver, ShortCallerResolver},
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    record::LogRecord,
    router::SinkId,
    sink::Sink,
    sink_set::SinkSet,
};
use crate::sinks::{ConsoleSink, RotatingFileSink};
use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

const WORKER_THREAD_NAME: &str = "channel-logger-worker";

/// Lifecycle of a [`Logger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    /// Accepting records
    Open,
    /// Close requested; queued records are being drained
    Closing,
    /// Drained, sinks closed, worker stopped
    Closed,
}

impl LoggerState {
    const fn as_u8(self) -> u8 {
        match self {
            LoggerState::Open => 0,
            LoggerState::Closing => 1,
            LoggerState::Closed => 2,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => LoggerState::Open,
            1 => LoggerState::Closing,
            _ => LoggerState::Closed,
        }
    }
}

impl fmt::Display for LoggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoggerState::Open => "open",
            LoggerState::Closing => "closing",
            LoggerState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// State shared between producers, the worker and the recovery path
pub(crate) struct Shared {
    pub(crate) config: LoggerConfig,
    pub(crate) sinks: Mutex<SinkSet>,
    pub(crate) metrics: LoggerMetrics,
}

impl Shared {
    fn process(&self, record: &LogRecord) {
        self.sinks.lock().dispatch(record, &self.config, &self.metrics);
    }

    /// Write one record right now, bypassing the queue, and flush.
    pub(crate) fn write_now(&self, record: &LogRecord) {
        let mut sinks = self.sinks.lock();
        sinks.dispatch(record, &self.config, &self.metrics);
        sinks.flush_all();
    }
}

pub struct Logger {
    shared: Arc<Shared>,
    resolver: Arc<dyn CallerResolver>,
    /// Admission gate; `None` once close has begun
    sender: RwLock<Option<Sender<LogRecord>>>,
    stop: Mutex<Option<Sender<()>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    state: AtomicU8,
}

impl Logger {
    /// Build a logger whose sinks all come from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the worker thread
    /// cannot be spawned. Sink construction failures are not errors: they are
    /// reported on stderr and the affected output is skipped.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        LoggerBuilder::new().config(config).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use channel_logger::prelude::*;
    ///
    /// let captured = MemorySink::new("console");
    /// let logger = Logger::builder()
    ///     .config(LoggerConfig::new().with_min_level(LogLevel::Debug).with_colors(false))
    ///     .sink(SinkId::Console, captured.clone())
    ///     .build()
    ///     .unwrap();
    ///
    /// logger.debug("warming up");
    /// logger.close();
    /// assert_eq!(captured.lines().len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn start(config: LoggerConfig, sinks: SinkSet, resolver: Arc<dyn CallerResolver>) -> Result<Self> {
        let (sender, receiver) = bounded(config.queue_capacity);
        let (stop_sender, stop_receiver) = bounded(1);

        let shared = Arc::new(Shared {
            config,
            sinks: Mutex::new(sinks),
            metrics: LoggerMetrics::new(),
        });
        let worker_shared = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || Self::run_worker(&worker_shared, &receiver, &stop_receiver))
            .map_err(|e| LoggerError::io_operation("spawn worker", "failed to start the logger thread", e))?;

        Ok(Self {
            shared,
            resolver,
            sender: RwLock::new(Some(sender)),
            stop: Mutex::new(Some(stop_sender)),
            worker: Mutex::new(Some(handle)),
            state: AtomicU8::new(LoggerState::Open.as_u8()),
        })
    }

    fn run_worker(shared: &Shared, records: &Receiver<LogRecord>, stop: &Receiver<()>) {
        loop {
            select! {
                recv(records) -> msg => match msg {
                    Ok(record) => {
                        shared.process(&record);
                        if records.is_empty() {
                            shared.sinks.lock().flush_all();
                        }
                    }
                    // Every sender is gone: nothing more can arrive.
                    Err(_) => break,
                },
                recv(stop) -> _ => break,
            }
        }

        // Drain whatever was admitted before the gate shut.
        while let Ok(record) = records.try_recv() {
            shared.process(&record);
        }

        shared.sinks.lock().close_all();
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.shared.config
    }

    pub fn state(&self) -> LoggerState {
        LoggerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_closed(&self) -> bool {
        self.state() == LoggerState::Closed
    }

    /// Whether a record at `level` would pass the level filter
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.shared.config.min_level
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Log `message` at `level`, tagging it with the caller's location.
    ///
    /// # Panics
    ///
    /// Panics if the logger has been closed. Use [`Logger::try_log`] to get
    /// an error instead.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.log_at(level, message, CallSite::caller());
    }

    /// Like [`Logger::log`] with an explicit call site (used by the macros).
    pub fn log_at(&self, level: LogLevel, message: impl Into<String>, site: CallSite) {
        if let Err(e) = self.try_log_at(level, message, site) {
            panic!("channel_logger: cannot log after close: {}", e);
        }
    }

    /// Non-panicking variant of [`Logger::log`].
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::LoggerClosed`] if the logger no longer admits
    /// records.
    #[track_caller]
    pub fn try_log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        self.try_log_at(level, message, CallSite::caller())
    }

    pub fn try_log_at(&self, level: LogLevel, message: impl Into<String>, site: CallSite) -> Result<()> {
        if !self.enabled(level) {
            self.shared.metrics.record_filtered();
            return Ok(());
        }

        let record = LogRecord::new(level, message, self.resolver.resolve(&site));
        self.enqueue(record)
    }

    /// Push a ready-made record onto the queue, waiting for space if the
    /// queue is full. The level filter is not applied.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::LoggerClosed`] once close has begun.
    pub fn enqueue(&self, record: LogRecord) -> Result<()> {
        let gate = self.sender.read();
        let sender = gate.as_ref().ok_or(LoggerError::LoggerClosed)?;

        match sender.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                self.shared.metrics.record_block();
                sender.send(record).map_err(|_| LoggerError::LoggerClosed)?;
            }
            Err(TrySendError::Disconnected(_)) => return Err(LoggerError::LoggerClosed),
        }

        self.shared.metrics.record_enqueued();
        Ok(())
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Stop accepting records, write everything already queued, close all
    /// sinks and stop the worker. Blocks until done; there is no timeout.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use channel_logger::{Logger, LoggerConfig};
    ///
    /// let logger = Logger::new(LoggerConfig::default()).unwrap();
    /// logger.info("Important message");
    /// logger.close();
    /// ```
    pub fn close(&self) {
        if !self.begin_close() {
            panic!("channel_logger: close called on a logger that is already {}", self.state());
        }
        self.finish_close();
    }

    fn begin_close(&self) -> bool {
        self.state
            .compare_exchange(
                LoggerState::Open.as_u8(),
                LoggerState::Closing.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn finish_close(&self) {
        // Waits for in-flight sends; the worker keeps consuming meanwhile.
        drop(self.sender.write().take());

        if let Some(stop) = self.stop.lock().take() {
            let _ = stop.send(());
        }

        if let Some(handle) = self.worker.lock().take() {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Worker thread panicked during shutdown: {:?}", e);
                self.shared.sinks.lock().close_all();
            }
        }

        self.state.store(LoggerState::Closed.as_u8(), Ordering::Release);
    }

    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    pub(crate) fn resolver(&self) -> &dyn CallerResolver {
        self.resolver.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.begin_close() {
            self.finish_close();
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("state", &self.state())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Sinks not supplied explicitly are created from the configuration: a stdout
/// console sink when the `CONSOLE` target is set, a rotating file at
/// `log_path` when `FILE` is set, and a rotating file at `filtered_log_path`
/// when allowed prefixes are configured.
pub struct LoggerBuilder {
    config: LoggerConfig,
    sinks: SinkSet,
    resolver: Arc<dyn CallerResolver>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sinks: SinkSet::new(),
            resolver: Arc::new(ShortCallerResolver),
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    /// Use `sink` for the `id` slot instead of building one from the config
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn sink<S: Sink + 'static>(mut self, id: SinkId, sink: S) -> Self {
        self.sinks.insert(id, Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn caller_resolver<R: CallerResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Build the Logger and start its worker
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the worker thread
    /// cannot be spawned.
    pub fn build(mut self) -> Result<Logger> {
        self.config.validate()?;

        for id in SinkId::ALL {
            if !self.sinks.contains(id) {
                if let Some(sink) = default_sink(&self.config, id) {
                    self.sinks.insert(id, sink);
                }
            }
        }

        Logger::start(self.config, self.sinks, self.resolver)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort construction of the sink for `id`
fn default_sink(config: &LoggerConfig, id: SinkId) -> Option<Box<dyn Sink>> {
    use super::output_target::OutputTargets;

    let file_sink = |path: &std::path::Path| -> Option<Box<dyn Sink>> {
        match RotatingFileSink::new(path, config.rotation.clone()) {
            Ok(sink) => Some(Box::new(sink.with_name(id.as_str()))),
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Cannot open {} sink at '{}': {}. Records routed there will be lost.",
                    id,
                    path.display(),
                    e
                );
                None
            }
        }
    };

    match id {
        SinkId::Console if config.targets.contains(OutputTargets::CONSOLE) => {
            Some(Box::new(ConsoleSink::new()))
        }
        SinkId::PrimaryFile if config.targets.contains(OutputTargets::FILE) => {
            file_sink(&config.log_path)
        }
        SinkId::FilteredFile if config.filtering_enabled() => file_sink(&config.filtered_log_path),
        _ => None,
    }
}
