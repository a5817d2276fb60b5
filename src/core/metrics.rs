//! Logger metrics for observability
//!
//! Counters describing what the pipeline did with each log call: filtered
//! out, queued, written, or failed at a sink.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use channel_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_written();
///
/// assert_eq!(metrics.records_enqueued(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Calls dropped by the level filter before a record was built
    records_filtered: AtomicU64,

    /// Records admitted to the queue
    records_enqueued: AtomicU64,

    /// Records fully processed by the worker (or the recovery path)
    records_written: AtomicU64,

    /// Individual sink writes that returned an error or panicked
    sink_failures: AtomicU64,

    /// Number of times a producer had to wait for queue space
    block_events: AtomicU64,

    /// Panics converted into ERROR records
    panics_recovered: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_filtered: AtomicU64::new(0),
            records_enqueued: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            panics_recovered: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_filtered(&self) -> u64 {
        self.records_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_enqueued(&self) -> u64 {
        self.records_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn panics_recovered(&self) -> u64 {
        self.panics_recovered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.records_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.records_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_panic_recovered(&self) -> u64 {
        self.panics_recovered.fetch_add(1, Ordering::Relaxed)
    }

    /// Records admitted to the queue but not yet processed by the worker.
    ///
    /// Records written by the recovery path bypass the queue and are not
    /// counted as enqueued, so this saturates at zero.
    pub fn pending(&self) -> u64 {
        self.records_enqueued()
            .saturating_sub(self.records_written().saturating_sub(self.panics_recovered()))
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_filtered: AtomicU64::new(self.records_filtered()),
            records_enqueued: AtomicU64::new(self.records_enqueued()),
            records_written: AtomicU64::new(self.records_written()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            block_events: AtomicU64::new(self.block_events()),
            panics_recovered: AtomicU64::new(self.panics_recovered()),
        }
    }
}
