//! The three sink slots a logger owns, and the format → route → write step

use super::config::LoggerConfig;
use super::metrics::LoggerMetrics;
use super::record::LogRecord;
use super::router::{self, SinkId};
use super::sink::Sink;
use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

#[derive(Default)]
pub struct SinkSet {
    console: Option<Box<dyn Sink>>,
    primary_file: Option<Box<dyn Sink>>,
    filtered_file: Option<Box<dyn Sink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: SinkId, sink: Box<dyn Sink>) {
        *self.slot_mut(id) = Some(sink);
    }

    pub fn contains(&self, id: SinkId) -> bool {
        match id {
            SinkId::Console => self.console.is_some(),
            SinkId::PrimaryFile => self.primary_file.is_some(),
            SinkId::FilteredFile => self.filtered_file.is_some(),
        }
    }

    fn slot_mut(&mut self, id: SinkId) -> &mut Option<Box<dyn Sink>> {
        match id {
            SinkId::Console => &mut self.console,
            SinkId::PrimaryFile => &mut self.primary_file,
            SinkId::FilteredFile => &mut self.filtered_file,
        }
    }

    /// Format `record` once and write it to every sink the router selects.
    ///
    /// Each sink is isolated: an error or panic in one is reported and
    /// counted, and the remaining sinks still receive the line. A routed slot
    /// with no sink (construction failed) is skipped.
    pub fn dispatch(&mut self, record: &LogRecord, config: &LoggerConfig, metrics: &LoggerMetrics) {
        let route = router::route(record, config);
        if !route.is_empty() {
            let line = config.format.format(record);

            for id in route.iter() {
                let Some(sink) = self.slot_mut(id).as_mut() else {
                    continue;
                };

                let bytes: Cow<'_, str> = if id == SinkId::Console && config.colored {
                    Cow::Owned(record.level.paint(&line))
                } else {
                    Cow::Borrowed(line.as_str())
                };

                let result = panic::catch_unwind(AssertUnwindSafe(|| sink.write(bytes.as_bytes())));
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        eprintln!("[LOGGER ERROR] Sink '{}' write failed: {}", id, e);
                        metrics.record_sink_failure();
                    }
                    Err(panic_info) => {
                        eprintln!(
                            "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                             Other sinks continue to function.",
                            id,
                            panic_message(panic_info.as_ref())
                        );
                        metrics.record_sink_failure();
                    }
                }
            }
        }

        metrics.record_written();
    }

    pub fn flush_all(&mut self) {
        self.for_each_sink("flush", |sink| sink.flush());
    }

    pub fn close_all(&mut self) {
        self.for_each_sink("close", |sink| sink.close());
    }

    fn for_each_sink<F>(&mut self, operation: &str, mut op: F)
    where
        F: FnMut(&mut Box<dyn Sink>) -> super::error::Result<()>,
    {
        for id in SinkId::ALL {
            let Some(sink) = self.slot_mut(id).as_mut() else {
                continue;
            };
            match panic::catch_unwind(AssertUnwindSafe(|| op(sink))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => eprintln!("[LOGGER ERROR] Sink '{}' {} failed: {}", id, operation, e),
                Err(panic_info) => eprintln!(
                    "[LOGGER CRITICAL] Sink '{}' panicked during {}: {}",
                    id,
                    operation,
                    panic_message(panic_info.as_ref())
                ),
            }
        }
    }
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{LoggerError, Result};
    use crate::core::log_level::LogLevel;
    use crate::core::output_target::OutputTargets;
    use crate::sinks::MemorySink;

    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&mut self, _bytes: &[u8]) -> Result<()> {
            Err(LoggerError::sink("failing", "simulated failure"))
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn write(&mut self, _bytes: &[u8]) -> Result<()> {
            panic!("sink exploded");
        }

        fn close(&mut self) -> Result<()> {
            panic!("close exploded");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn config() -> LoggerConfig {
        LoggerConfig::new()
            .with_targets(OutputTargets::CONSOLE | OutputTargets::FILE)
            .with_allowed_prefixes(["logger"])
            .with_colors(false)
    }

    #[test]
    fn test_dispatch_writes_to_routed_sinks_only() {
        let console = MemorySink::new("console");
        let primary = MemorySink::new("primary");
        let filtered = MemorySink::new("filtered");

        let mut sinks = SinkSet::new();
        sinks.insert(SinkId::Console, Box::new(console.clone()));
        sinks.insert(SinkId::PrimaryFile, Box::new(primary.clone()));
        sinks.insert(SinkId::FilteredFile, Box::new(filtered.clone()));

        let metrics = LoggerMetrics::new();
        sinks.dispatch(&LogRecord::new(LogLevel::Info, "hello", "logger.X"), &config(), &metrics);
        sinks.dispatch(&LogRecord::new(LogLevel::Info, "other", "main.X"), &config(), &metrics);

        assert_eq!(console.lines().len(), 2);
        assert_eq!(primary.lines().len(), 2);
        assert_eq!(filtered.lines().len(), 1);
        assert!(filtered.contents().contains("logger.X hello"));
        assert_eq!(metrics.records_written(), 2);
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let primary = MemorySink::new("primary");
        let mut sinks = SinkSet::new();
        sinks.insert(SinkId::Console, Box::new(PanickingSink));
        sinks.insert(SinkId::PrimaryFile, Box::new(primary.clone()));
        sinks.insert(SinkId::FilteredFile, Box::new(FailingSink));

        let metrics = LoggerMetrics::new();
        sinks.dispatch(&LogRecord::new(LogLevel::Error, "survives", "logger.X"), &config(), &metrics);

        assert_eq!(primary.lines().len(), 1);
        assert_eq!(metrics.sink_failures(), 2);

        // close_all must survive the panicking sink as well
        sinks.close_all();
        assert!(primary.is_closed());
    }

    #[test]
    fn test_missing_sink_is_skipped() {
        let mut sinks = SinkSet::new();
        assert!(!sinks.contains(SinkId::PrimaryFile));

        let metrics = LoggerMetrics::new();
        sinks.dispatch(&LogRecord::new(LogLevel::Info, "nowhere", "main.X"), &config(), &metrics);
        assert_eq!(metrics.sink_failures(), 0);
        assert_eq!(metrics.records_written(), 1);
    }

    #[test]
    fn test_panic_message_variants() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(42_u32);

        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "Unknown panic");
    }
}
