//! In-memory sink, mainly for tests and demos

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Shared {
    buffer: Mutex<Vec<u8>>,
    closed: AtomicBool,
}

/// A sink that appends every write to a shared buffer
///
/// Clones share the same buffer, so a test can keep one handle while the
/// logger owns another.
///
/// ```
/// use channel_logger::sinks::MemorySink;
/// use channel_logger::Sink;
///
/// let captured = MemorySink::new("capture");
/// let mut sink = captured.clone();
/// sink.write(b"one\ntwo\n").unwrap();
///
/// assert_eq!(captured.lines(), vec!["one", "two"]);
/// ```
#[derive(Clone)]
pub struct MemorySink {
    name: String,
    shared: Arc<Shared>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: Arc::new(Shared::default()),
        }
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.shared.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// An `io::Write` view over the same buffer
    pub fn writer(&self) -> MemoryWriter {
        MemoryWriter {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Sink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.is_closed() {
            return Err(LoggerError::sink(&self.name, "write after close"));
        }
        self.shared.buffer.lock().extend_from_slice(bytes);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.shared.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub struct MemoryWriter {
    shared: Arc<Shared>,
}

impl io::Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.shared.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_after_close_fails() {
        let mut sink = MemorySink::new("mem");
        sink.write(b"kept\n").unwrap();
        sink.close().unwrap();

        assert!(sink.is_closed());
        assert!(matches!(sink.write(b"lost\n"), Err(LoggerError::SinkError { .. })));
        assert_eq!(sink.lines(), vec!["kept"]);
    }
}
