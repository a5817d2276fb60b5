//! Sink trait for log output destinations

use super::error::Result;

/// A byte-oriented destination for formatted log lines
///
/// Sinks are driven by a single thread at a time; they need to be `Send` but
/// not `Sync`.
pub trait Sink: Send {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Push buffered bytes to the destination. Called whenever the queue
    /// runs empty.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Flush and release the underlying resource. Writes after `close`
    /// may fail.
    fn close(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
