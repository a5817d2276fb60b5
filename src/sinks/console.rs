//! Console sink implementation

use crate::core::{Result, Sink};
use std::io::{self, Write};

/// Writes lines to standard output, or to any other writer supplied at
/// construction.
///
/// Closing only flushes: the process keeps its standard streams, so lines
/// written after close (e.g. by the panic recovery path) still appear.
pub struct ConsoleSink {
    writer: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str {
        "console"
    }
}
