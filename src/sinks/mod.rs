//! Sink implementations

pub mod console;
pub mod memory;
pub mod rotating_file;

pub use console::ConsoleSink;
pub use memory::{MemorySink, MemoryWriter};
pub use rotating_file::{RotatingFileSink, RotationPolicy};
