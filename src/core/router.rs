//! Sink selection per record

use super::config::LoggerConfig;
use super::output_target::OutputTargets;
use super::record::LogRecord;
use std::fmt;

/// Identifies one of the three sinks a logger can own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkId {
    Console,
    PrimaryFile,
    FilteredFile,
}

impl SinkId {
    pub const ALL: [SinkId; 3] = [SinkId::Console, SinkId::PrimaryFile, SinkId::FilteredFile];

    const fn bit(self) -> u8 {
        match self {
            SinkId::Console => 1 << 0,
            SinkId::PrimaryFile => 1 << 1,
            SinkId::FilteredFile => 1 << 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SinkId::Console => "console",
            SinkId::PrimaryFile => "primary-file",
            SinkId::FilteredFile => "filtered-file",
        }
    }
}

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of sinks selected for one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Route(u8);

impl Route {
    pub const fn empty() -> Self {
        Route(0)
    }

    pub fn insert(&mut self, sink: SinkId) {
        self.0 |= sink.bit();
    }

    pub const fn contains(&self, sink: SinkId) -> bool {
        self.0 & sink.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = SinkId> + '_ {
        SinkId::ALL.into_iter().filter(move |sink| self.contains(*sink))
    }
}

/// Decide which sinks receive `record` under `config`
pub fn route(record: &LogRecord, config: &LoggerConfig) -> Route {
    let mut route = Route::empty();

    if config.targets.contains(OutputTargets::CONSOLE) {
        route.insert(SinkId::Console);
    }
    if config.targets.contains(OutputTargets::FILE) {
        route.insert(SinkId::PrimaryFile);
    }
    if matches_allowed_prefix(&record.caller, &config.allowed_prefixes) {
        route.insert(SinkId::FilteredFile);
    }

    route
}

/// Case-sensitive substring match of `caller` against any allowed prefix
pub fn matches_allowed_prefix(caller: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| caller.contains(prefix.as_str()))
}
