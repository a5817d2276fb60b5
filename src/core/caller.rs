//! Caller tag resolution
//!
//! A record's caller tag is resolved on the producer's thread while the call
//! site is still known. The resolution strategy is injected through
//! [`CallerResolver`] so tests can substitute deterministic tags.

use std::panic::Location;
use std::path::Path;

/// Source position of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    /// `module_path!()` of the caller, when the call went through a macro
    pub module_path: Option<&'static str>,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, module_path: &'static str) -> Self {
        Self {
            file,
            line,
            module_path: Some(module_path),
        }
    }

    /// Capture the position of the nearest `#[track_caller]`-free caller.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            module_path: None,
        }
    }
}

/// Turns a call site into the human-readable tag stored on each record
pub trait CallerResolver: Send + Sync {
    fn resolve(&self, site: &CallSite) -> String;
}

/// Renders `"<file name>:<line> <module>"`, e.g. `"worker.rs:42 app.worker"`.
///
/// The module part is the `module_path!()` with `::` written as `.`; without a
/// module path the file stem is used instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortCallerResolver;

impl CallerResolver for ShortCallerResolver {
    fn resolve(&self, site: &CallSite) -> String {
        let path = Path::new(site.file);
        let short_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(site.file);

        let short_func = match site.module_path {
            Some(module) => module.replace("::", "."),
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string(),
        };

        format!("{}:{} {}", short_file, site.line, short_func)
    }
}

/// Always returns the same tag
#[derive(Debug, Clone)]
pub struct FixedCallerResolver(pub String);

impl FixedCallerResolver {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

impl CallerResolver for FixedCallerResolver {
    fn resolve(&self, _site: &CallSite) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_resolver_with_module_path() {
        let site = CallSite::new("src/net/listener.rs", 88, "server::net::listener");
        assert_eq!(
            ShortCallerResolver.resolve(&site),
            "listener.rs:88 server.net.listener"
        );
    }

    #[test]
    fn test_short_resolver_without_module_path() {
        let site = CallSite {
            file: "src/main.rs",
            line: 7,
            module_path: None,
        };
        assert_eq!(ShortCallerResolver.resolve(&site), "main.rs:7 main");
    }

    #[test]
    fn test_caller_points_at_this_file() {
        let site = CallSite::caller();
        let tag = ShortCallerResolver.resolve(&site);
        assert!(tag.starts_with("caller.rs:"), "unexpected tag {}", tag);
        assert!(tag.ends_with(" caller"));
    }

    #[test]
    fn test_fixed_resolver() {
        let resolver = FixedCallerResolver::new("logger.X");
        assert_eq!(resolver.resolve(&CallSite::caller()), "logger.X");
    }
}
