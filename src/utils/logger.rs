//! Logging utilities
//!
//! Sets up the `tracing` subscriber. Logs go to stderr so graded
//! transcripts on stdout stay clean.

use std::fmt;
use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Verbosity of the grader's own diagnostics.
///
/// Only events from this crate are enabled, and they are written to stderr
/// so that nothing interleaves with the grading transcript on stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    /// `EnvFilter` directive limiting output to this crate
    pub fn filter_directive(self) -> String {
        format!("diffgrade={}", self.to_tracing_level())
    }

    /// Parse a level name as accepted in config files and `DIFFGRADE_LOG`
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// Install the global subscriber, writing compact lines to stderr
pub fn init_logger(level: LogLevel) {
    let filter = EnvFilter::new(level.filter_directive());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("unknown"), None);
    }

    #[test]
    fn test_filter_directive_targets_crate() {
        assert_eq!(LogLevel::Warn.filter_directive(), "diffgrade=WARN");
        assert!(EnvFilter::try_new(LogLevel::Debug.filter_directive()).is_ok());
    }

    #[test]
    fn test_log_level_display_round_trips() {
        for level in [LogLevel::Trace, LogLevel::Warn, LogLevel::Error] {
            assert_eq!(LogLevel::from_str(&level.to_string()), Some(level));
        }
    }
}
