//! Captured execution outcome
//!
//! A `Response` records what one side of a test did: the value it
//! returned, what it printed, and whether it failed or warned.

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which implementation produced a response
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Reference,
    Candidate,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Reference => "reference",
            Side::Candidate => "candidate",
        }
    }

    /// Capitalized label for sentence starts
    pub fn title(&self) -> &'static str {
        match self {
            Side::Reference => "Reference",
            Side::Candidate => "Candidate",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Abnormal termination of a callable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub trace: String,
}

impl Failure {
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: trace.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trace.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}\n{}", self.message, self.trace)
        }
    }
}

/// Record of one execution attempt
#[derive(Debug)]
pub struct Response<R> {
    side: Side,
    value: Option<R>,
    stdout: String,
    stderr: String,
    failure: Option<Failure>,
    warning: Option<String>,
    output_divergence: Cell<bool>,
}

impl<R> Response<R> {
    /// A side that returned normally
    pub fn returned(side: Side, value: R) -> Self {
        Self::empty(side, Some(value))
    }

    /// A side that failed with no value
    pub fn failed(side: Side, failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::empty(side, None)
        }
    }

    /// A side that halted by asking to exit the process
    pub fn exited(side: Side, warning: impl Into<String>) -> Self {
        Self {
            warning: Some(warning.into()),
            ..Self::empty(side, None)
        }
    }

    fn empty(side: Side, value: Option<R>) -> Self {
        Self {
            side,
            value,
            stdout: String::new(),
            stderr: String::new(),
            failure: None,
            warning: None,
            output_divergence: Cell::new(false),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn value(&self) -> Option<&R> {
        self.value.as_ref()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// Explicit warning, or captured stderr when the side did not fail
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref().or_else(|| {
            (self.failure.is_none() && !self.stderr.is_empty()).then_some(self.stderr.as_str())
        })
    }

    pub fn has_output_divergence(&self) -> bool {
        self.output_divergence.get()
    }

    pub(crate) fn mark_output_divergence(&self) {
        self.output_divergence.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_becomes_warning() {
        let response = Response::returned(Side::Candidate, 1).with_stderr("careful\n");
        assert_eq!(response.warning(), Some("careful\n"));
    }

    #[test]
    fn test_stderr_ignored_when_failed() {
        let response: Response<i32> =
            Response::failed(Side::Candidate, Failure::new("Threw boom.", "")).with_stderr("x");
        assert!(response.warning().is_none());
        assert!(response.is_failure());
    }

    #[test]
    fn test_exit_warning_has_no_value() {
        let response: Response<i32> = Response::exited(Side::Reference, "tried to exit");
        assert!(response.value().is_none());
        assert!(!response.is_failure());
        assert_eq!(response.warning(), Some("tried to exit"));
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(Failure::new("Threw x.", "").to_string(), "Threw x.");
        assert_eq!(
            Failure::new("Threw x.", "at line 3").to_string(),
            "Threw x.\nat line 3"
        );
    }

    #[test]
    fn test_side_labels() {
        assert_eq!(Side::Reference.to_string(), "reference");
        assert_eq!(Side::Candidate.title(), "Candidate");
    }
}
