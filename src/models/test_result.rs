//! Per-test records and suite summaries
//!
//! Defines the status of each graded test and the aggregate that is
//! printed, handed to the completion callback, and exported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single test
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    /// The unit crashed or aborted before reporting
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of one test at its position in the suite
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRecord {
    pub index: usize,
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl TestRecord {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        status: TestStatus,
        duration_ms: u64,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            status,
            duration_ms,
            message: None,
        }
    }

    pub fn from_outcome(
        index: usize,
        name: impl Into<String>,
        passed: bool,
        duration_ms: u64,
    ) -> Self {
        let status = if passed {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        };
        Self::new(index, name, status, duration_ms)
    }

    pub fn error(index: usize, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(index, name, TestStatus::Error, 0).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.status.is_success()
    }
}

impl fmt::Display for TestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} {} [{}ms]",
            self.status.symbol(),
            self.index,
            self.name,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of one suite run, in submission order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub finished_at: DateTime<Utc>,
    /// 1 for pass, 0 otherwise, indexed like the suite
    pub pass_list: Vec<u8>,
    pub results: Vec<TestRecord>,
}

impl SuiteSummary {
    /// Build a summary; `results` must already be in index order
    pub fn new(results: Vec<TestRecord>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.status == TestStatus::Pass).count();
        let failed = results.iter().filter(|r| r.status == TestStatus::Fail).count();
        let errors = results.iter().filter(|r| r.status == TestStatus::Error).count();
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();
        let pass_list = results.iter().map(|r| u8::from(r.passed())).collect();

        Self {
            total,
            passed,
            failed,
            errors,
            total_duration_ms,
            finished_at: Utc::now(),
            pass_list,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// The closing line printed after every run
    pub fn headline(&self) -> String {
        format!("{} / {} tests passed.", self.passed, self.total)
    }
}

impl fmt::Display for SuiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Error: {}",
            self.total, self.passed, self.failed, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_outcome() {
        assert!(TestRecord::from_outcome(0, "f", true, 1).passed());
        assert_eq!(
            TestRecord::from_outcome(1, "f", false, 1).status,
            TestStatus::Fail
        );
    }

    #[test]
    fn test_summary_counts_and_pass_list() {
        let summary = SuiteSummary::new(vec![
            TestRecord::from_outcome(0, "a", true, 10),
            TestRecord::from_outcome(1, "b", false, 20),
            TestRecord::error(2, "c", "worker crashed"),
        ]);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.pass_list, vec![1, 0, 0]);
        assert_eq!(summary.total_duration_ms, 30);
        assert_eq!(summary.headline(), "1 / 3 tests passed.");
        assert!(!summary.is_all_passed());
    }

    #[test]
    fn test_empty_summary() {
        let summary = SuiteSummary::new(Vec::new());
        assert_eq!(summary.pass_rate(), 0.0);
        assert!(summary.is_all_passed());
        assert_eq!(summary.headline(), "0 / 0 tests passed.");
    }

    #[test]
    fn test_record_display() {
        let record = TestRecord::error(4, "avg", "crashed");
        assert_eq!(record.to_string(), "! #4 avg [0ms] - crashed");
    }
}
