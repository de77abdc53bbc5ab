//! Test suite
//!
//! An ordered list of test units plus how to run them and who to tell
//! when they are done.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::parallel::{default_workers, ParallelExecutor};
use super::runner::TestRunner;
use super::SharedUnit;
use crate::error::GradeError;
use crate::models::SuiteSummary;
use crate::output::{Console, Tone};
use crate::units::TestUnit;
use crate::utils::Timer;

/// Printed when parallel mode is asked to prompt for diff disclosure
pub const PROGRESSIVE_PARALLEL_WARNING: &str = "Progressive mode is incompatible with \
    multiprocessing. The autograder will run in a single process.";

/// Receives the 0/1 pass vector after the summary line
pub type CompletionCallback = Box<dyn Fn(&[u8]) + Send + Sync>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequential"),
            ExecutionMode::Parallel => write!(f, "parallel"),
        }
    }
}

/// Ordered collection of tests
pub struct Suite {
    tests: Vec<SharedUnit>,
    mode: ExecutionMode,
    workers: usize,
    on_complete: Option<CompletionCallback>,
    pass_list: Vec<u8>,
}

impl Suite {
    pub fn new() -> Self {
        Self {
            tests: Vec::new(),
            mode: ExecutionMode::Sequential,
            workers: default_workers(),
            on_complete: None,
            pass_list: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Worker pool size for parallel runs
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_callback(mut self, callback: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Append a test; its index is the current length
    pub fn add_test(&mut self, unit: impl TestUnit + 'static) -> &mut Self {
        self.tests.push(Arc::new(unit));
        self
    }

    pub fn tests(&self) -> &[SharedUnit] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Result of the latest run, indexed like the tests
    pub fn pass_list(&self) -> &[u8] {
        &self.pass_list
    }

    /// Run every test, print the summary line and notify the callback.
    ///
    /// Output appears in test order in both modes. A grading error stops
    /// the run before the summary is printed.
    pub async fn run(&mut self, console: &mut Console) -> Result<SuiteSummary, GradeError> {
        self.pass_list.clear();
        let mode = self.effective_mode(console)?;
        info!("Starting {} suite of {} tests", mode, self.tests.len());

        let timer = Timer::start("suite");
        let records = match mode {
            ExecutionMode::Sequential => TestRunner::run_all(&self.tests, console)?,
            ExecutionMode::Parallel => {
                ParallelExecutor::new(self.workers)
                    .run_all(&self.tests, console)
                    .await?
            }
        };
        let elapsed_ms = timer.stop();

        let summary = SuiteSummary::new(records);
        self.pass_list = summary.pass_list.clone();

        console.line("")?;
        let tone = if summary.is_all_passed() {
            Tone::Success
        } else {
            Tone::Warning
        };
        console.status(&summary.headline(), tone)?;

        if let Some(callback) = &self.on_complete {
            console.line("")?;
            callback(&self.pass_list);
        }

        info!(
            "Suite finished in {}ms - Pass: {}/{} ({:.1}%)",
            elapsed_ms,
            summary.passed,
            summary.total,
            summary.pass_rate()
        );
        Ok(summary)
    }

    fn effective_mode(&self, console: &mut Console) -> Result<ExecutionMode, GradeError> {
        if self.mode == ExecutionMode::Parallel && console.is_progressive() {
            warn!("Progressive disclosure requested in parallel mode; running sequentially");
            console.status(PROGRESSIVE_PARALLEL_WARNING, Tone::Warning)?;
            return Ok(ExecutionMode::Sequential);
        }
        Ok(self.mode)
    }
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}
