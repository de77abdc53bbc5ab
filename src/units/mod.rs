//! Test units
//!
//! A test unit runs a candidate callable next to its reference, compares
//! the two responses and writes a short report to a [`Console`].

mod input;
mod signature;

use std::sync::Arc;

use crate::error::GradeError;
use crate::output::Console;

pub use diff_test::DiffTest;
pub use input::StdinSource;
pub use signature::{summarize, SIGNATURE_BUDGET};

/// Width of the start message column
pub const START_MESSAGE_WIDTH: usize = 68;

/// Something a suite can run
pub trait TestUnit: Send + Sync {
    /// Name of the function being graded
    fn name(&self) -> &str;

    /// Padded line printed before the status, without a newline
    fn start_message(&self) -> String;

    /// Run both sides, write the report and return whether the test passed
    fn run(&self, console: &mut Console) -> Result<bool, GradeError>;
}

pub type Hook = Arc<dyn Fn() + Send + Sync>;

/// Optional callbacks around a test run
#[derive(Clone, Default)]
pub struct Hooks {
    setup: Option<Hook>,
    teardown: Option<Hook>,
}

impl Hooks {
    pub fn with_setup(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.setup = Some(Arc::new(f));
        self
    }

    pub fn with_teardown(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.teardown = Some(Arc::new(f));
        self
    }

    /// Run setup and return a guard that runs teardown when dropped.
    ///
    /// The guard exists before setup starts, so teardown also runs when
    /// setup itself panics.
    pub fn enter(&self) -> TeardownGuard<'_> {
        let guard = TeardownGuard {
            teardown: self.teardown.as_ref(),
        };
        if let Some(setup) = &self.setup {
            setup();
        }
        guard
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("setup", &self.setup.is_some())
            .field("teardown", &self.teardown.is_some())
            .finish()
    }
}

/// Runs the teardown hook on every exit path
pub struct TeardownGuard<'a> {
    teardown: Option<&'a Hook>,
}

impl Drop for TeardownGuard<'_> {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown {
            teardown();
        }
    }
}

/// Pad a start message to the fixed column width
pub fn pad_start_message(text: &str) -> String {
    format!("{text:<width$}", width = START_MESSAGE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_hooks_run_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (setup_log, teardown_log) = (events.clone(), events.clone());
        let hooks = Hooks::default()
            .with_setup(move || setup_log.lock().unwrap().push("setup"))
            .with_teardown(move || teardown_log.lock().unwrap().push("teardown"));

        {
            let _guard = hooks.enter();
            events.lock().unwrap().push("body");
        }

        assert_eq!(*events.lock().unwrap(), vec!["setup", "body", "teardown"]);
    }

    #[test]
    fn test_teardown_runs_on_panic() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let hooks = Hooks::default().with_teardown(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = hooks.enter();
            panic!("body failed");
        }));

        assert!(result.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let hooks = Hooks::default();
        drop(hooks.enter());
        assert_eq!(format!("{hooks:?}"), "Hooks { setup: false, teardown: false }");
    }

    #[test]
    fn test_pad_start_message() {
        let padded = pad_start_message("Testing f...");
        assert_eq!(padded.len(), START_MESSAGE_WIDTH);
        assert!(padded.starts_with("Testing f..."));

        let long = "x".repeat(80);
        assert_eq!(pad_start_message(&long), long);
    }
}
