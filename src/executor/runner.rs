//! Sequential test runner
//!
//! Runs test units one after another against a shared console.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info};

use super::SharedUnit;
use crate::capture::{panic_message, SilencedPanics};
use crate::error::GradeError;
use crate::models::{Failure, TestRecord};
use crate::output::{Console, Tone};
use crate::units::TestUnit;
use crate::utils::Timer;

/// Run one unit at its suite position.
///
/// A panic escaping the unit, for example from a setup hook, becomes an
/// error record and is reported in the unit's transcript rather than on
/// stderr. Grading errors such as stdin exhaustion are returned.
pub fn run_unit(
    index: usize,
    unit: &dyn TestUnit,
    console: &mut Console,
) -> Result<TestRecord, GradeError> {
    let timer = Timer::start(format!("#{index} {}", unit.name()));
    let silenced = SilencedPanics::enter();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| unit.run(console)));
    let trace = silenced.take_trace();
    drop(silenced);
    let duration_ms = timer.stop();

    match outcome {
        Ok(Ok(passed)) => Ok(TestRecord::from_outcome(
            index,
            unit.name(),
            passed,
            duration_ms,
        )),
        Ok(Err(err)) => Err(err.at(index, unit.name())),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            let trace = trace.unwrap_or_default();
            error!("Test #{} ({}) crashed: {} {}", index, unit.name(), message, trace);
            console.line("")?;
            console.status("Test crashed!", Tone::Fail)?;
            let failure = Failure::new(format!("Panicked: {message}."), trace.as_str());
            console.line(&failure.to_string())?;

            let detail = if trace.is_empty() {
                message
            } else {
                format!("{message} ({trace})")
            };
            let mut record = TestRecord::error(index, unit.name(), detail);
            record.duration_ms = duration_ms;
            Ok(record)
        }
    }
}

/// Test runner that executes units strictly in order
pub struct TestRunner;

impl TestRunner {
    /// Run every unit; the first grading error stops the run
    pub fn run_all(
        units: &[SharedUnit],
        console: &mut Console,
    ) -> Result<Vec<TestRecord>, GradeError> {
        info!("Running {} tests sequentially", units.len());

        let mut records = Vec::with_capacity(units.len());
        for (index, unit) in units.iter().enumerate() {
            let record = run_unit(index, unit.as_ref(), console)?;
            debug!("  {}", record);
            records.push(record);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Callable, Io};
    use crate::executor::fixtures::{plain_console, Scripted};
    use crate::models::{Args, TestStatus};
    use crate::units::DiffTest;
    use std::sync::Arc;

    #[test]
    fn test_runs_in_order() {
        let units: Vec<SharedUnit> = vec![
            Arc::new(Scripted::new("first", true)),
            Arc::new(Scripted::new("second", false)),
        ];
        let mut console = plain_console();

        let records = TestRunner::run_all(&units, &mut console).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, TestStatus::Pass);
        assert_eq!(records[1].status, TestStatus::Fail);
        assert_eq!(records[1].index, 1);

        let transcript = console.into_transcript();
        let first = transcript.find("Testing first").unwrap();
        let second = transcript.find("Testing second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_crash_becomes_error_record() {
        let units: Vec<SharedUnit> = vec![
            Arc::new(Scripted::new("fragile", true).crashing()),
            Arc::new(Scripted::new("sturdy", true)),
        ];
        let mut console = plain_console();

        let records = TestRunner::run_all(&units, &mut console).unwrap();
        assert_eq!(records[0].status, TestStatus::Error);
        let message = records[0].message.as_deref().unwrap();
        assert!(message.starts_with("setup exploded (panicked at "), "{message}");
        assert!(records[1].passed());

        let transcript = console.into_transcript();
        assert!(transcript.contains("Test crashed!\nPanicked: setup exploded.\npanicked at "));
    }

    #[test]
    fn test_setup_panic_is_reported_in_transcript() {
        let same = |name: &str| Callable::new(name, |_: &mut Io<'_>, _: &Args| Ok(1));
        let test = DiffTest::new(same("f"), same("f")).with_setup(|| panic!("setup boom"));
        let mut console = plain_console();

        let record = run_unit(0, &test, &mut console).unwrap();
        assert_eq!(record.status, TestStatus::Error);
        let message = record.message.unwrap();
        assert!(message.starts_with("setup boom (panicked at "), "{message}");
        assert!(message.contains("runner.rs:"));

        let transcript = console.into_transcript();
        assert!(transcript.contains("Panicked: setup boom.\npanicked at "));
        assert!(!transcript.contains("Testing f"));
    }

    #[test]
    fn test_exhaustion_stops_the_run() {
        let units: Vec<SharedUnit> = vec![
            Arc::new(Scripted::new("ok", true)),
            Arc::new(Scripted::new("greedy", true).exhausting()),
            Arc::new(Scripted::new("never", true)),
        ];
        let mut console = plain_console();

        let err = TestRunner::run_all(&units, &mut console).unwrap_err();
        assert!(matches!(err, GradeError::Aborted { index: 1, .. }));
        assert!(!console.into_transcript().contains("Testing never"));
    }
}
