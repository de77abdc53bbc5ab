//! Timer utilities
//!
//! Wall-clock timing for test units and whole suite runs.

use std::time::{Duration, Instant};

/// Wall-clock timer for one test or a whole suite run
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whole milliseconds, as stored in test records
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Stop the timer, log the elapsed time and return it in milliseconds
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("{} took {}ms", self.label, elapsed);
        elapsed
    }
}
