//! Test execution engine
//!
//! Provides sequential and parallel test execution capabilities.

mod parallel;
mod runner;
mod suite;

use std::sync::Arc;

use crate::units::TestUnit;

pub use parallel::{default_workers, OrderingGate, ParallelExecutor, Ticket};
pub use runner::{run_unit, TestRunner};
pub use suite::{CompletionCallback, ExecutionMode, Suite, PROGRESSIVE_PARALLEL_WARNING};

/// A test unit shared between the suite and its workers
pub type SharedUnit = Arc<dyn TestUnit>;
