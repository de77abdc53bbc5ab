//! Differential test engine for grading
//!
//! Runs a candidate implementation of a function next to a trusted
//! reference under identical, captured inputs, decides pass or fail, and
//! explains any divergence. Suites run in order or on a worker pool whose
//! output still appears in submission order.
//!
//! ```no_run
//! use diffgrade::capture::{Callable, Io};
//! use diffgrade::executor::Suite;
//! use diffgrade::models::Args;
//! use diffgrade::output::{Console, StatusFormatter};
//! use diffgrade::units::DiffTest;
//! use std::sync::Arc;
//!
//! # async fn grade() -> Result<(), diffgrade::GradeError> {
//! let double = |name: &str| {
//!     Callable::new(name, |_: &mut Io<'_>, args: &Args| Ok(args.get::<i64>(0)? * 2))
//! };
//!
//! let mut suite = Suite::new();
//! suite.add_test(
//!     DiffTest::new(double("double"), double("double")).with_args(Args::new().arg(21)),
//! );
//!
//! let mut console = Console::terminal(Arc::new(StatusFormatter::new()));
//! let summary = suite.run(&mut console).await?;
//! assert!(summary.is_all_passed());
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod compare;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod output;
pub mod sample;
pub mod units;
pub mod utils;

pub use error::GradeError;
