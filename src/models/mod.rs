//! Data models for differential grading
//!
//! Call arguments, captured responses, and per-test / per-suite results.

mod args;
mod response;
mod test_result;

pub use args::Args;
pub use response::{Failure, Response, Side};
pub use test_result::{SuiteSummary, TestRecord, TestStatus};
