//! Grading errors
//!
//! Failures of the grading machinery itself. Errors raised by the code
//! under test are never surfaced here; they are recorded in a `Response`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::capture::BufferExhausted;

#[derive(Error, Debug)]
pub enum GradeError {
    /// A test read past its supplied stdin lines; the suite stops
    #[error("Test #{index} ({name}) aborted: {source}")]
    Aborted {
        index: usize,
        name: String,
        #[source]
        source: BufferExhausted,
    },

    #[error(transparent)]
    Exhausted(#[from] BufferExhausted),

    #[error("Failed to read stdin lines from {}: {source}", .path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write report: {0}")]
    Report(#[from] io::Error),
}

impl GradeError {
    /// Attach the position and name of the test that raised this error
    pub fn at(self, index: usize, name: &str) -> Self {
        match self {
            GradeError::Exhausted(source) => GradeError::Aborted {
                index,
                name: name.to_string(),
                source,
            },
            other => other,
        }
    }
}
