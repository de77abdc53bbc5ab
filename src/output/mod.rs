//! Output module
//!
//! Tone rendering, transcript sinks and summary export.

mod console;
mod formatter;

pub use console::Console;
pub use formatter::{
    format_summary, write_summary_to_file, ExportFormat, Render, StatusFormatter, Tone,
};
