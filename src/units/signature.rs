//! Call-signature summaries for start messages

use crate::models::Args;

/// Longest summary shown before detail is dropped
pub const SIGNATURE_BUDGET: usize = 57;

const SEVERAL: &str = "...several arguments...";

/// Describe a call to `name` with `args`, optionally fed from `input_file`.
///
/// Detail is dropped step by step until the text fits; the last fallback
/// is used even when it is still too long.
pub fn summarize(name: &str, args: &Args, input_file: Option<&str>) -> String {
    let full = format!("{name}({})", args.render());
    let several = format!("{name}({SEVERAL})");

    let attempts = match input_file {
        None => vec![full],
        Some(file) => vec![
            format!("{full} (input from {file})"),
            format!("{several} (input from {file})"),
            format!("{name}(...) (input from {file})"),
        ],
    };

    attempts
        .into_iter()
        .find(|text| text.chars().count() <= SIGNATURE_BUDGET)
        .unwrap_or(several)
}
