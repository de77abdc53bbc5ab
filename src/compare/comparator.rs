//! Reference / candidate comparison
//!
//! Decides whether two responses are equivalent for grading purposes and,
//! when they are not, explains the most important difference.

use std::fmt::Debug;
use std::mem;

use similar::TextDiff;

use crate::models::{Failure, Response, Side};
use crate::output::{Render, Tone};

/// Lines of unchanged context around each diff hunk
const CONTEXT_RADIUS: usize = 3;

/// A value as shown in a report
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shown {
    pub side: Side,
    pub repr: String,
}

/// The highest-priority difference between two responses
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Divergence {
    /// Exactly one side failed
    Failure { side: Side, failure: Failure },
    /// Printed output differs; holds a unified diff
    Output { unified: String },
    /// Return values differ
    Value { left: Shown, right: Shown },
    /// Exactly one side warned
    Warning { side: Side, warning: String },
}

impl Divergence {
    /// Short label for records and logs
    pub fn summary(&self) -> String {
        match self {
            Divergence::Failure { side, .. } => format!("{side} threw an unexpected error"),
            Divergence::Output { .. } => "Difference in printed output".to_string(),
            Divergence::Value { .. } => "Difference in value".to_string(),
            Divergence::Warning { side, .. } => format!("{side} caused a warning"),
        }
    }

    /// Unified diff text for output divergences
    pub fn unified(&self) -> Option<&str> {
        match self {
            Divergence::Output { unified } => Some(unified),
            _ => None,
        }
    }

    /// Heading line that introduces the report
    pub fn heading(&self, render: &dyn Render) -> String {
        match self {
            Divergence::Failure { side, .. } => render.render(
                &format!("{} threw an unexpected error:", side.title()),
                Tone::Info,
            ),
            Divergence::Output { .. } => render.render("Difference in printed output:", Tone::Info),
            Divergence::Value { .. } => render.render("Difference in value:", Tone::Info),
            Divergence::Warning { side, .. } => render.render(
                &format!("{} caused a warning:", side.title()),
                Tone::Warning,
            ),
        }
    }

    /// Full human-readable report
    pub fn render(&self, render: &dyn Render) -> String {
        let heading = self.heading(render);
        match self {
            Divergence::Failure { failure, .. } => format!("{heading}\n{failure}"),
            Divergence::Output { unified } => format!("{heading}\n{unified}"),
            Divergence::Value { left, right } => format!(
                "{heading}\n{}: {}\n{}: {}",
                left.side, left.repr, right.side, right.repr
            ),
            Divergence::Warning { warning, .. } => format!("{heading} {}", warning.trim_end()),
        }
    }
}

/// Grading comparator for captured responses
pub struct ResponseComparator;

impl ResponseComparator {
    /// True when the two outcomes are indistinguishable for grading.
    ///
    /// Two failures always compare equal; stderr and warnings are ignored.
    pub fn equal<R: PartialEq>(a: &Response<R>, b: &Response<R>) -> bool {
        if a.is_failure() && b.is_failure() {
            return true;
        }

        values_match(a, b) && a.stdout() == b.stdout() && a.is_failure() == b.is_failure()
    }

    /// Explain the first applicable difference, in fixed priority order.
    ///
    /// Computing an output diff marks `a` as having diverged output.
    pub fn diff<R: PartialEq + Debug>(a: &Response<R>, b: &Response<R>) -> Option<Divergence> {
        match (a.failure(), b.failure()) {
            (Some(failure), None) => {
                return Some(Divergence::Failure {
                    side: a.side(),
                    failure: failure.clone(),
                })
            }
            (None, Some(failure)) => {
                return Some(Divergence::Failure {
                    side: b.side(),
                    failure: failure.clone(),
                })
            }
            (Some(_), Some(_)) => return None,
            (None, None) => {}
        }

        if a.stdout() != b.stdout() {
            let unified = unified_diff(a, b);
            a.mark_output_divergence();
            return Some(Divergence::Output { unified });
        }

        if !values_match(a, b) {
            return Some(Divergence::Value {
                left: shown(a),
                right: shown(b),
            });
        }

        match (a.warning(), b.warning()) {
            (Some(warning), None) => Some(Divergence::Warning {
                side: a.side(),
                warning: warning.to_string(),
            }),
            (None, Some(warning)) => Some(Divergence::Warning {
                side: b.side(),
                warning: warning.to_string(),
            }),
            _ => None,
        }
    }
}

/// A zero-sized return type carries no information, so a side that exited
/// early matches one that returned normally.
fn values_match<R: PartialEq>(a: &Response<R>, b: &Response<R>) -> bool {
    if mem::size_of::<R>() == 0 && !a.is_failure() && !b.is_failure() {
        return true;
    }
    a.value() == b.value()
}

fn shown<R: Debug>(response: &Response<R>) -> Shown {
    let repr = match response.value() {
        Some(value) => format!("{value:?}"),
        None => "<no value>".to_string(),
    };
    Shown {
        side: response.side(),
        repr,
    }
}

fn unified_diff<R>(a: &Response<R>, b: &Response<R>) -> String {
    TextDiff::from_lines(a.stdout(), b.stdout())
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(a.side().label(), b.side().label())
        .to_string()
        .trim()
        .to_string()
}
