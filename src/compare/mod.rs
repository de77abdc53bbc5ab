//! Response comparison
//!
//! Equality rules, divergence reports and progressive disclosure of
//! printed-output diffs.

mod comparator;
mod disclosure;

pub use comparator::{Divergence, ResponseComparator, Shown};
pub use disclosure::{Disclosure, ProgressiveDiff, DISCLOSURE_PROMPT};
