//! Call-site rewriting: redirect bare helper calls to their new home.
//!
//! Walks source files, skips protected lines (declarations, comments), applies
//! the first matching whole-word rule per line, and optionally writes the result
//! back (otherwise returns a dry-run report).

mod classify;
mod engine;
mod rules;
mod select;

pub use classify::{LineClassifier, MarkerClassifier};
pub use engine::{FileHits, Hit, RewriteReport, Rewriter, RunMode};
pub use rules::{Rule, RuleChain, RuleMatch};
pub use select::FileSelector;
