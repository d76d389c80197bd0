// Public modules
pub mod defaults;
pub mod error;
pub mod legacy;
pub mod report;
pub mod rewrite;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use rewrite::{FileHits, Hit, RewriteReport, Rewriter, RunMode};
