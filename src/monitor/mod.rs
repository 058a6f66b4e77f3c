//! File-change monitoring for push events.
//!
//! - [`aggregate`]: folds per-commit file lists into a net [`FileChangeSet`]
//! - [`patterns`]: filters a change set through configured glob patterns
//!
//! [`FileChangeSet`]: crate::types::FileChangeSet

pub mod aggregate;
pub mod patterns;

pub use aggregate::aggregate_changes;
pub use patterns::{FilePattern, InvalidPattern, PatternMatch, WILDCARD_PATTERN, match_patterns};
