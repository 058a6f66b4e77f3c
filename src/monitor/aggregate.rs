//! Folding per-commit file lists into one net change set.
//!
//! A push carries an ordered list of commits, each with its own
//! added/modified/removed lists. The same path can show up in several commits,
//! so the lists are unioned per category and then reconciled:
//!
//! | Seen as | Net result |
//! |---------|------------|
//! | added + modified | added |
//! | added + removed | nothing |
//! | added + modified + removed | nothing |
//!
//! Modified is reconciled against added first, so stripping an added+removed
//! path afterwards cannot bring it back as a modification.

use crate::types::{CommitFiles, FileChangeSet};

/// Aggregates the file lists of every commit in a push.
///
/// Duplicate commits are harmless: aggregating a commit twice yields the same
/// change set as aggregating it once.
pub fn aggregate_changes<'a, I>(commits: I) -> FileChangeSet
where
    I: IntoIterator<Item = &'a CommitFiles>,
{
    let mut changes = FileChangeSet::new();

    for commit in commits {
        changes.added.extend(commit.added.iter().cloned());
        changes.modified.extend(commit.modified.iter().cloned());
        changes.removed.extend(commit.removed.iter().cloned());
    }

    // A file created in this push is new, not an edit.
    let added = &changes.added;
    changes.modified.retain(|path| !added.contains(path));

    // Created and deleted within the same push: invisible from outside.
    let transient: Vec<String> = changes
        .added
        .intersection(&changes.removed)
        .cloned()
        .collect();
    for path in &transient {
        changes.added.remove(path);
        changes.removed.remove(path);
    }

    changes
}
