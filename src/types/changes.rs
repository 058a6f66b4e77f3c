//! Net file changes across a push.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which list of a commit (or of a change set) a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl ChangeKind {
    /// Single-character marker used when listing files in a notification.
    pub fn marker(self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Modified => '~',
            ChangeKind::Removed => '-',
        }
    }
}

/// The raw path lists of a single commit, duplicates and all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFiles {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
}

/// Paths added, modified and removed by a push.
///
/// After aggregation a path appears in at most one of the three sets. The
/// sets are ordered, so iteration is lexicographic and deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChangeSet {
    pub added: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl FileChangeSet {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a change set from explicit lists.
    ///
    /// No reconciliation happens here; use
    /// [`aggregate_changes`](crate::monitor::aggregate_changes) for commit data.
    pub fn from_lists<I, S>(added: I, modified: I, removed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FileChangeSet {
            added: added.into_iter().map(Into::into).collect(),
            modified: modified.into_iter().map(Into::into).collect(),
            removed: removed.into_iter().map(Into::into).collect(),
        }
    }

    /// Total number of paths across all three sets.
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Returns the set for the given kind.
    pub fn set(&self, kind: ChangeKind) -> &BTreeSet<String> {
        match kind {
            ChangeKind::Added => &self.added,
            ChangeKind::Modified => &self.modified,
            ChangeKind::Removed => &self.removed,
        }
    }

    /// Inserts a path into the set for the given kind.
    pub fn insert(&mut self, kind: ChangeKind, path: impl Into<String>) {
        let set = match kind {
            ChangeKind::Added => &mut self.added,
            ChangeKind::Modified => &mut self.modified,
            ChangeKind::Removed => &mut self.removed,
        };
        set.insert(path.into());
    }

    /// Iterates every path with its kind, added first, then modified, then removed.
    pub fn iter(&self) -> impl Iterator<Item = (ChangeKind, &str)> {
        let added = self.added.iter().map(|p| (ChangeKind::Added, p.as_str()));
        let modified = self
            .modified
            .iter()
            .map(|p| (ChangeKind::Modified, p.as_str()));
        let removed = self
            .removed
            .iter()
            .map(|p| (ChangeKind::Removed, p.as_str()));
        added.chain(modified).chain(removed)
    }
}
