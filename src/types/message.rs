//! The canonical notification handed to the dispatcher.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::changes::FileChangeSet;
use super::ids::RepoName;

/// The kind of source-control event a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Push,
    BranchCreate,
    BranchDelete,
}

impl EventKind {
    /// Human-readable label used as a heading by the formatters.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Push => "New commits pushed",
            EventKind::BranchCreate => "Branch created",
            EventKind::BranchDelete => "Branch deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Push => "push",
            EventKind::BranchCreate => "branch_create",
            EventKind::BranchDelete => "branch_delete",
        };
        write!(f, "{}", s)
    }
}

/// A notification built once per qualifying event and read by every channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Repository full name (`owner/name`).
    pub repo: RepoName,

    /// Repository web URL.
    pub repo_url: String,

    pub event_kind: EventKind,

    /// Branch name without the `refs/heads/` prefix.
    pub branch: String,

    /// Pusher name for pushes, sender login for branch events.
    pub author: String,

    /// Short one-line summary.
    pub title: String,

    /// Commit message or branch action description. May span several lines;
    /// formatters render only the first.
    pub details: String,

    /// Changed files, when the event carries any.
    pub files: Option<FileChangeSet>,

    /// Patterns that matched, only when the repository configures patterns.
    pub matched_patterns: Option<Vec<String>>,

    /// Deep link to the commit or branch.
    pub url: Option<String>,
}

impl NotificationMessage {
    /// The first line of [`details`](Self::details).
    pub fn details_headline(&self) -> &str {
        self.details.lines().next().unwrap_or("")
    }

    /// Changed files, treating an empty set as absent.
    pub fn non_empty_files(&self) -> Option<&FileChangeSet> {
        self.files.as_ref().filter(|f| !f.is_empty())
    }

    /// Matched patterns, treating an empty list as absent.
    pub fn non_empty_patterns(&self) -> Option<&[String]> {
        self.matched_patterns
            .as_deref()
            .filter(|patterns| !patterns.is_empty())
    }
}
