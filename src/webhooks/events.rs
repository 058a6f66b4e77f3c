//! GitHub webhook event types.
//!
//! Typed representations of the deliveries the relay acts on, carrying only
//! the fields the pipeline reads.
//!
//! | `X-GitHub-Event` | Event |
//! |------------------|-------|
//! | `push` | [`PushEvent`] |
//! | `create` / `delete` with `ref_type: branch` | [`BranchEvent`] |
//! | `ping` | [`WebhookEvent::Ping`] |
//!
//! Tag creation/deletion and every other event kind are ignored by the parser.

use serde::{Deserialize, Serialize};

use crate::types::{CommitFiles, CommitId, RepoName};

/// A parsed webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEvent {
    /// Commits were pushed to a ref.
    Push(PushEvent),

    /// A branch was created or deleted.
    Branch(BranchEvent),

    /// GitHub's hook-installation check. Acknowledged, never routed.
    Ping,
}

impl WebhookEvent {
    /// Returns the repository this event belongs to (`None` for pings).
    pub fn repo(&self) -> Option<&RepoName> {
        match self {
            WebhookEvent::Push(e) => Some(&e.repo),
            WebhookEvent::Branch(e) => Some(&e.repo),
            WebhookEvent::Ping => None,
        }
    }
}

/// A single commit within a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushCommit {
    pub id: CommitId,

    /// Full commit message, possibly multi-line.
    pub message: String,

    /// Link to the commit on GitHub.
    pub url: Option<String>,

    /// Commit author's display name.
    pub author: String,

    /// Paths touched by this commit.
    pub files: CommitFiles,
}

/// A push event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    pub repo: RepoName,

    pub repo_url: String,

    /// The full ref pushed to (e.g., `refs/heads/main`).
    pub git_ref: String,

    /// Commits in push order. Empty for ref-only updates such as a branch
    /// deletion by push.
    pub commits: Vec<PushCommit>,

    /// The commit the ref now points at, when GitHub supplies it.
    pub head_commit: Option<PushCommit>,

    /// Name of the user who pushed.
    pub pusher: String,
}

impl PushEvent {
    /// The most recent commit: `head_commit` if present, else the last commit.
    pub fn latest_commit(&self) -> Option<&PushCommit> {
        self.head_commit.as_ref().or_else(|| self.commits.last())
    }
}

/// What happened to a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchAction {
    Created,
    Deleted,
}

impl BranchAction {
    /// Past-tense verb, as used in notification titles.
    pub fn as_str(self) -> &'static str {
        match self {
            BranchAction::Created => "created",
            BranchAction::Deleted => "deleted",
        }
    }
}

/// A branch creation or deletion (`create` / `delete` events).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchEvent {
    pub repo: RepoName,

    pub repo_url: String,

    pub action: BranchAction,

    /// Branch name. GitHub sends it without a `refs/heads/` prefix.
    pub branch: String,

    /// Login of the user who created or deleted the branch.
    pub sender: String,
}
