//! GitHub webhook payload parser.
//!
//! Parses raw webhook JSON payloads into typed [`WebhookEvent`] values.
//!
//! # Parsing Strategy
//!
//! 1. The event kind comes from the `X-GitHub-Event` header
//! 2. The payload is parsed according to that kind
//! 3. Unknown kinds and non-branch ref events (tags) return `Ok(None)` (ignored, not error)
//! 4. Malformed payloads return `Err` with details

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::types::{CommitFiles, CommitId, RepoName};

use super::events::{BranchAction, BranchEvent, PushCommit, PushEvent, WebhookEvent};

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Parses a webhook payload into a typed event.
///
/// # Returns
///
/// * `Ok(Some(event))` - A push, branch or ping event
/// * `Ok(None)` - An ignored event kind, or a non-branch (tag) create/delete
/// * `Err(e)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use git_notify::webhooks::{parse_webhook, WebhookEvent};
///
/// let payload = br#"{
///     "ref": "feature/login",
///     "ref_type": "branch",
///     "repository": {
///         "full_name": "octocat/hello-world",
///         "html_url": "https://github.com/octocat/hello-world"
///     },
///     "sender": { "login": "octocat" }
/// }"#;
///
/// let event = parse_webhook("create", payload).unwrap();
/// assert!(matches!(event, Some(WebhookEvent::Branch(_))));
///
/// assert!(parse_webhook("issues", b"{}").unwrap().is_none());
/// ```
pub fn parse_webhook(event_type: &str, payload: &[u8]) -> Result<Option<WebhookEvent>, ParseError> {
    match event_type {
        "push" => parse_push(payload).map(|e| Some(WebhookEvent::Push(e))),
        "create" => parse_branch(payload, BranchAction::Created).map(|o| o.map(WebhookEvent::Branch)),
        "delete" => parse_branch(payload, BranchAction::Deleted).map(|o| o.map(WebhookEvent::Branch)),
        "ping" => Ok(Some(WebhookEvent::Ping)),
        _ => Ok(None),
    }
}

// ============================================================================
// Raw payload structures for deserialization
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct RawGitUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawSender {
    login: String,
}

// ============================================================================
// push event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPushPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    #[serde(default)]
    commits: Vec<RawCommit>,
    head_commit: Option<RawCommit>,
    repository: RawRepository,
    pusher: RawGitUser,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    id: String,
    #[serde(default)]
    message: String,
    url: Option<String>,
    author: Option<RawGitUser>,
    #[serde(default)]
    added: Vec<String>,
    #[serde(default)]
    modified: Vec<String>,
    #[serde(default)]
    removed: Vec<String>,
}

impl From<RawCommit> for PushCommit {
    fn from(raw: RawCommit) -> Self {
        PushCommit {
            id: CommitId::new(raw.id),
            message: raw.message,
            url: raw.url,
            author: raw.author.map(|a| a.name).unwrap_or_default(),
            files: CommitFiles {
                added: raw.added,
                modified: raw.modified,
                removed: raw.removed,
            },
        }
    }
}

fn parse_push(payload: &[u8]) -> Result<PushEvent, ParseError> {
    let raw: RawPushPayload = serde_json::from_slice(payload)?;

    Ok(PushEvent {
        repo: RepoName::new(raw.repository.full_name),
        repo_url: raw.repository.html_url,
        git_ref: raw.git_ref,
        commits: raw.commits.into_iter().map(PushCommit::from).collect(),
        head_commit: raw.head_commit.map(PushCommit::from),
        pusher: raw.pusher.name,
    })
}

// ============================================================================
// create / delete events
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawBranchPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    ref_type: String,
    repository: RawRepository,
    sender: RawSender,
}

fn parse_branch(payload: &[u8], action: BranchAction) -> Result<Option<BranchEvent>, ParseError> {
    let raw: RawBranchPayload = serde_json::from_slice(payload)?;

    // Tags share the create/delete events but are not handled
    if raw.ref_type != "branch" {
        debug!(ref_type = %raw.ref_type, git_ref = %raw.git_ref, "Ignoring non-branch ref event");
        return Ok(None);
    }

    Ok(Some(BranchEvent {
        repo: RepoName::new(raw.repository.full_name),
        repo_url: raw.repository.html_url,
        action,
        branch: raw.git_ref,
        sender: raw.sender.login,
    }))
}
