//! Handler for `push` webhook events.
//!
//! A push notifies unless it carries no commits, or the repository
//! configures file patterns and none of the pushed files match them.

use tracing::{debug, info};

use crate::config::EffectiveConfig;
use crate::monitor::{aggregate_changes, match_patterns};
use crate::types::{EventKind, NotificationMessage};
use crate::webhooks::events::PushEvent;

use super::{HandlerOutcome, SkipReason};

/// Ref namespace of branches.
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Placeholder details when the latest commit has an empty message.
const NO_COMMIT_MESSAGE: &str = "No commit message";

/// Strips the branch namespace from a ref; other refs are returned as-is.
pub fn branch_name(git_ref: &str) -> &str {
    git_ref.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(git_ref)
}

/// Handles a push event.
///
/// # Flow
///
/// | Step | Skip when |
/// |------|-----------|
/// | Check commits | the push has none |
/// | Aggregate files across commits | - |
/// | Match against `files` patterns | patterns exist and nothing matched |
/// | Build message | - |
pub fn handle_push(event: &PushEvent, config: &EffectiveConfig) -> HandlerOutcome {
    if event.commits.is_empty() {
        return HandlerOutcome::Skip(SkipReason::NoCommits);
    }

    let branch = branch_name(&event.git_ref);

    let changes = aggregate_changes(event.commits.iter().map(|c| &c.files));
    let result = match_patterns(&changes, &config.files);

    let has_patterns = !config.files.is_empty();
    if has_patterns && !result.matched {
        info!(
            repo = %event.repo,
            files = changes.len(),
            patterns = config.files.len(),
            "No changed files matched configured patterns"
        );
        return HandlerOutcome::Skip(SkipReason::NoPatternMatch);
    }

    for commit in &event.commits {
        debug!(
            repo = %event.repo,
            commit = %commit.id.short(),
            message = %commit.message.lines().next().unwrap_or(""),
            "Pushed commit"
        );
    }

    let count = event.commits.len();
    let noun = if count == 1 { "commit" } else { "commits" };
    let latest = event.latest_commit();

    let details = latest
        .map(|c| c.message.as_str())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(NO_COMMIT_MESSAGE)
        .to_string();

    HandlerOutcome::Notify(NotificationMessage {
        repo: event.repo.clone(),
        repo_url: event.repo_url.clone(),
        event_kind: EventKind::Push,
        branch: branch.to_string(),
        author: event.pusher.clone(),
        title: format!("{} new {} pushed to {}", count, noun, branch),
        details,
        files: Some(result.files),
        matched_patterns: has_patterns.then_some(result.matched_patterns),
        url: latest.and_then(|c| c.url.clone()),
    })
}
