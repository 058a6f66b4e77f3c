//! Handler for `create` and `delete` webhook events on branches.
//!
//! Branch lifecycle events always notify; file patterns do not apply.

use crate::types::{EventKind, NotificationMessage};
use crate::webhooks::events::{BranchAction, BranchEvent};

use super::HandlerOutcome;

/// Handles a branch creation or deletion.
pub fn handle_branch(event: &BranchEvent) -> HandlerOutcome {
    let action = event.action.as_str();

    let event_kind = match event.action {
        BranchAction::Created => EventKind::BranchCreate,
        BranchAction::Deleted => EventKind::BranchDelete,
    };

    HandlerOutcome::Notify(NotificationMessage {
        repo: event.repo.clone(),
        repo_url: event.repo_url.clone(),
        event_kind,
        branch: event.branch.clone(),
        author: event.sender.clone(),
        title: format!("Branch {} {}", event.branch, action),
        details: format!("Branch {} was {} by {}", event.branch, action, event.sender),
        files: None,
        matched_patterns: None,
        url: Some(format!(
            "{}/tree/{}",
            event.repo_url.trim_end_matches('/'),
            event.branch
        )),
    })
}
