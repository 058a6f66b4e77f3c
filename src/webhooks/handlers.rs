//! Event handlers for GitHub webhook events.
//!
//! Handlers are pure: they take a parsed event plus the repository's
//! effective configuration and decide whether to notify, returning the
//! [`NotificationMessage`] to dispatch. Delivery happens elsewhere.
//!
//! | Event | Handler |
//! |-------|---------|
//! | `push` | [`handle_push`] - aggregate, match patterns, summarise commits |
//! | `create` / `delete` | [`handle_branch`] - announce the branch change |
//!
//! Before a handler runs, [`route_event`] checks that the repository is
//! monitored and that the event kind is enabled for it.

mod branch;
mod push;

use std::fmt;

use crate::config::{AppConfig, EffectiveConfig};
use crate::types::NotificationMessage;
use crate::webhooks::WebhookEvent;

pub use branch::handle_branch;
pub use push::{BRANCH_REF_PREFIX, branch_name, handle_push};

/// Why an event produced no notification.
///
/// These are normal outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `ping` deliveries are acknowledged only.
    Ping,
    /// The repository is not in the monitor list.
    NotMonitored,
    /// The repository has push events disabled.
    PushDisabled,
    /// The repository has branch events disabled.
    BranchDisabled,
    /// The push carried no commits.
    NoCommits,
    /// Patterns are configured and no changed file matched them.
    NoPatternMatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::Ping => "ping event",
            SkipReason::NotMonitored => "repository is not monitored",
            SkipReason::PushDisabled => "push events disabled",
            SkipReason::BranchDisabled => "branch events disabled",
            SkipReason::NoCommits => "no commits in push",
            SkipReason::NoPatternMatch => "no files matched configured patterns",
        };
        write!(f, "{}", s)
    }
}

/// Result of handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// Send this message to the repository's channels.
    Notify(NotificationMessage),
    /// Do nothing.
    Skip(SkipReason),
}

impl HandlerOutcome {
    /// Returns the message if the outcome is a notification.
    pub fn message(&self) -> Option<&NotificationMessage> {
        match self {
            HandlerOutcome::Notify(message) => Some(message),
            HandlerOutcome::Skip(_) => None,
        }
    }
}

/// Routing verdict for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Handle the event with this configuration.
    Handle(EffectiveConfig),
    /// Drop the event.
    Drop(SkipReason),
}

/// Decides whether an event reaches its handler.
///
/// An event is forwarded only if its repository is monitored and the
/// resolved configuration enables its kind.
pub fn route_event(event: &WebhookEvent, config: &AppConfig) -> RouteDecision {
    let repo = match event.repo() {
        Some(repo) => repo,
        None => return RouteDecision::Drop(SkipReason::Ping),
    };

    let effective = match config.resolve(repo.as_str()) {
        Some(effective) => effective,
        None => return RouteDecision::Drop(SkipReason::NotMonitored),
    };

    match event {
        WebhookEvent::Push(_) if !effective.events.push => {
            RouteDecision::Drop(SkipReason::PushDisabled)
        }
        WebhookEvent::Branch(_) if !effective.events.branch => {
            RouteDecision::Drop(SkipReason::BranchDisabled)
        }
        _ => RouteDecision::Handle(effective),
    }
}

/// Handles a routed webhook event.
///
/// This is the main entry point for event handling. It dispatches to the
/// appropriate handler based on the event type.
pub fn handle_event(event: &WebhookEvent, config: &EffectiveConfig) -> HandlerOutcome {
    match event {
        WebhookEvent::Push(e) => handle_push(e, config),
        WebhookEvent::Branch(e) => handle_branch(e),
        WebhookEvent::Ping => HandlerOutcome::Skip(SkipReason::Ping),
    }
}
