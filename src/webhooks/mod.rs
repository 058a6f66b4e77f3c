//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256)
//! - Event parsing into typed events
//! - Routing and pure event handlers that build notification messages

pub mod events;
pub mod handlers;
pub mod parser;
pub mod signature;

pub use events::{BranchAction, BranchEvent, PushCommit, PushEvent, WebhookEvent};
pub use handlers::{
    HandlerOutcome, RouteDecision, SkipReason, branch_name, handle_branch, handle_event,
    handle_push, route_event,
};
pub use parser::{ParseError, parse_webhook};
pub use signature::{
    SignatureError, SignatureVerifier, Verification, VerifyMode, compute_signature,
    format_signature_header, parse_signature_header, verify_signature,
};
