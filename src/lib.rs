//! git-notify - relays GitHub push and branch webhooks to email and Telegram.
//!
//! A delivery flows through:
//!
//! 1. [`webhooks`]: signature verification, parsing, routing and the pure
//!    push/branch handlers that build a [`types::NotificationMessage`]
//! 2. [`monitor`]: file-change aggregation and glob matching used by the push
//!    handler
//! 3. [`notify`]: concurrent fan-out to the enabled channels, rendered by
//!    [`format`]
//!
//! [`config`] resolves per-repository settings and [`server`] exposes the
//! HTTP endpoints.

pub mod config;
pub mod format;
pub mod monitor;
pub mod notify;
pub mod pipeline;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
mod test_utils;
