//! Notification delivery.
//!
//! The [`Dispatcher`] renders a [`NotificationMessage`](crate::types::NotificationMessage)
//! once per enabled channel and hands it to a transport. Transports are traits
//! so tests can substitute recording or failing doubles:
//!
//! - [`MailTransport`]: production [`SmtpMailer`]
//! - [`ChatTransport`]: production [`TelegramBot`]

mod dispatch;
mod email;
mod telegram;

use std::fmt;
use std::future::Future;
use thiserror::Error;

use crate::config::ParseMode;

pub use dispatch::{DeliveryOutcome, DispatchSummary, Dispatcher};
pub use email::SmtpMailer;
pub use telegram::TelegramBot;

/// A notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Email,
    Telegram,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Email => write!(f, "email"),
            ChannelKind::Telegram => write!(f, "telegram"),
        }
    }
}

/// Why a single channel delivery failed.
///
/// These never escape the dispatcher; they are logged and tallied.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("{0} transport is not configured")]
    NotConfigured(ChannelKind),

    #[error("no Telegram chat id configured for this repository and no default set")]
    NoChatId,

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected by the remote API: {0}")]
    Rejected(String),

    #[error("delivery panicked")]
    Panicked,
}

/// A fully rendered email ready to hand to a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender, optionally with a display name (`Name <addr>`).
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Sends rendered emails.
pub trait MailTransport: Send + Sync {
    fn send(&self, mail: OutgoingMail) -> impl Future<Output = Result<(), ChannelError>> + Send;
}

/// Posts rendered text to a chat.
pub trait ChatTransport: Send + Sync {
    fn send(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: ParseMode,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;
}
