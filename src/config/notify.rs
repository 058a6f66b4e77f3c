//! Notification channel settings.
//!
//! In the YAML file each channel accepts either a boolean or a structured
//! value:
//!
//! ```yaml
//! notify:
//!   email: [dev@example.com, ops@example.com]   # or false
//!   telegram: { chat_id: "-100123", parse_mode: markdown_v2 }   # or true
//! ```
//!
//! These raw shapes are resolved once, during config resolution, into a
//! [`ChannelSetting`] so the dispatcher never inspects them ad hoc.

use serde::{Deserialize, Deserializer};

/// Raw `notify.email` value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EmailSetting {
    Toggle(bool),
    Recipients(Vec<String>),
}

/// Raw `notify.telegram` value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TelegramSetting {
    Toggle(bool),
    Options(TelegramOptions),
}

/// Markup dialect a Telegram message is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    #[default]
    Html,
    MarkdownV2,
}

impl ParseMode {
    /// The `parse_mode` value the Bot API expects.
    pub fn api_value(self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::MarkdownV2 => "MarkdownV2",
        }
    }
}

/// Per-repository Telegram options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TelegramOptions {
    /// Chat to post to instead of the process-wide default.
    ///
    /// YAML may give it as a string or a bare number (`-1001234567890`).
    #[serde(default, alias = "chatId", deserialize_with = "deserialize_chat_id")]
    pub chat_id: Option<String>,

    #[serde(default, alias = "parseMode")]
    pub parse_mode: ParseMode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChatId {
    Text(String),
    Number(i64),
}

fn deserialize_chat_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawChatId>::deserialize(deserializer)?.map(|raw| match raw {
        RawChatId::Text(id) => id,
        RawChatId::Number(id) => id.to_string(),
    }))
}

/// The `notify` block, used both for defaults and for per-repo overrides.
///
/// An absent key means "inherit"; see [`NotifyConfig::merged_over`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub email: Option<EmailSetting>,

    #[serde(default)]
    pub telegram: Option<TelegramSetting>,
}

impl NotifyConfig {
    /// Overlays `self` on `base` key by key.
    pub fn merged_over(&self, base: &NotifyConfig) -> NotifyConfig {
        NotifyConfig {
            email: self.email.clone().or_else(|| base.email.clone()),
            telegram: self.telegram.clone().or_else(|| base.telegram.clone()),
        }
    }

    /// Resolves the raw values into channel settings.
    pub fn resolve(&self) -> EffectiveNotify {
        EffectiveNotify {
            email: resolve_email(self.email.as_ref()),
            telegram: resolve_telegram(self.telegram.as_ref()),
        }
    }
}

/// Whether a channel is enabled, with its options when it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSetting<T> {
    Disabled,
    Enabled(T),
}

impl<T> ChannelSetting<T> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ChannelSetting::Enabled(_))
    }

    pub fn options(&self) -> Option<&T> {
        match self {
            ChannelSetting::Enabled(options) => Some(options),
            ChannelSetting::Disabled => None,
        }
    }
}

/// Resolved notification settings for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveNotify {
    /// Enabled only with at least one explicit recipient.
    pub email: ChannelSetting<Vec<String>>,

    pub telegram: ChannelSetting<TelegramOptions>,
}

impl EffectiveNotify {
    /// True if no channel is enabled.
    pub fn is_silent(&self) -> bool {
        !self.email.is_enabled() && !self.telegram.is_enabled()
    }
}

fn resolve_email(setting: Option<&EmailSetting>) -> ChannelSetting<Vec<String>> {
    match setting {
        // `true` alone names nobody to send to.
        Some(EmailSetting::Recipients(list)) => {
            let recipients: Vec<String> = list
                .iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();
            if recipients.is_empty() {
                ChannelSetting::Disabled
            } else {
                ChannelSetting::Enabled(recipients)
            }
        }
        Some(EmailSetting::Toggle(_)) | None => ChannelSetting::Disabled,
    }
}

fn resolve_telegram(setting: Option<&TelegramSetting>) -> ChannelSetting<TelegramOptions> {
    match setting {
        Some(TelegramSetting::Toggle(true)) => ChannelSetting::Enabled(TelegramOptions::default()),
        Some(TelegramSetting::Options(options)) => ChannelSetting::Enabled(options.clone()),
        Some(TelegramSetting::Toggle(false)) | None => ChannelSetting::Disabled,
    }
}
