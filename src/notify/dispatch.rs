use futures::future::{BoxFuture, FutureExt, join_all};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, warn};

use super::{ChannelError, ChannelKind, ChatTransport, MailTransport, OutgoingMail};
use crate::config::{ChannelSetting, EffectiveNotify, ParseMode, TelegramOptions};
use crate::format::{email_subject, render_email_html, render_markdown_v2, render_telegram_html};
use crate::types::NotificationMessage;

/// The result of one channel delivery.
#[derive(Debug)]
pub struct DeliveryOutcome {
    pub channel: ChannelKind,
    pub result: Result<(), ChannelError>,
}

/// Tally of a dispatch across all enabled channels.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DispatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// True if no channel was enabled.
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Fans a notification out to every enabled channel.
///
/// Transports are optional: a channel enabled in config without a transport
/// fails locally with [`ChannelError::NotConfigured`] and is counted like any
/// other failure.
pub struct Dispatcher<M, C> {
    mail: Option<M>,
    chat: Option<C>,
    email_from: String,
    default_chat_id: Option<String>,
}

impl<M, C> Dispatcher<M, C>
where
    M: MailTransport,
    C: ChatTransport,
{
    pub fn new(
        mail: Option<M>,
        chat: Option<C>,
        email_from: impl Into<String>,
        default_chat_id: Option<String>,
    ) -> Self {
        Dispatcher {
            mail,
            chat,
            email_from: email_from.into(),
            default_chat_id,
        }
    }

    /// Sends `message` on every channel enabled in `notify`.
    ///
    /// All sends run concurrently and are awaited together. A failing or
    /// panicking channel does not affect the others, and this never fails.
    pub async fn dispatch(
        &self,
        message: &NotificationMessage,
        notify: &EffectiveNotify,
    ) -> DispatchSummary {
        let mut sends: Vec<BoxFuture<'_, DeliveryOutcome>> = Vec::new();

        if let ChannelSetting::Enabled(recipients) = &notify.email {
            sends.push(guarded(ChannelKind::Email, self.send_email(message, recipients)).boxed());
        }
        if let ChannelSetting::Enabled(options) = &notify.telegram {
            sends.push(
                guarded(ChannelKind::Telegram, self.send_telegram(message, options)).boxed(),
            );
        }

        if sends.is_empty() {
            info!(repo = %message.repo, "No notification channels enabled");
            return DispatchSummary::default();
        }

        let outcomes = join_all(sends).await;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => debug!(
                    repo = %message.repo,
                    channel = %outcome.channel,
                    "Notification delivered"
                ),
                Err(e) => warn!(
                    repo = %message.repo,
                    channel = %outcome.channel,
                    error = %e,
                    "Notification delivery failed"
                ),
            }
        }

        let summary = DispatchSummary { outcomes };
        info!(
            repo = %message.repo,
            event = %message.event_kind,
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "Notifications dispatched"
        );
        summary
    }

    async fn send_email(
        &self,
        message: &NotificationMessage,
        recipients: &[String],
    ) -> Result<(), ChannelError> {
        let mailer = self
            .mail
            .as_ref()
            .ok_or(ChannelError::NotConfigured(ChannelKind::Email))?;

        let mail = OutgoingMail {
            from: self.email_from.clone(),
            to: recipients.to_vec(),
            subject: email_subject(message),
            html: render_email_html(message),
        };
        mailer.send(mail).await
    }

    async fn send_telegram(
        &self,
        message: &NotificationMessage,
        options: &TelegramOptions,
    ) -> Result<(), ChannelError> {
        let bot = self
            .chat
            .as_ref()
            .ok_or(ChannelError::NotConfigured(ChannelKind::Telegram))?;

        let non_blank = |id: &&str| !id.trim().is_empty();
        let chat_id = options
            .chat_id
            .as_deref()
            .filter(non_blank)
            .or(self.default_chat_id.as_deref().filter(non_blank))
            .ok_or(ChannelError::NoChatId)?;

        let text = match options.parse_mode {
            ParseMode::Html => render_telegram_html(message),
            ParseMode::MarkdownV2 => render_markdown_v2(message),
        };
        bot.send(chat_id, &text, options.parse_mode).await
    }
}

/// Runs one delivery, turning a panic into a failed outcome.
async fn guarded<F>(channel: ChannelKind, send: F) -> DeliveryOutcome
where
    F: Future<Output = Result<(), ChannelError>>,
{
    let result = match AssertUnwindSafe(send).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(ChannelError::Panicked),
    };
    DeliveryOutcome { channel, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        FailingChat, FailingMailer, PanickingChat, RecordingChat, RecordingMailer, sample_message,
    };

    fn notify(email: &[&str], telegram: Option<TelegramOptions>) -> EffectiveNotify {
        EffectiveNotify {
            email: if email.is_empty() {
                ChannelSetting::Disabled
            } else {
                ChannelSetting::Enabled(email.iter().map(|s| s.to_string()).collect())
            },
            telegram: match telegram {
                Some(options) => ChannelSetting::Enabled(options),
                None => ChannelSetting::Disabled,
            },
        }
    }

    #[tokio::test]
    async fn no_enabled_channels_is_a_noop() {
        let mailer = RecordingMailer::default();
        let chat = RecordingChat::default();
        let dispatcher = Dispatcher::new(
            Some(mailer.clone()),
            Some(chat.clone()),
            "from@example.com",
            Some("42".to_string()),
        );

        let summary = dispatcher.dispatch(&sample_message(), &notify(&[], None)).await;

        assert!(summary.is_noop());
        assert!(mailer.sent().is_empty());
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn sends_to_both_channels() {
        let mailer = RecordingMailer::default();
        let chat = RecordingChat::default();
        let dispatcher = Dispatcher::new(
            Some(mailer.clone()),
            Some(chat.clone()),
            "Git Monitor <noreply@example.com>",
            Some("42".to_string()),
        );

        let summary = dispatcher
            .dispatch(
                &sample_message(),
                &notify(&["dev@example.com"], Some(TelegramOptions::default())),
            )
            .await;

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 0);

        let mails = mailer.sent();
        assert_eq!(mails.len(), 1);
        assert_eq!(mails[0].to, vec!["dev@example.com".to_string()]);
        assert_eq!(mails[0].from, "Git Monitor <noreply@example.com>");
        assert!(mails[0].subject.starts_with("[octocat/hello-world] "));

        let chats = chat.sent();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].chat_id, "42");
        assert_eq!(chats[0].parse_mode, ParseMode::Html);
        assert!(chats[0].text.contains("<b>New commits pushed</b>"));
    }

    #[tokio::test]
    async fn repo_chat_id_overrides_default_and_selects_markdown() {
        let chat = RecordingChat::default();
        let dispatcher: Dispatcher<RecordingMailer, _> =
            Dispatcher::new(None, Some(chat.clone()), "x@example.com", Some("42".to_string()));
        let options = TelegramOptions {
            chat_id: Some("-100777".to_string()),
            parse_mode: ParseMode::MarkdownV2,
        };

        dispatcher
            .dispatch(&sample_message(), &notify(&[], Some(options)))
            .await;

        let chats = chat.sent();
        assert_eq!(chats[0].chat_id, "-100777");
        assert_eq!(chats[0].parse_mode, ParseMode::MarkdownV2);
        assert!(chats[0].text.contains("*New commits pushed*"));
    }

    #[tokio::test]
    async fn blank_repo_chat_id_falls_back_to_default() {
        let chat = RecordingChat::default();
        let dispatcher: Dispatcher<RecordingMailer, _> =
            Dispatcher::new(None, Some(chat.clone()), "x@example.com", Some("42".to_string()));
        let options = TelegramOptions {
            chat_id: Some("  ".to_string()),
            parse_mode: ParseMode::Html,
        };

        let summary = dispatcher
            .dispatch(&sample_message(), &notify(&[], Some(options)))
            .await;

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(chat.sent()[0].chat_id, "42");
    }

    #[tokio::test]
    async fn missing_chat_id_fails_only_telegram() {
        let mailer = RecordingMailer::default();
        let chat = RecordingChat::default();
        let dispatcher =
            Dispatcher::new(Some(mailer.clone()), Some(chat.clone()), "x@example.com", None);

        let summary = dispatcher
            .dispatch(
                &sample_message(),
                &notify(&["dev@example.com"], Some(TelegramOptions::default())),
            )
            .await;

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        let failed = summary.outcomes.iter().find(|o| o.result.is_err()).unwrap();
        assert_eq!(failed.channel, ChannelKind::Telegram);
        assert!(matches!(failed.result, Err(ChannelError::NoChatId)));
        assert_eq!(mailer.sent().len(), 1);
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn enabled_channel_without_transport_fails_locally() {
        let dispatcher: Dispatcher<RecordingMailer, RecordingChat> =
            Dispatcher::new(None, None, "x@example.com", Some("1".to_string()));

        let summary = dispatcher
            .dispatch(&sample_message(), &notify(&["dev@example.com"], None))
            .await;

        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.outcomes[0].result,
            Err(ChannelError::NotConfigured(ChannelKind::Email))
        ));
    }

    #[tokio::test]
    async fn failing_mail_does_not_block_telegram() {
        let chat = RecordingChat::default();
        let dispatcher = Dispatcher::new(
            Some(FailingMailer),
            Some(chat.clone()),
            "x@example.com",
            Some("42".to_string()),
        );

        let summary = dispatcher
            .dispatch(
                &sample_message(),
                &notify(&["dev@example.com"], Some(TelegramOptions::default())),
            )
            .await;

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(chat.sent().len(), 1);
    }

    #[tokio::test]
    async fn panicking_channel_is_counted_as_failure() {
        let mailer = RecordingMailer::default();
        let dispatcher = Dispatcher::new(
            Some(mailer.clone()),
            Some(PanickingChat),
            "x@example.com",
            Some("42".to_string()),
        );

        let summary = dispatcher
            .dispatch(
                &sample_message(),
                &notify(&["dev@example.com"], Some(TelegramOptions::default())),
            )
            .await;

        assert_eq!(summary.succeeded(), 1);
        let failed = summary.outcomes.iter().find(|o| o.result.is_err()).unwrap();
        assert_eq!(failed.channel, ChannelKind::Telegram);
        assert!(matches!(failed.result, Err(ChannelError::Panicked)));
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn all_channels_failing_still_returns_summary() {
        let dispatcher = Dispatcher::new(
            Some(FailingMailer),
            Some(FailingChat),
            "x@example.com",
            Some("42".to_string()),
        );

        let summary = dispatcher
            .dispatch(
                &sample_message(),
                &notify(&["dev@example.com"], Some(TelegramOptions::default())),
            )
            .await;

        assert_eq!(summary.succeeded(), 0);
        assert_eq!(summary.failed(), 2);
    }
}
