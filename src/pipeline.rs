//! Per-event processing: route, handle, dispatch.
//!
//! Each delivery gets its own run with no shared mutable state; the only
//! concurrency is the channel fan-out inside [`Dispatcher::dispatch`].

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::notify::{ChatTransport, DispatchSummary, Dispatcher, MailTransport};
use crate::webhooks::{HandlerOutcome, RouteDecision, SkipReason, WebhookEvent, handle_event, route_event};

/// What happened to an event.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Dropped before any channel was contacted.
    Skipped(SkipReason),
    /// A notification was built and handed to the dispatcher.
    Dispatched(DispatchSummary),
}

/// Runs one parsed event through routing, its handler and the dispatcher.
///
/// Never fails: no-ops come back as [`ProcessOutcome::Skipped`] and channel
/// failures are tallied in the summary.
pub async fn process_event<M, C>(
    event: &WebhookEvent,
    config: &AppConfig,
    dispatcher: &Dispatcher<M, C>,
) -> ProcessOutcome
where
    M: MailTransport,
    C: ChatTransport,
{
    let effective = match route_event(event, config) {
        RouteDecision::Handle(effective) => effective,
        RouteDecision::Drop(reason) => {
            log_skip(event, reason);
            return ProcessOutcome::Skipped(reason);
        }
    };

    match handle_event(event, &effective) {
        HandlerOutcome::Skip(reason) => {
            debug!(repo = %effective.repo, reason = %reason, "Handler produced no notification");
            ProcessOutcome::Skipped(reason)
        }
        HandlerOutcome::Notify(message) => {
            info!(
                repo = %message.repo,
                event = %message.event_kind,
                branch = %message.branch,
                "Dispatching notification"
            );
            ProcessOutcome::Dispatched(dispatcher.dispatch(&message, &effective.notify).await)
        }
    }
}

fn log_skip(event: &WebhookEvent, reason: SkipReason) {
    match event.repo() {
        Some(repo) => info!(repo = %repo, reason = %reason, "Event skipped"),
        None => debug!(reason = %reason, "Event skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::test_utils::{RecordingChat, RecordingMailer, branch_payload, push_payload};
    use crate::webhooks::parse_webhook;

    fn dispatcher(
        mailer: &RecordingMailer,
        chat: &RecordingChat,
    ) -> Dispatcher<RecordingMailer, RecordingChat> {
        Dispatcher::new(
            Some(mailer.clone()),
            Some(chat.clone()),
            "Git Monitor <noreply@example.com>",
            Some("42".to_string()),
        )
    }

    fn parse(kind: &str, body: &str) -> WebhookEvent {
        parse_webhook(kind, body.as_bytes()).unwrap().unwrap()
    }

    #[tokio::test]
    async fn matching_push_sends_one_telegram_message() {
        let config = parse_config(
            r#"
monitors:
  - repo: octocat/hello-world
    files: ["src/**"]
"#,
        )
        .unwrap();
        let mailer = RecordingMailer::default();
        let chat = RecordingChat::default();
        let event = parse(
            "push",
            &push_payload(
                "octocat/hello-world",
                "refs/heads/main",
                &["docs/readme.md"],
                &["src/app.ts"],
            ),
        );

        let outcome = process_event(&event, &config, &dispatcher(&mailer, &chat)).await;

        let summary = match outcome {
            ProcessOutcome::Dispatched(summary) => summary,
            other => panic!("expected dispatch, got {:?}", other),
        };
        assert_eq!(summary.succeeded(), 1);
        assert!(mailer.sent().is_empty());

        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("~ src/app.ts"));
        assert!(!sent[0].text.contains("docs/readme.md"));
        assert!(sent[0].text.contains("<code>src/**</code>"));
        assert!(sent[0].text.contains("Update docs"));
        assert!(!sent[0].text.contains("Longer body"));
    }

    #[tokio::test]
    async fn push_without_matching_files_sends_nothing() {
        let config = parse_config(
            r#"
monitors:
  - repo: octocat/hello-world
    files: ["src/**"]
"#,
        )
        .unwrap();
        let mailer = RecordingMailer::default();
        let chat = RecordingChat::default();
        let event = parse(
            "push",
            &push_payload("octocat/hello-world", "refs/heads/main", &["docs/a.md"], &[]),
        );

        let outcome = process_event(&event, &config, &dispatcher(&mailer, &chat)).await;

        assert!(matches!(
            outcome,
            ProcessOutcome::Skipped(SkipReason::NoPatternMatch)
        ));
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn unmonitored_repository_is_dropped() {
        let config = parse_config("monitors: []").unwrap();
        let mailer = RecordingMailer::default();
        let chat = RecordingChat::default();
        let event = parse(
            "push",
            &push_payload("someone/else", "refs/heads/main", &["a"], &[]),
        );

        let outcome = process_event(&event, &config, &dispatcher(&mailer, &chat)).await;

        assert!(matches!(
            outcome,
            ProcessOutcome::Skipped(SkipReason::NotMonitored)
        ));
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn branch_creation_uses_email_and_telegram_from_config() {
        let config = parse_config(
            r#"
defaults:
  notify:
    email: [team@example.com]
monitors:
  - repo: Octocat/Hello-World
    notify:
      telegram:
        chat_id: "-100999"
        parse_mode: markdown_v2
"#,
        )
        .unwrap();
        let mailer = RecordingMailer::default();
        let chat = RecordingChat::default();
        let event = parse(
            "create",
            &branch_payload("octocat/hello-world", "feature/x", "branch"),
        );

        let outcome = process_event(&event, &config, &dispatcher(&mailer, &chat)).await;

        let summary = match outcome {
            ProcessOutcome::Dispatched(summary) => summary,
            other => panic!("expected dispatch, got {:?}", other),
        };
        assert_eq!(summary.succeeded(), 2);

        let mails = mailer.sent();
        assert_eq!(mails[0].to, vec!["team@example.com".to_string()]);
        assert_eq!(
            mails[0].subject,
            "[octocat/hello-world] Branch feature/x created"
        );

        let chats = chat.sent();
        assert_eq!(chats[0].chat_id, "-100999");
        assert!(chats[0].text.contains("*Branch created*"));
        assert!(chats[0].text.contains("feature/x was created by octocat"));
    }

    #[tokio::test]
    async fn ping_is_skipped() {
        let config = AppConfig::default();
        let mailer = RecordingMailer::default();
        let chat = RecordingChat::default();

        let outcome = process_event(&WebhookEvent::Ping, &config, &dispatcher(&mailer, &chat)).await;

        assert!(matches!(outcome, ProcessOutcome::Skipped(SkipReason::Ping)));
    }
}
