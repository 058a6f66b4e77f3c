//! SMTP delivery through `lettre`.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::debug;

use super::{ChannelError, MailTransport, OutgoingMail};
use crate::config::SmtpSettings;

/// Sends mail through one authenticated SMTP relay.
///
/// The underlying transport pools connections and is created once at startup.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds the transport. Does not connect.
    ///
    /// `secure` selects implicit TLS; otherwise the connection is upgraded
    /// with STARTTLS.
    pub fn new(settings: &SmtpSettings) -> Result<Self, ChannelError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let credentials = Credentials::new(
            settings.user.clone(),
            settings.password.expose_secret().to_string(),
        );
        let transport = builder
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(SmtpMailer { transport })
    }
}

impl MailTransport for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), ChannelError> {
        let message = build_message(mail)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        debug!(code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, ChannelError> {
    address
        .trim()
        .parse()
        .map_err(|_| ChannelError::InvalidAddress(address.to_string()))
}

/// Builds one HTML message addressed to every recipient.
fn build_message(mail: OutgoingMail) -> Result<Message, ChannelError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&mail.from)?)
        .subject(mail.subject);
    for to in &mail.to {
        builder = builder.to(parse_mailbox(to)?);
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(mail.html)
        .map_err(|e| ChannelError::Transport(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(from: &str, to: &[&str]) -> OutgoingMail {
        OutgoingMail {
            from: from.to_string(),
            to: to.iter().map(|s| s.to_string()).collect(),
            subject: "[octocat/hello-world] Branch main created".to_string(),
            html: "<p>hi</p>".to_string(),
        }
    }

    #[test]
    fn builds_message_for_all_recipients() {
        let message = build_message(mail(
            "Git Monitor <noreply@example.com>",
            &["a@example.com", "b@example.com"],
        ))
        .unwrap();

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 2);
        assert_eq!(
            envelope.from().map(|a| a.to_string()),
            Some("noreply@example.com".to_string())
        );

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn rejects_invalid_sender() {
        let err = build_message(mail("not an address", &["a@example.com"])).unwrap_err();
        assert!(matches!(err, ChannelError::InvalidAddress(a) if a == "not an address"));
    }

    #[test]
    fn rejects_invalid_recipient() {
        let err = build_message(mail("noreply@example.com", &["a@example.com", "nope"]))
            .unwrap_err();
        assert!(matches!(err, ChannelError::InvalidAddress(a) if a == "nope"));
    }
}
