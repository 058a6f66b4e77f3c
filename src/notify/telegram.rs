//! Telegram Bot API delivery.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChannelError, ChatTransport};
use crate::config::{ParseMode, TelegramSettings};

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts messages through the Bot API `sendMessage` method.
#[derive(Clone)]
pub struct TelegramBot {
    client: reqwest::Client,
    api_url: String,
    token: SecretString,
}

impl TelegramBot {
    pub fn new(settings: &TelegramSettings) -> Self {
        TelegramBot {
            client: reqwest::Client::new(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.bot_token.clone(),
        }
    }

    // The token is part of the path, so errors are stripped of their URL
    // before they reach a log line.
    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token.expose_secret())
    }
}

impl ChatTransport for TelegramBot {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<(), ChannelError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: parse_mode.api_value(),
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let reply: ApiReply = response
            .json()
            .await
            .map_err(|e| ChannelError::Transport(e.without_url().to_string()))?;

        if !reply.ok {
            return Err(ChannelError::Rejected(
                reply.description.unwrap_or_else(|| status.to_string()),
            ));
        }

        debug!(chat_id = %chat_id, "Telegram message sent");
        Ok(())
    }
}
