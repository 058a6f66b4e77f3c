//! Process settings read from environment variables.

use secrecy::SecretString;
use std::path::PathBuf;

use super::ConfigError;
use crate::webhooks::VerifyMode;

const DEFAULT_CONFIG_PATH: &str = "./config.yaml";
const DEFAULT_EMAIL_FROM: &str = "Git Monitor <noreply@example.com>";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_PORT: u16 = 3000;

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS when true, STARTTLS otherwise.
    pub secure: bool,
    pub user: String,
    pub password: SecretString,
}

/// Telegram bot settings.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub bot_token: SecretString,
    pub api_url: String,
}

/// Everything the process needs besides the monitor list.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub port: u16,
    pub webhook_secret: Option<SecretString>,
    pub verify_mode: VerifyMode,
    /// `None` unless both host and user are set.
    pub smtp: Option<SmtpSettings>,
    pub email_from: String,
    /// `None` unless a bot token is set.
    pub telegram: Option<TelegramSettings>,
    pub telegram_default_chat_id: Option<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = parse_port(&var, "PORT", DEFAULT_PORT)?;

        let verify_mode = match var("WEBHOOK_VERIFY_MODE") {
            None => VerifyMode::Strict,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "strict" => VerifyMode::Strict,
                "lenient" => VerifyMode::Lenient,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "WEBHOOK_VERIFY_MODE",
                        value,
                    });
                }
            },
        };

        let webhook_secret = var("GITHUB_WEBHOOK_SECRET").map(SecretString::from);
        if webhook_secret.is_none() && verify_mode == VerifyMode::Strict {
            return Err(ConfigError::MissingSecret);
        }

        let smtp = match (var("SMTP_HOST"), var("SMTP_USER")) {
            (Some(host), Some(user)) => Some(SmtpSettings {
                host,
                port: parse_port(&var, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                secure: var("SMTP_SECURE").as_deref() != Some("false"),
                user,
                password: SecretString::from(var("SMTP_PASS").unwrap_or_default()),
            }),
            _ => None,
        };

        let telegram = var("TELEGRAM_BOT_TOKEN").map(|token| TelegramSettings {
            bot_token: SecretString::from(token),
            api_url: var("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        });

        Ok(Settings {
            config_path: var("GIT_NOTIFY_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            port,
            webhook_secret,
            verify_mode,
            smtp,
            email_from: var("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            telegram,
            telegram_default_chat_id: var("TELEGRAM_DEFAULT_CHAT_ID"),
        })
    }
}

fn parse_port<F>(var: &F, name: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var: name, value }),
    }
}
