use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_notify::config::{Settings, load_config};
use git_notify::notify::{Dispatcher, SmtpMailer, TelegramBot};
use git_notify::server::{AppState, build_router};
use git_notify::webhooks::{SignatureVerifier, VerifyMode};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "git_notify=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("invalid environment settings")?;
    let config = load_config(&settings.config_path)?;

    for monitor in &config.monitors {
        info!(
            repo = %monitor.repo,
            patterns = monitor.files.len(),
            "Monitoring repository"
        );
    }

    let mailer = settings
        .smtp
        .as_ref()
        .map(SmtpMailer::new)
        .transpose()
        .context("failed to set up SMTP transport")?;
    if mailer.is_none() {
        warn!("SMTP_HOST/SMTP_USER not set, email notifications will fail");
    }

    let bot = settings.telegram.as_ref().map(TelegramBot::new);
    if bot.is_none() {
        warn!("TELEGRAM_BOT_TOKEN not set, Telegram notifications will fail");
    }

    if settings.verify_mode == VerifyMode::Lenient && settings.webhook_secret.is_none() {
        warn!("Running in lenient mode without a webhook secret, signatures are not checked");
    }

    let verifier = SignatureVerifier::new(settings.webhook_secret.clone(), settings.verify_mode);
    let dispatcher = Dispatcher::new(
        mailer,
        bot,
        settings.email_from.clone(),
        settings.telegram_default_chat_id.clone(),
    );
    let app = build_router(AppState::new(verifier, config, dispatcher));

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
