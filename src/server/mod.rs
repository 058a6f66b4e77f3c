//! HTTP server for the notification relay.
//!
//! # Endpoints
//!
//! - `POST /webhook` - Accepts GitHub webhook deliveries and notifies (returns 200)
//! - `GET /health` - Liveness check

use std::sync::Arc;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::{WebhookError, webhook_handler};

use crate::config::AppConfig;
use crate::notify::{ChatTransport, Dispatcher, MailTransport};
use crate::webhooks::SignatureVerifier;

/// Shared application state.
///
/// Passed to all handlers via Axum's `State` extractor. Everything in it is
/// read-only after startup.
pub struct AppState<M, C> {
    inner: Arc<AppStateInner<M, C>>,
}

struct AppStateInner<M, C> {
    verifier: SignatureVerifier,
    config: AppConfig,
    dispatcher: Dispatcher<M, C>,
}

// Derived Clone would require `M: Clone` and `C: Clone`.
impl<M, C> Clone for AppState<M, C> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M, C> AppState<M, C>
where
    M: MailTransport,
    C: ChatTransport,
{
    pub fn new(verifier: SignatureVerifier, config: AppConfig, dispatcher: Dispatcher<M, C>) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                verifier,
                config,
                dispatcher,
            }),
        }
    }

    pub fn verifier(&self) -> &SignatureVerifier {
        &self.inner.verifier
    }

    /// The monitor list loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn dispatcher(&self) -> &Dispatcher<M, C> {
        &self.inner.dispatcher
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<M, C>(app_state: AppState<M, C>) -> axum::Router
where
    M: MailTransport + 'static,
    C: ChatTransport + 'static,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler::<M, C>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
