//! Webhook endpoint handler.
//!
//! Verifies the signature over the raw body, parses the delivery, and runs it
//! through the notification pipeline before answering. Channel failures do
//! not change the response; only malformed or unauthenticated requests do.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::AppState;
use crate::notify::{ChatTransport, MailTransport};
use crate::pipeline::{ProcessOutcome, process_event};
use crate::types::DeliveryId;
use crate::webhooks::{ParseError, SignatureError, Verification, parse_webhook};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID.
const HEADER_DELIVERY: &str = "x-github-delivery";
/// Header name for GitHub signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Errors that end a webhook request early.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] ParseError),
}

impl WebhookError {
    fn status(&self) -> StatusCode {
        match self {
            WebhookError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            WebhookError::Signature(SignatureError::SecretNotConfigured) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WebhookError::Signature(_) => StatusCode::UNAUTHORIZED,
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Body of a successful webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub event: String,
}

/// Webhook handler.
///
/// # Response
///
/// - 200 OK: `{"success": true, "event": "<kind>"}`, whether or not anything
///   was sent
/// - 400 Bad Request: missing event header or malformed payload
/// - 401 Unauthorized: missing or invalid signature
/// - 500 Internal Server Error: strict mode without a configured secret
pub async fn webhook_handler<M, C>(
    State(app_state): State<AppState<M, C>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, WebhookError>
where
    M: MailTransport + 'static,
    C: ChatTransport + 'static,
{
    let delivery_id = DeliveryId::new(get_header(&headers, HEADER_DELIVERY).unwrap_or_default());

    // Verify signature BEFORE any parsing.
    let signature = get_header(&headers, HEADER_SIGNATURE);
    match app_state.verifier().verify(&body, signature.as_deref()) {
        Ok(Verification::Verified) => {}
        Ok(Verification::Skipped) => {
            debug!(delivery_id = %delivery_id, "Signature verification skipped");
        }
        Err(e @ SignatureError::SecretNotConfigured) => {
            error!(delivery_id = %delivery_id, "Webhook secret is not configured");
            return Err(e.into());
        }
        Err(e) => {
            warn!(delivery_id = %delivery_id, error = %e, "Rejected webhook signature");
            return Err(e.into());
        }
    }

    let event_type = get_header(&headers, HEADER_EVENT).ok_or_else(|| {
        warn!(delivery_id = %delivery_id, "Missing event header");
        WebhookError::MissingHeader(HEADER_EVENT)
    })?;

    info!(
        delivery_id = %delivery_id,
        event_type = %event_type,
        "Received webhook"
    );

    let event = match parse_webhook(&event_type, &body) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!(delivery_id = %delivery_id, event_type = %event_type, "Ignoring event");
            return Ok(ack(event_type));
        }
        Err(e) => {
            warn!(delivery_id = %delivery_id, error = %e, "Failed to parse webhook");
            return Err(e.into());
        }
    };

    match process_event(&event, app_state.config(), app_state.dispatcher()).await {
        ProcessOutcome::Skipped(reason) => {
            debug!(delivery_id = %delivery_id, reason = %reason, "No notification sent");
        }
        ProcessOutcome::Dispatched(summary) => {
            debug!(
                delivery_id = %delivery_id,
                succeeded = summary.succeeded(),
                failed = summary.failed(),
                "Webhook processed"
            );
        }
    }

    Ok(ack(event_type))
}

fn ack(event: String) -> Json<WebhookAck> {
    Json(WebhookAck {
        success: true,
        event,
    })
}

/// Extracts a header value as a string, if present and valid UTF-8.
fn get_header(headers: &HeaderMap, name: &'static str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
