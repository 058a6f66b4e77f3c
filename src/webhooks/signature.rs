//! GitHub webhook signature verification using HMAC-SHA256.
//!
//! GitHub signs webhook payloads using HMAC-SHA256 with a shared secret.
//! The signature is provided in the `X-Hub-Signature-256` header as `sha256=<hex>`.
//!
//! Verification runs against the raw request body, before any parsing. Without
//! a configured secret the outcome depends on [`VerifyMode`]: strict rejects
//! every delivery, lenient lets it through with a warning.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Errors that reject a delivery before it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The `X-Hub-Signature-256` header is absent.
    #[error("missing signature header")]
    MissingSignature,

    /// The header is malformed or does not match the payload.
    #[error("invalid signature")]
    InvalidSignature,

    /// Strict mode is on but no secret is configured.
    #[error("webhook secret not configured")]
    SecretNotConfigured,
}

/// What to do when no webhook secret is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerifyMode {
    /// Reject every delivery.
    #[default]
    Strict,
    /// Accept deliveries unverified, warning each time.
    Lenient,
}

/// How an accepted delivery got through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The signature matched the configured secret.
    Verified,
    /// No secret is configured and the verifier is lenient.
    Skipped,
}

/// Verifies deliveries against the shared webhook secret.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: Option<SecretString>,
    mode: VerifyMode,
}

impl SignatureVerifier {
    pub fn new(secret: Option<SecretString>, mode: VerifyMode) -> Self {
        SignatureVerifier { secret, mode }
    }

    /// Creates a strict verifier for the given secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(Some(SecretString::from(secret.into())), VerifyMode::Strict)
    }

    pub fn mode(&self) -> VerifyMode {
        self.mode
    }

    /// Checks a delivery's signature header against its raw body.
    ///
    /// The header is required in every mode, even when verification is
    /// skipped.
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<Verification, SignatureError> {
        let header = signature_header.ok_or(SignatureError::MissingSignature)?;

        let secret = match (&self.secret, self.mode) {
            (Some(secret), _) => secret,
            (None, VerifyMode::Lenient) => {
                warn!("Webhook secret not configured, skipping signature verification");
                return Ok(Verification::Skipped);
            }
            (None, VerifyMode::Strict) => return Err(SignatureError::SecretNotConfigured),
        };

        if verify_signature(payload, header, secret.expose_secret().as_bytes()) {
            Ok(Verification::Verified)
        } else {
            Err(SignatureError::InvalidSignature)
        }
    }
}

/// Parses a GitHub signature header (e.g., "sha256=abc123...") into raw bytes.
///
/// Returns `None` for malformed headers (missing prefix, invalid hex, etc.).
/// Never panics.
///
/// # Examples
///
/// ```
/// use git_notify::webhooks::parse_signature_header;
///
/// assert!(parse_signature_header("sha256=abcd1234").is_some());
/// assert!(parse_signature_header("abcd1234").is_none());
/// assert!(parse_signature_header("sha1=abcd1234").is_none());
/// assert!(parse_signature_header("sha256=xyz").is_none());
/// ```
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let hex_sig = header.strip_prefix("sha256=")?;
    hex::decode(hex_sig).ok()
}

/// Computes the HMAC-SHA256 signature of a payload using the given secret.
///
/// Fails only if the key length is rejected, which HMAC-SHA256 never does.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Result<Vec<u8>, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Formats a signature as a GitHub-style header value: `sha256=<hex>`.
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("sha256={}", hex::encode(signature))
}

/// Verifies a GitHub webhook signature against the payload and secret.
///
/// The comparison is constant-time over equal-length digests; a header whose
/// digest has the wrong length fails without comparing any bytes.
///
/// # Examples
///
/// ```
/// use git_notify::webhooks::{verify_signature, compute_signature, format_signature_header};
///
/// let payload = b"Hello, World!";
/// let secret = b"my-secret-key";
///
/// let header = format_signature_header(&compute_signature(payload, secret).unwrap());
///
/// assert!(verify_signature(payload, &header, secret));
/// assert!(!verify_signature(payload, &header, b"wrong-secret"));
/// ```
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let expected_signature = match parse_signature_header(signature_header) {
        Some(sig) => sig,
        None => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);

    mac.verify_slice(&expected_signature).is_ok()
}
