//! Stripe integration via REST API (no SDK dependency).
//!
//! Checkout sessions are created with inline `price_data`, so nothing has to
//! be pre-registered in the Stripe dashboard. Webhook signatures follow the
//! `Stripe-Signature` scheme: `t=<unix>,v1=<hmac-sha256 hex>` over
//! `"{t}.{raw payload}"`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use crate::config::StripeConfig;

const API_BASE: &str = "https://api.stripe.com/v1";

/// Maximum webhook event age in seconds before it is rejected as a replay.
const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Errors from the Stripe client and webhook verification.
#[derive(Debug, Error)]
pub enum StripeError {
    /// No API secret key configured; checkout is disabled.
    #[error("stripe is not configured")]
    NotConfigured,

    /// HTTP transport failure.
    #[error("stripe request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe returned an error or an unexpected body.
    #[error("stripe api error: {0}")]
    Api(String),
}

/// Webhook signature verification failures.
///
/// All of these produce a 400 at the route layer; none of them touch order
/// state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing or malformed Stripe-Signature header")]
    MalformedHeader,
    #[error("invalid signature hex")]
    InvalidHex,
    #[error("signature mismatch")]
    Mismatch,
    #[error("invalid timestamp")]
    InvalidTimestamp,
    #[error("event timestamp outside tolerance")]
    Expired,
}

/// How incoming webhook events are authenticated.
///
/// The mode is fixed at startup from configuration, never decided
/// per-request.
#[derive(Debug, Clone)]
pub enum WebhookMode {
    /// Signatures are verified against the signing secret.
    Verified(SecretString),
    /// No signing secret configured; events are accepted unverified.
    /// Only acceptable for local development against the Stripe CLI.
    UnverifiedDevOnly,
}

impl WebhookMode {
    /// Select the webhook mode from configuration, logging the choice.
    #[must_use]
    pub fn from_config(config: &StripeConfig) -> Self {
        match &config.webhook_secret {
            Some(secret) => Self::Verified(secret.clone()),
            None => {
                tracing::warn!(
                    "STRIPE_WEBHOOK_SECRET not set, webhook signatures are NOT verified; \
                     do not run this mode in production"
                );
                Self::UnverifiedDevOnly
            }
        }
    }
}

/// A line item for a checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutLineItem {
    /// Display name shown on the Stripe checkout page.
    pub name: String,
    /// Unit price in cents.
    pub unit_amount_cents: i64,
    pub quantity: u32,
}

/// Parameters for creating a checkout session.
#[derive(Debug)]
pub struct CheckoutSessionParams {
    pub line_items: Vec<CheckoutLineItem>,
    /// `(key, value)` pairs echoed back in the webhook event.
    pub metadata: Vec<(String, String)>,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
}

/// A created checkout session.
#[derive(Debug)]
pub struct CheckoutSession {
    /// Session ID (`cs_...`), persisted on the order.
    pub id: String,
    /// URL to redirect the customer to.
    pub url: String,
}

/// Client for the Stripe REST API.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: Option<SecretString>,
}

impl StripeClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: config.secret_key.clone(),
        }
    }

    /// Whether an API key is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Create a payment-mode checkout session with inline price data.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::NotConfigured` when no API key is set,
    /// `StripeError::Http` on transport failure, and `StripeError::Api`
    /// when Stripe rejects the request.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let secret_key = self.secret_key.as_ref().ok_or(StripeError::NotConfigured)?;

        let mut form: Vec<(String, String)> = vec![
            ("mode".to_owned(), "payment".to_owned()),
            ("success_url".to_owned(), params.success_url.clone()),
            ("cancel_url".to_owned(), params.cancel_url.clone()),
        ];

        for (i, item) in params.line_items.iter().enumerate() {
            form.push((
                format!("line_items[{i}][price_data][currency]"),
                "usd".to_owned(),
            ));
            form.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.name.clone(),
            ));
            form.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                item.unit_amount_cents.to_string(),
            ));
            form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        }

        for (key, value) in &params.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        if let Some(email) = &params.customer_email {
            form.push(("customer_email".to_owned(), email.clone()));
        }

        let resp: serde_json::Value = self
            .client
            .post(format!("{API_BASE}/checkout/sessions"))
            .basic_auth(secret_key.expose_secret(), None::<&str>)
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        if let Some(message) = resp["error"]["message"].as_str() {
            return Err(StripeError::Api(message.to_owned()));
        }

        match (resp["id"].as_str(), resp["url"].as_str()) {
            (Some(id), Some(url)) => Ok(CheckoutSession {
                id: id.to_owned(),
                url: url.to_owned(),
            }),
            _ => Err(StripeError::Api(format!(
                "unexpected checkout session response: {resp}"
            ))),
        }
    }
}

/// Verify a Stripe webhook signature (HMAC-SHA256).
///
/// `now` is the current unix timestamp, passed in so tests can pin it.
///
/// # Errors
///
/// Returns `SignatureError` when the header is malformed, the signature
/// does not match, or the event timestamp falls outside the replay window.
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &SecretString,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp = "";
    let mut signature = "";
    for part in sig_header.split(',') {
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = v;
        }
    }

    if timestamp.is_empty() || signature.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }

    let mut signed_payload = Vec::with_capacity(timestamp.len() + 1 + payload.len());
    signed_payload.extend_from_slice(timestamp.as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(payload);

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| SignatureError::MalformedHeader)?;
    mac.update(&signed_payload);

    // verify_slice is constant-time
    let sig_bytes = hex::decode(signature).map_err(|_| SignatureError::InvalidHex)?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SignatureError::Mismatch)?;

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;
    if (now - ts).abs() > WEBHOOK_TOLERANCE_SECS {
        return Err(SignatureError::Expired);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        let sig = hex::encode(mac.finalize().into_bytes());
        format!("t={timestamp},v1={sig}")
    }

    #[test]
    fn test_valid_signature_accepted() {
        let secret = SecretString::from("whsec_test");
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let header = sign(payload, "whsec_test", 1_700_000_000);

        assert_eq!(
            verify_webhook_signature(payload, &header, &secret, 1_700_000_000),
            Ok(())
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let secret = SecretString::from("whsec_test");
        let header = sign(b"original", "whsec_test", 1_700_000_000);

        assert_eq!(
            verify_webhook_signature(b"tampered", &header, &secret, 1_700_000_000),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = b"payload";
        let header = sign(payload, "whsec_other", 1_700_000_000);

        assert_eq!(
            verify_webhook_signature(payload, &header, &SecretString::from("whsec_test"), 1_700_000_000),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_old_timestamp_rejected() {
        let secret = SecretString::from("whsec_test");
        let payload = b"payload";
        let header = sign(payload, "whsec_test", 1_700_000_000);

        assert_eq!(
            verify_webhook_signature(payload, &header, &secret, 1_700_000_000 + 301),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn test_timestamp_within_tolerance_accepted() {
        let secret = SecretString::from("whsec_test");
        let payload = b"payload";
        let header = sign(payload, "whsec_test", 1_700_000_000);

        assert_eq!(
            verify_webhook_signature(payload, &header, &secret, 1_700_000_000 + 299),
            Ok(())
        );
    }

    #[test]
    fn test_malformed_header_rejected() {
        let secret = SecretString::from("whsec_test");
        assert_eq!(
            verify_webhook_signature(b"payload", "garbage", &secret, 0),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify_webhook_signature(b"payload", "t=123", &secret, 0),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify_webhook_signature(b"payload", "t=123,v1=nothex!", &secret, 0),
            Err(SignatureError::InvalidHex)
        );
    }
}
