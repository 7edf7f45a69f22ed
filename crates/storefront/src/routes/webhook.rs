//! Stripe webhook route handler.
//!
//! Arrives out-of-band with no session. The raw body is needed for
//! signature verification, so this handler takes `Bytes`, not `Json`.
//!
//! Response contract: non-2xx only for malformed or unauthenticated
//! payloads. Unknown or already-completed sessions get a 200 so Stripe
//! does not redeliver forever.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;

use crate::db::orders::{CompletionOutcome, OrderRepository};
use crate::stripe::{WebhookMode, verify_webhook_signature};
use crate::state::AppState;

/// Event envelope; only the fields we act on.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    object: WebhookObject,
}

#[derive(Debug, Deserialize)]
struct WebhookObject {
    id: String,
}

/// `POST /webhook` - Stripe event callback.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    match state.webhook_mode() {
        WebhookMode::Verified(secret) => {
            let signature = headers
                .get("Stripe-Signature")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            let now = chrono::Utc::now().timestamp();
            if let Err(err) = verify_webhook_signature(&body, signature, secret, now) {
                tracing::warn!(error = %err, "Rejected webhook with bad signature");
                return StatusCode::BAD_REQUEST;
            }
        }
        // The loud unverified-mode warning is logged once at startup.
        WebhookMode::UnverifiedDevOnly => {
            tracing::debug!("Accepting unverified webhook event");
        }
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(error = %err, "Rejected malformed webhook payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    if event.event_type != "checkout.session.completed" {
        tracing::debug!(event_type = %event.event_type, "Ignoring webhook event type");
        return StatusCode::OK;
    }

    let session_id = &event.data.object.id;
    match OrderRepository::new(state.pool())
        .mark_completed(session_id)
        .await
    {
        Ok(CompletionOutcome::Completed(order)) => {
            tracing::info!(order_id = %order.id, session_id = %session_id, "Order completed");
            StatusCode::OK
        }
        Ok(CompletionOutcome::AlreadyCompleted) => {
            tracing::info!(session_id = %session_id, "Duplicate completion event ignored");
            StatusCode::OK
        }
        Ok(CompletionOutcome::NotFound) => {
            tracing::warn!(session_id = %session_id, "Completion event for unknown session");
            StatusCode::OK
        }
        Err(err) => {
            sentry::capture_error(&err);
            tracing::error!(error = %err, session_id = %session_id, "Webhook database error");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
