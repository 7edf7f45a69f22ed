//! Order viewing route handlers.
//!
//! Access rules: an order is visible to the session user it belongs to, or
//! to anyone presenting its capability token (the link emailed after
//! checkout). Everything else is denied without confirming the order
//! exists beyond a 404/403 distinction.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use fondant_core::types::OrderId;

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::order::Order;
use crate::models::session::CurrentUser;
use crate::services::order_token;
use crate::state::AppState;

/// Query string for order views.
#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    #[serde(default)]
    token: Option<String>,
}

/// Check whether the caller may read this order.
fn authorize(
    state: &AppState,
    order: &Order,
    current_user: Option<&CurrentUser>,
    token: Option<&str>,
) -> bool {
    if let (Some(user), Some(owner)) = (current_user, order.user_id) {
        if user.id == owner {
            return true;
        }
    }

    // Capability tokens only exist for orders linked to a local account.
    if let (Some(token), Some(owner)) = (token, order.user_id) {
        return order_token::verify(token, order.id, owner, &state.config().session_secret);
    }

    false
}

async fn load_authorized_order(
    state: &AppState,
    id: i64,
    current_user: Option<&CurrentUser>,
    token: Option<&str>,
) -> Result<Order> {
    let order = OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_owned()))?;

    if !authorize(state, &order, current_user, token) {
        return Err(AppError::AccessDenied);
    }
    Ok(order)
}

/// `GET /order/{id}` - order detail, token- or session-gated.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Path(id): Path<i64>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Value>> {
    let order =
        load_authorized_order(&state, id, current_user.as_ref(), query.token.as_deref()).await?;

    Ok(Json(json!({ "order": order })))
}

/// `GET /api/order-status/{id}` - status poll for the success page.
///
/// Pending is a normal answer here: the webhook may not have landed yet.
pub async fn status(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Path(id): Path<i64>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Value>> {
    let order =
        load_authorized_order(&state, id, current_user.as_ref(), query.token.as_deref()).await?;

    Ok(Json(json!({
        "order_id": order.id,
        "status": order.status,
    })))
}
