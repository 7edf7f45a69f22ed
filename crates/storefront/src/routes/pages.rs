//! Informational page handlers: FAQ and the provider-redirect landings.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::orders::OrderRepository;
use crate::error::Result;
use crate::services::order_token;
use crate::state::AppState;

/// `GET /qa` - frequently asked questions.
pub async fn qa() -> Json<Value> {
    Json(json!({
        "faqs": [
            {
                "question": "How far in advance should I order?",
                "answer": "We recommend ordering at least 2-3 weeks in advance for custom orders. Standard toppers can usually be prepared within 1 week. For rush orders, please contact us directly."
            },
            {
                "question": "Are your fondant decorations edible?",
                "answer": "Yes! All our fondant toppers are made from 100% edible, food-safe ingredients. However, many customers choose to keep them as keepsakes due to their detailed craftsmanship."
            },
            {
                "question": "How should I store the toppers before use?",
                "answer": "Store in a cool, dry place away from direct sunlight. Keep them in an airtight container to prevent humidity damage. Avoid refrigeration as moisture can affect the fondant."
            },
            {
                "question": "Can you create custom designs?",
                "answer": "Absolutely! We love creating custom pieces. Contact us with your ideas, theme, or color preferences, and we'll work with you to create the perfect topper for your celebration."
            },
            {
                "question": "What is your cancellation policy?",
                "answer": "Orders can be cancelled within 24 hours of purchase for a full refund. After work has begun on custom orders, cancellations may be subject to a fee depending on the progress."
            },
            {
                "question": "Do you ship internationally?",
                "answer": "Currently, we ship within the United States. International shipping can be arranged for certain items - please contact us for details and shipping costs."
            },
            {
                "question": "How are the toppers packaged for shipping?",
                "answer": "Each topper is carefully packaged in protective materials and shipped in sturdy boxes to ensure they arrive in perfect condition. We take extra care with delicate pieces."
            },
            {
                "question": "What if my topper arrives damaged?",
                "answer": "While rare, if your topper arrives damaged, please contact us immediately with photos. We will work with you to either provide a replacement or issue a refund."
            }
        ]
    }))
}

/// Query string for the success landing.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    #[serde(default)]
    session_id: Option<String>,
}

/// `GET /order-success` - post-payment landing.
///
/// The webhook races this redirect, so a still-pending order is normal;
/// the response includes the order's capability token so the client can
/// poll `/api/order-status/{id}` until completion lands.
pub async fn order_success(
    State(state): State<AppState>,
    Query(query): Query<SuccessQuery>,
) -> Result<Json<Value>> {
    let order = match &query.session_id {
        Some(session_id) => {
            OrderRepository::new(state.pool())
                .get_by_session_id(session_id)
                .await?
        }
        None => None,
    };

    let Some(order) = order else {
        return Ok(Json(json!({
            "message": "Payment successful! Thank you for your purchase.",
        })));
    };

    let token = order
        .user_id
        .map(|user_id| order_token::generate(order.id, user_id, &state.config().session_secret));

    Ok(Json(json!({
        "message": "Payment successful! Thank you for your purchase.",
        "order_id": order.id,
        "status": order.status,
        "token": token,
    })))
}

/// `GET /cancel` - cancelled-payment landing.
pub async fn cancel() -> Json<Value> {
    Json(json!({
        "message": "Payment cancelled. Please try again when ready.",
    }))
}
