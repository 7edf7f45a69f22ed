//! Cart route handlers.
//!
//! The cart lives in the server-side session; handlers read it, apply one
//! mutation, and write it back. Item names and prices are captured from the
//! catalog at add time, so later catalog edits do not change lines already
//! in a cart.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;

use fondant_core::cart::{Cart, CartItem};
use fondant_core::types::ProductIndex;

use crate::error::{AppError, Result};
use crate::models::session::keys;
use crate::state::AppState;

/// `POST /cart/add` request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddRequest {
    pub product_id: usize,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub color: String,
}

const fn default_quantity() -> u32 {
    1
}

/// `POST /cart/update` request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRequest {
    pub product_id: usize,
    pub quantity: u32,
}

/// `POST /cart/remove` request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveRequest {
    pub product_id: usize,
}

/// Cart contents as returned to the client.
#[derive(Serialize)]
struct CartView {
    items: Vec<CartItem>,
    total: String,
    count: u32,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        Self {
            total: cart.total().to_string(),
            count: cart.count(),
            items: cart.items().to_vec(),
        }
    }
}

/// Read the cart from the session, defaulting to empty.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist session cart: {e}")))
}

/// `GET /cart` - current cart contents.
pub async fn show(session: Session) -> Json<Value> {
    let cart = load_cart(&session).await;
    let view = CartView::from(cart);
    Json(json!({ "items": view.items, "total": view.total, "count": view.count }))
}

/// `POST /cart/add` - add an item, merging with an existing line when the
/// (product, variant, color) key matches.
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddRequest>,
) -> Result<Json<Value>> {
    let product_id = ProductIndex::new(request.product_id);
    let product = state
        .catalog()
        .get(product_id)
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    let price = product
        .price()
        .map_err(|e| AppError::Internal(format!("unparseable catalog price: {e}")))?;

    let mut cart = load_cart(&session).await;
    cart.add(CartItem {
        product_id,
        name: product.title,
        price,
        quantity: request.quantity,
        variant: request.variant,
        color: request.color,
        image: product.image_url,
    });
    save_cart(&session, &cart).await?;

    Ok(Json(json!({ "message": "Added to cart", "count": cart.count() })))
}

/// `POST /cart/update` - set a line's quantity (clamped to >= 1).
pub async fn update(
    session: Session,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await;
    cart.update(ProductIndex::new(request.product_id), request.quantity);
    save_cart(&session, &cart).await?;

    let view = CartView::from(cart);
    Ok(Json(
        json!({ "items": view.items, "total": view.total, "count": view.count }),
    ))
}

/// `POST /cart/remove` - drop every line for a product, regardless of
/// variant or color.
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveRequest>,
) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await;
    cart.remove(ProductIndex::new(request.product_id));
    save_cart(&session, &cart).await?;

    let view = CartView::from(cart);
    Ok(Json(
        json!({ "items": view.items, "total": view.total, "count": view.count }),
    ))
}

/// `GET /cart/count` - cart badge count.
pub async fn count(session: Session) -> Json<Value> {
    let cart = load_cart(&session).await;
    Json(json!({ "count": cart.count() }))
}
