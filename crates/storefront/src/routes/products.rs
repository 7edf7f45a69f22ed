//! Catalog route handlers.

use axum::{Json, extract::Path, extract::State};
use serde::Serialize;
use serde_json::{Value, json};

use fondant_core::types::{Product, ProductIndex};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// A product with its derived positional id.
#[derive(Serialize)]
pub struct ProductView {
    pub id: ProductIndex,
    #[serde(flatten)]
    pub product: Product,
}

/// `GET /products` - full catalog with derived ids.
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let products: Vec<ProductView> = state
        .catalog()
        .load()
        .into_iter()
        .enumerate()
        .map(|(i, product)| ProductView {
            id: ProductIndex::new(i),
            product,
        })
        .collect();

    Json(json!({
        "products": products,
        "publishable_key": state.config().stripe.publishable_key,
    }))
}

/// `GET /product/{id}` - single product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<usize>,
) -> Result<Json<ProductView>> {
    let index = ProductIndex::new(id);
    let product = state
        .catalog()
        .get(index)
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    Ok(Json(ProductView { id: index, product }))
}
