//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::auth::Principal;
use crate::core::ServerState;
use crate::db::models::{CartItem, CartItemView};
use crate::db::repository::{CartRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

/// Add-to-cart payload
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub product_id: String,
    pub quantity: i32,
}

/// List the buyer's cart with product names resolved
pub async fn list(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<Vec<CartItemView>>> {
    let repo = CartRepository::new(state.get_db());
    let items = repo.find_by_user_resolved(&principal.id).await?;
    Ok(Json(items))
}

/// Add a product to the cart
///
/// Snapshots the product's current price; a later price change does not
/// touch lines already in the cart.
pub async fn add(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<AddToCart>,
) -> AppResult<Json<CartItem>> {
    let products = ProductRepository::new(state.get_db());
    let product = products
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| AppError::product_not_found(&payload.product_id))?;

    let repo = CartRepository::new(state.get_db());
    let item = repo
        .add(
            &principal.id,
            &payload.product_id,
            payload.quantity,
            product.price,
        )
        .await?;
    Ok(Json(item))
}

/// Remove one product from the cart
pub async fn remove(
    State(state): State<ServerState>,
    principal: Principal,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repo = CartRepository::new(state.get_db());
    repo.remove(&principal.id, &product_id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// Empty the cart
pub async fn clear(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<()>>> {
    let repo = CartRepository::new(state.get_db());
    repo.clear(&principal.id).await?;
    Ok(Json(ApiResponse::ok()))
}
