//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::ApiResponse;
use crate::auth::{Principal, Role};
use crate::core::ServerState;
use crate::db::models::{ContactInfo, Order, OrderDetail, Purchase};
use crate::db::repository::{OrderRepository, PurchaseRepository};
use crate::orders::OrderService;
use crate::utils::{AppError, AppResult};

/// Buy-now payload: a single product/quantity pair plus contact info
#[derive(Debug, Deserialize, Validate)]
pub struct BuyNowRequest {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    pub quantity: i32,
    #[validate(nested)]
    #[serde(flatten)]
    pub contact: ContactInfo,
}

/// Status update payload
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Check out the persisted cart
pub async fn checkout(
    State(state): State<ServerState>,
    principal: Principal,
    Json(contact): Json<ContactInfo>,
) -> AppResult<Json<OrderDetail>> {
    principal.require_buyer()?;
    contact
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let service = OrderService::new(state.get_db());
    let detail = service.checkout(&principal.id, &contact).await?;
    Ok(Json(detail))
}

/// Buy a single product directly, without touching the cart
pub async fn buy_now(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<BuyNowRequest>,
) -> AppResult<Json<OrderDetail>> {
    principal.require_buyer()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let service = OrderService::new(state.get_db());
    let detail = service
        .buy_now(
            &principal.id,
            &payload.product_id,
            payload.quantity,
            &payload.contact,
        )
        .await?;
    Ok(Json(detail))
}

/// List the requester's orders: a buyer sees their own, a seller sees every
/// order containing at least one of their lines
pub async fn list(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = match principal.role {
        Role::Buyer => repo.find_by_buyer(&principal.id).await?,
        Role::Seller => repo.find_by_seller(&principal.id).await?,
    };
    Ok(Json(orders))
}

/// List the requesting seller's revenue ledger, newest sale first
pub async fn sales(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<Vec<Purchase>>> {
    principal.require_seller()?;
    let repo = PurchaseRepository::new(state.get_db());
    let purchases = repo.find_by_owner(&principal.id).await?;
    Ok(Json(purchases))
}

/// Get order detail (buyer or contributing seller only)
pub async fn get_by_id(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.get_db());
    let detail = service.get_order(&id, &principal.id).await?;
    Ok(Json(detail))
}

/// Update order status (either vocabulary; see `orders::status`)
pub async fn update_status(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let service = OrderService::new(state.get_db());
    let change = service
        .update_status(&id, &principal.id, &principal.name, &payload.status)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        change.message,
        change.detail,
    )))
}

/// Cancel a pending order (buyer only)
pub async fn cancel(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    principal.require_buyer()?;
    let service = OrderService::new(state.get_db());
    let detail = service
        .cancel(&id, &principal.id, &principal.name)
        .await?;
    Ok(Json(detail))
}
