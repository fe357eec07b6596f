//! Ingredient Batch API Handlers
//!
//! Batches are entered manually by the owner: "ingredients worth X were
//! consumed for category Y between these dates". Items snapshot the
//! ingredient price at entry time.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::ApiResponse;
use crate::auth::Principal;
use crate::core::ServerState;
use crate::db::models::{IngredientBatch, IngredientBatchItem};
use crate::db::repository::batch::BatchLine;
use crate::db::repository::{BatchRepository, IngredientRepository, RepoError};
use crate::orders::money;
use crate::utils::{AppError, AppResult, time};

/// One batch line as submitted by the owner
#[derive(Debug, Deserialize)]
pub struct BatchItemRequest {
    pub ingredient_id: String,
    pub quantity_used: f64,
    /// Omitted → the ingredient's current price is snapshotted
    pub unit_price_snapshot: Option<f64>,
}

/// Batch creation payload (dates as YYYY-MM-DD in the business timezone)
#[derive(Debug, Deserialize, Validate)]
pub struct BatchCreateRequest {
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub notes: Option<String>,
    /// Only honored for batches entered without itemized lines
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub items: Vec<BatchItemRequest>,
}

/// Batch with its lines attached
#[derive(Debug, Serialize)]
pub struct BatchView {
    #[serde(flatten)]
    pub batch: IngredientBatch,
    pub items: Vec<IngredientBatchItem>,
}

/// List the owner's batches with their lines
pub async fn list(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<Vec<BatchView>>> {
    principal.require_seller()?;
    let repo = BatchRepository::new(state.get_db());

    let batches = repo.find_by_owner(&principal.id).await?;
    let mut views = Vec::with_capacity(batches.len());
    for batch in batches {
        let items = match &batch.id {
            Some(id) => repo.find_items(&id.to_string()).await?,
            None => Vec::new(),
        };
        views.push(BatchView { batch, items });
    }
    Ok(Json(views))
}

/// Get one batch with its lines (owner only)
pub async fn get_by_id(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
) -> AppResult<Json<BatchView>> {
    principal.require_seller()?;
    let repo = BatchRepository::new(state.get_db());

    let batch = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::with_message(shared::ErrorCode::BatchNotFound, format!("Batch {} not found", id)))?;
    if batch.owner_id != principal.id {
        return Err(AppError::permission_denied("Not the owner of this batch"));
    }

    let items = repo.find_items(&id).await?;
    Ok(Json(BatchView { batch, items }))
}

/// Create a batch with its lines
///
/// Each line freezes a `unit_price_snapshot` — the submitted figure, or the
/// ingredient's current price when omitted. Later ingredient price changes
/// never touch it.
pub async fn create(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<BatchCreateRequest>,
) -> AppResult<Json<BatchView>> {
    principal.require_seller()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let tz = state.config.timezone;
    let period_start = match &payload.period_start {
        Some(date) => Some(time::day_start_millis(time::parse_date(date)?, tz)),
        None => None,
    };
    let period_end = match &payload.period_end {
        Some(date) => Some(time::day_end_millis(time::parse_date(date)?, tz)),
        None => None,
    };

    let ingredients = IngredientRepository::new(state.get_db());
    let mut lines = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        if item.quantity_used <= 0.0 || !item.quantity_used.is_finite() {
            return Err(AppError::validation(format!(
                "quantity_used must be positive, got {}",
                item.quantity_used
            )));
        }

        let ingredient = ingredients
            .find_by_id(&item.ingredient_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    shared::ErrorCode::IngredientNotFound,
                    format!("Ingredient {} not found", item.ingredient_id),
                )
            })?;
        if ingredient.owner_id != principal.id {
            return Err(AppError::permission_denied(
                "Not the owner of this ingredient",
            ));
        }

        let snapshot = item
            .unit_price_snapshot
            .unwrap_or(ingredient.current_unit_price);
        if !snapshot.is_finite() || snapshot < 0.0 {
            return Err(AppError::validation(format!(
                "unit_price_snapshot must be a non-negative number, got {}",
                snapshot
            )));
        }

        let ingredient_ref = ingredient
            .id
            .ok_or_else(|| AppError::from(RepoError::Database("Ingredient row has no id".into())))?;
        lines.push(BatchLine {
            ingredient: ingredient_ref,
            quantity_used: item.quantity_used,
            unit_price_snapshot: snapshot,
            line_cost: money::line_cost(item.quantity_used, snapshot),
        });
    }

    // Itemized batches derive total_cost; the explicit figure only covers
    // batches entered without lines.
    let total_cost = if lines.is_empty() {
        payload.total_cost.unwrap_or(0.0)
    } else {
        money::order_total(lines.iter().map(|l| l.line_cost))
    };
    if !total_cost.is_finite() || total_cost < 0.0 {
        return Err(AppError::validation(format!(
            "total_cost must be a non-negative number, got {}",
            total_cost
        )));
    }

    let repo = BatchRepository::new(state.get_db());
    let batch = repo
        .create(
            &principal.id,
            &payload.category,
            period_start,
            period_end,
            payload.notes.clone(),
            total_cost,
            lines,
        )
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => {
                AppError::with_message(shared::ErrorCode::BatchPeriodInvalid, msg)
            }
            other => other.into(),
        })?;

    let items = match &batch.id {
        Some(id) => repo.find_items(&id.to_string()).await?,
        None => Vec::new(),
    };
    Ok(Json(BatchView { batch, items }))
}

/// Delete a batch and its lines (owner only)
pub async fn remove(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    principal.require_seller()?;
    let repo = BatchRepository::new(state.get_db());

    let batch = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::with_message(shared::ErrorCode::BatchNotFound, format!("Batch {} not found", id)))?;
    if batch.owner_id != principal.id {
        return Err(AppError::permission_denied("Not the owner of this batch"));
    }

    repo.delete(&id).await?;
    Ok(Json(ApiResponse::ok()))
}
