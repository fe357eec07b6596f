//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::Principal;
use crate::catalog;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult};

/// Query params for catalog browsing
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Keyword category filter (fuzzy, for browsing only)
    pub category: Option<String>,
}

/// Browse the catalog, optionally filtered by category keywords
pub async fn browse(
    State(state): State<ServerState>,
    Query(query): Query<BrowseQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo.find_all().await.map_err(AppError::from)?;

    let products = match query.category.as_deref() {
        Some(keywords) if !keywords.trim().is_empty() => catalog::filter_by_category(&products, keywords)
            .into_iter()
            .cloned()
            .collect(),
        _ => products,
    };

    Ok(Json(products))
}

/// List the requesting seller's products
pub async fn list_mine(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<Vec<Product>>> {
    principal.require_seller()?;
    let repo = ProductRepository::new(state.get_db());
    let products = repo.find_by_owner(&principal.id).await?;
    Ok(Json(products))
}

/// Get product by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::product_not_found(&id))?;
    Ok(Json(product))
}

/// Create a new product
pub async fn create(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    principal.require_seller()?;
    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(&principal.id, payload).await?;
    Ok(Json(product))
}

/// Update a product (owner only)
pub async fn update(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    principal.require_seller()?;
    let repo = ProductRepository::new(state.get_db());

    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::product_not_found(&id))?;
    if existing.owner_id != principal.id {
        return Err(AppError::permission_denied("Not the owner of this product"));
    }

    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

/// Delete a product (owner only)
pub async fn remove(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
) -> AppResult<Json<crate::api::ApiResponse<()>>> {
    principal.require_seller()?;
    let repo = ProductRepository::new(state.get_db());

    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::product_not_found(&id))?;
    if existing.owner_id != principal.id {
        return Err(AppError::permission_denied("Not the owner of this product"));
    }

    repo.delete(&id).await?;
    Ok(Json(crate::api::ApiResponse::ok()))
}
