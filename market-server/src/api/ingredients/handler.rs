//! Ingredient API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::ApiResponse;
use crate::auth::Principal;
use crate::core::ServerState;
use crate::db::models::{Ingredient, IngredientCreate, IngredientUpdate};
use crate::db::repository::IngredientRepository;
use crate::utils::{AppError, AppResult};

/// List the owner's ingredients
pub async fn list(
    State(state): State<ServerState>,
    principal: Principal,
) -> AppResult<Json<Vec<Ingredient>>> {
    principal.require_seller()?;
    let repo = IngredientRepository::new(state.get_db());
    let ingredients = repo.find_by_owner(&principal.id).await?;
    Ok(Json(ingredients))
}

/// Create an ingredient
pub async fn create(
    State(state): State<ServerState>,
    principal: Principal,
    Json(payload): Json<IngredientCreate>,
) -> AppResult<Json<Ingredient>> {
    principal.require_seller()?;
    let repo = IngredientRepository::new(state.get_db());
    let ingredient = repo.create(&principal.id, payload).await?;
    Ok(Json(ingredient))
}

/// Update an ingredient (owner only)
pub async fn update(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(payload): Json<IngredientUpdate>,
) -> AppResult<Json<Ingredient>> {
    principal.require_seller()?;
    let repo = IngredientRepository::new(state.get_db());

    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ingredient {}", id)))?;
    if existing.owner_id != principal.id {
        return Err(AppError::permission_denied(
            "Not the owner of this ingredient",
        ));
    }

    let ingredient = repo.update(&id, payload).await?;
    Ok(Json(ingredient))
}

/// Delete an ingredient (owner only)
pub async fn remove(
    State(state): State<ServerState>,
    principal: Principal,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    principal.require_seller()?;
    let repo = IngredientRepository::new(state.get_db());

    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ingredient {}", id)))?;
    if existing.owner_id != principal.id {
        return Err(AppError::permission_denied(
            "Not the owner of this ingredient",
        ));
    }

    repo.delete(&id).await?;
    Ok(Json(ApiResponse::ok()))
}
