//! Ingredient Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Ingredient catalog entry, owner-scoped
///
/// `current_unit_price` is the mutable catalog price. It is only a default
/// offered when composing a new batch item; once a batch item exists its
/// `unit_price_snapshot` is frozen and does not follow later changes here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner_id: String,
    pub name: String,
    /// Unit of measure (kg, l, pcs, ...)
    pub unit: String,
    pub current_unit_price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create ingredient payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub unit: String,
    pub current_unit_price: f64,
}

/// Update ingredient payload (partial)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub current_unit_price: Option<f64>,
}
