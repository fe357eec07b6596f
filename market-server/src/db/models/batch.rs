//! Ingredient Batch Model
//!
//! A batch is an owner-entered record of ingredient consumption for a
//! category over a period. It exists only for cost estimation, not inventory
//! tracking, and is immutable once created except for deletion.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Ingredient consumption batch
///
/// `category` is matched against `Product.category` by exact string equality
/// in the reconciliation engine — not a foreign key, and not the keyword
/// heuristic used for catalog browsing.
///
/// `period_start`/`period_end` may each be null for open-ended periods;
/// batches with no period at all are matched on `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientBatch {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner_id: String,
    pub category: String,
    pub period_start: Option<i64>,
    pub period_end: Option<i64>,
    pub notes: Option<String>,
    /// Denormalized Σ line_cost (or a caller-supplied figure for batches
    /// entered without itemized lines)
    pub total_cost: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Batch line item
///
/// `unit_price_snapshot` is the ingredient price at batch-entry time; it is
/// never linked back to `Ingredient.current_unit_price` after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientBatchItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub batch_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub ingredient_id: RecordId,
    pub quantity_used: f64,
    pub unit_price_snapshot: f64,
    pub line_cost: f64,
    pub created_at: i64,
}
