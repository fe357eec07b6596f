//! Cart Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cart line — at most one row per (user, product)
///
/// `unit_price` is a snapshot taken at add-to-cart time. It is deliberately
/// not refreshed when the product's current price changes; checkout charges
/// the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub user_id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub product_id: RecordId,
    pub quantity: i32,
    pub unit_price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart line with product fields resolved for display
///
/// `product_name` is null when the product has vanished since the line was
/// added; checkout skips such lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemView {
    pub id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}
