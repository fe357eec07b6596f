//! Purchase Model (seller revenue ledger)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Revenue ledger entry — a per-seller mirror of an order line
///
/// Written in the same transaction as its [`super::OrderItem`] and deleted in
/// lockstep with it during rejection cleanup. Keyed by owner so seller-side
/// revenue reporting never joins through the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner_id: String,
    pub buyer_id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product_id: RecordId,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
    pub sold_at: i64,
}
