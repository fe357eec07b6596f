//! Order Model
//!
//! Orders are created once at checkout and mutated only through status
//! transitions. Line items snapshot unit prices; `line_total` is stored, not
//! derived, so later recomputation drift cannot change historical orders.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

// =============================================================================
// Order status
// =============================================================================

/// Order status — one enum backing both caller vocabularies
///
/// The buyer-facing flow moves `pending → processing → shipped → delivered`
/// (or `pending → cancelled`); the seller confirmation flow moves
/// `pending → accepted` or `pending → terminated`. The wire word "rejected"
/// is translated to [`OrderStatus::Terminated`] before it reaches storage;
/// `terminated` and `cancelled` are distinct terminal states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Accepted,
    Terminated,
}

impl OrderStatus {
    /// Storage/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub buyer_id: String,
    pub status: OrderStatus,
    /// Computed once at creation from the line snapshots, never recomputed
    pub total_amount: f64,
    pub buyer_name: String,
    pub buyer_address: String,
    pub buyer_phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
///
/// `owner_id` is denormalized from the product so per-seller filtering never
/// needs the product join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product_id: RecordId,
    pub owner_id: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
    pub created_at: i64,
}

// =============================================================================
// API payloads
// =============================================================================

/// Buyer contact fields captured on the order
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct ContactInfo {
    #[validate(length(min = 1, message = "buyer name is required"))]
    pub buyer_name: String,
    #[validate(length(min = 1, message = "buyer address is required"))]
    pub buyer_address: String,
    #[validate(length(min = 1, message = "buyer phone is required"))]
    pub buyer_phone: String,
}

/// Order line for detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    pub id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub owner_id: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Full order detail (order plus its line items)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: String,
    pub buyer_id: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub buyer_name: String,
    pub buyer_address: String,
    pub buyer_phone: String,
    pub created_at: i64,
    #[serde(default)]
    pub items: Vec<OrderItemDetail>,
}
