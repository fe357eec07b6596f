//! Notification Model (collaborator table)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Notification kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderPlaced,
    OrderStatus,
}

/// Notification row written as an order-flow side effect
///
/// Dispatch is fire-and-forget: a failed write is logged and swallowed, never
/// propagated into the transaction that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub recipient_id: String,
    pub kind: NotificationKind,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub order_id: Option<RecordId>,
    pub message: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub read: bool,
    pub created_at: i64,
}
