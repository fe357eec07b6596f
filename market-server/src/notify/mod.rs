//! Notification side effects
//!
//! Order flows emit notifications to the counterparty. Dispatch is
//! fire-and-forget: a failed write is logged and swallowed so it can never
//! fail or roll back the order transaction that triggered it.

use crate::db::models::NotificationKind;
use crate::db::repository::NotificationRepository;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: NotificationRepository::new(db),
        }
    }

    /// Tell a seller that a buyer placed an order containing their products
    pub async fn order_placed(&self, seller_id: &str, order: &RecordId, buyer_name: &str) {
        let message = format!("New order from {}", buyer_name);
        if let Err(e) = self
            .repo
            .create(
                seller_id,
                NotificationKind::OrderPlaced,
                Some(order.clone()),
                message,
            )
            .await
        {
            tracing::warn!(
                seller_id = %seller_id,
                order = %order,
                error = %e,
                "Failed to create order notification"
            );
        }
    }

    /// Tell the buyer that a seller changed their order's status
    pub async fn order_status(
        &self,
        buyer_id: &str,
        order: &RecordId,
        new_status: &str,
        actor_name: &str,
    ) {
        let message = format!("Order status changed to {} by {}", new_status, actor_name);
        if let Err(e) = self
            .repo
            .create(
                buyer_id,
                NotificationKind::OrderStatus,
                Some(order.clone()),
                message,
            )
            .await
        {
            tracing::warn!(
                buyer_id = %buyer_id,
                order = %order,
                error = %e,
                "Failed to create status notification"
            );
        }
    }
}
