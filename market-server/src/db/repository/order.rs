//! Order Repository
//!
//! All order write paths run as single multi-statement SurrealQL transactions
//! so that checkout (order + lines + ledger + cart clear) and the
//! confirm/reject read-then-write are all-or-nothing. `THROW` inside a
//! transaction aborts it; thrown markers are mapped back to typed errors.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ContactInfo, Order, OrderDetail, OrderItem, OrderItemDetail, OrderStatus};
use serde::Serialize;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// One resolved line going into a checkout transaction
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutLine {
    pub product: RecordId,
    pub owner_id: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Outcome of a confirm/reject transition
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub order: Order,
    /// Line items remaining on the order after any cleanup
    pub remaining_items: usize,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_order_id(id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// All orders of one buyer, newest first
    pub async fn find_by_buyer(&self, buyer_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE buyer_id = $buyer ORDER BY created_at DESC")
            .bind(("buyer", buyer_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders containing at least one line of the given seller, newest first
    pub async fn find_by_seller(&self, owner_id: &str) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $order_ids = (SELECT VALUE order_id FROM order_item WHERE owner_id = $owner);
                SELECT * FROM order WHERE id IN $order_ids ORDER BY created_at DESC;
                "#,
            )
            .bind(("owner", owner_id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(1)?;
        Ok(orders)
    }

    /// Line items of an order
    pub async fn find_items(&self, order_id: &str) -> RepoResult<Vec<OrderItem>> {
        let record_id = parse_order_id(order_id)?;
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order_id = $order ORDER BY created_at")
            .bind(("order", record_id))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Order with its line items attached (product names resolved via link)
    pub async fn find_detail(&self, order_id: &str) -> RepoResult<Option<OrderDetail>> {
        let record_id = parse_order_id(order_id)?;
        let Some(order) = self.find_by_id(order_id).await? else {
            return Ok(None);
        };

        let items: Vec<OrderItemDetail> = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    <string>id AS id,
                    <string>product_id AS product_id,
                    product_id.name AS product_name,
                    owner_id,
                    quantity,
                    unit_price,
                    line_total
                FROM order_item
                WHERE order_id = $order
                ORDER BY created_at
                "#,
            )
            .bind(("order", record_id))
            .await?
            .take(0)?;

        Ok(Some(detail_from(order, items)))
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Create order + line items + revenue ledger entries and clear the
    /// buyer's cart, in one transaction
    ///
    /// `clear_cart` is false for the buy-now path, which never touches the
    /// persisted cart.
    pub async fn create_with_lines(
        &self,
        buyer_id: &str,
        contact: &ContactInfo,
        total_amount: f64,
        lines: Vec<CheckoutLine>,
        clear_cart: bool,
    ) -> RepoResult<Order> {
        let cart_clear = if clear_cart {
            "DELETE cart_item WHERE user_id = $buyer;"
        } else {
            ""
        };

        let script = format!(
            r#"
            BEGIN TRANSACTION;
            LET $order = (CREATE ONLY order CONTENT {{
                buyer_id: $buyer,
                status: 'pending',
                total_amount: $total,
                buyer_name: $buyer_name,
                buyer_address: $buyer_address,
                buyer_phone: $buyer_phone,
                created_at: $now,
                updated_at: $now
            }});
            FOR $line IN $lines {{
                CREATE order_item CONTENT {{
                    order_id: $order.id,
                    product_id: $line.product,
                    owner_id: $line.owner_id,
                    quantity: $line.quantity,
                    unit_price: $line.unit_price,
                    line_total: $line.line_total,
                    created_at: $now
                }};
                CREATE purchase CONTENT {{
                    owner_id: $line.owner_id,
                    buyer_id: $buyer,
                    order_id: $order.id,
                    product_id: $line.product,
                    quantity: $line.quantity,
                    unit_price: $line.unit_price,
                    line_total: $line.line_total,
                    sold_at: $now
                }};
            }};
            {cart_clear}
            RETURN $order;
            COMMIT TRANSACTION;
            "#
        );

        let mut result = self
            .base
            .db()
            .query(script)
            .bind(("buyer", buyer_id.to_string()))
            .bind(("total", total_amount))
            .bind(("buyer_name", contact.buyer_name.clone()))
            .bind(("buyer_address", contact.buyer_address.clone()))
            .bind(("buyer_phone", contact.buyer_phone.clone()))
            .bind(("lines", lines))
            .bind(("now", now_millis()))
            .await?;

        let last = result.num_statements().saturating_sub(1);
        let order: Option<Order> = result.take(last)?;
        order.ok_or_else(|| RepoError::Database("Checkout transaction returned no order".into()))
    }

    // =========================================================================
    // Status transitions
    // =========================================================================

    /// Buyer-facing status update (permissive, no sequencing enforcement)
    pub async fn set_status(&self, order_id: &str, status: OrderStatus) -> RepoResult<Order> {
        let record_id = parse_order_id(order_id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("id", record_id))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
    }

    /// Owner confirmation transition (accepted / terminated)
    ///
    /// Runs the terminal-state check and the write in one transaction, which
    /// is the embedded-engine equivalent of a lock-for-update read: two
    /// sellers racing the same order serialize here. On `terminated`, only
    /// the requesting seller's lines and ledger entries are removed; the
    /// order row always survives, even when no lines remain (audit trail).
    pub async fn apply_confirmation(
        &self,
        order_id: &str,
        owner_id: &str,
        target: OrderStatus,
    ) -> RepoResult<ConfirmOutcome> {
        debug_assert!(matches!(
            target,
            OrderStatus::Accepted | OrderStatus::Terminated
        ));
        let record_id = parse_order_id(order_id)?;

        let cleanup = if target == OrderStatus::Terminated {
            r#"
            DELETE order_item WHERE order_id = $id AND owner_id = $owner;
            DELETE purchase WHERE order_id = $id AND owner_id = $owner;
            "#
        } else {
            ""
        };

        let script = format!(
            r#"
            BEGIN TRANSACTION;
            LET $order = (SELECT * FROM ONLY $id);
            IF $order == NONE {{
                THROW "order_not_found";
            }};
            IF $order.status IN ['accepted', 'terminated'] AND $order.status != $target {{
                THROW "order_finalized";
            }};
            UPDATE $id SET status = $target, updated_at = $now;
            {cleanup}
            RETURN {{
                order: (SELECT * FROM ONLY $id),
                remaining: count((SELECT VALUE id FROM order_item WHERE order_id = $id))
            }};
            COMMIT TRANSACTION;
            "#
        );

        let mut result = self
            .base
            .db()
            .query(script)
            .bind(("id", record_id))
            .bind(("owner", owner_id.to_string()))
            .bind(("target", target))
            .bind(("now", now_millis()))
            .await
            .map_err(map_thrown)?;

        let last = result.num_statements().saturating_sub(1);
        let outcome: Option<ConfirmRaw> = result.take(last).map_err(map_thrown)?;
        let outcome =
            outcome.ok_or_else(|| RepoError::Database("Confirmation returned no order".into()))?;

        Ok(ConfirmOutcome {
            order: outcome.order,
            remaining_items: outcome.remaining as usize,
        })
    }

    /// Buyer cancellation — legal only while the order is still pending
    pub async fn cancel(&self, order_id: &str, buyer_id: &str) -> RepoResult<Order> {
        let record_id = parse_order_id(order_id)?;

        let mut result = self
            .base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                LET $order = (SELECT * FROM ONLY $id);
                IF $order == NONE {
                    THROW "order_not_found";
                };
                IF $order.buyer_id != $buyer {
                    THROW "not_order_party";
                };
                IF $order.status != 'pending' {
                    THROW "invalid_state";
                };
                UPDATE $id SET status = 'cancelled', updated_at = $now;
                RETURN (SELECT * FROM ONLY $id);
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("id", record_id))
            .bind(("buyer", buyer_id.to_string()))
            .bind(("now", now_millis()))
            .await
            .map_err(map_thrown)?;

        let last = result.num_statements().saturating_sub(1);
        let order: Option<Order> = result.take(last).map_err(map_thrown)?;
        order.ok_or_else(|| RepoError::Database("Cancel transaction returned no order".into()))
    }
}

#[derive(Debug, serde::Deserialize)]
struct ConfirmRaw {
    order: Order,
    #[serde(default)]
    remaining: i64,
}

fn parse_order_id(id: &str) -> RepoResult<RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid order ID: {}", id)))
}

fn detail_from(order: Order, items: Vec<OrderItemDetail>) -> OrderDetail {
    OrderDetail {
        order_id: order
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default(),
        buyer_id: order.buyer_id,
        status: order.status,
        total_amount: order.total_amount,
        buyer_name: order.buyer_name,
        buyer_address: order.buyer_address,
        buyer_phone: order.buyer_phone,
        created_at: order.created_at,
        items,
    }
}

/// Map transaction `THROW` markers back to typed repository errors
fn map_thrown(err: surrealdb::Error) -> RepoError {
    let msg = err.to_string();
    if msg.contains("order_not_found") {
        RepoError::NotFound("Order not found".into())
    } else if msg.contains("order_finalized") {
        RepoError::Conflict("order_finalized".into())
    } else if msg.contains("not_order_party") {
        RepoError::Validation("not_order_party".into())
    } else if msg.contains("invalid_state") {
        RepoError::Validation("invalid_state".into())
    } else {
        RepoError::Database(msg)
    }
}
