//! Order lifecycle
//!
//! Turns a buyer's cart (or a single buy-now line) into durable
//! order + order-line + revenue-ledger records in one transaction, and owns
//! the post-creation status transitions, including the seller-specific
//! partial rejection.

pub mod money;
pub mod status;

use crate::db::models::{ContactInfo, OrderDetail, OrderItem, OrderStatus};
use crate::db::repository::order::CheckoutLine;
use crate::db::repository::{CartRepository, OrderRepository, ProductRepository, RepoError};
use crate::notify::NotificationService;
use shared::AppError;
use status::StatusRequest;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid order line: {0}")]
    InvalidLine(String),

    #[error("Product {0} not found")]
    ProductNotFound(String),

    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Order is already {0}")]
    Finalized(OrderStatus),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => AppError::cart_empty(),
            OrderError::InvalidLine(msg) => AppError::validation(msg),
            OrderError::ProductNotFound(id) => AppError::product_not_found(id),
            OrderError::OrderNotFound(id) => AppError::order_not_found(id),
            OrderError::UnknownStatus(s) => AppError::with_message(
                shared::ErrorCode::OrderStatusUnknown,
                format!("Status '{}' is not recognized", s),
            ),
            OrderError::Unauthorized(msg) => AppError::permission_denied(msg),
            OrderError::Finalized(status) => AppError::order_finalized(status.as_str()),
            OrderError::InvalidState(msg) => AppError::invalid_state(msg),
            OrderError::Repo(e) => e.into(),
        }
    }
}

/// Result of a confirmation update, for the success message
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub detail: OrderDetail,
    pub message: String,
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    products: ProductRepository,
    cart: CartRepository,
    notifier: NotificationService,
}

impl OrderService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            cart: CartRepository::new(db.clone()),
            notifier: NotificationService::new(db),
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Check out the buyer's persisted cart
    ///
    /// Lines are charged at their add-to-cart price snapshot, never the
    /// product's current price. Lines whose product no longer resolves are
    /// skipped; if nothing resolvable remains the cart counts as empty and
    /// no write happens.
    pub async fn checkout(
        &self,
        buyer_id: &str,
        contact: &ContactInfo,
    ) -> Result<OrderDetail, OrderError> {
        let cart_lines = self.cart.find_by_user(buyer_id).await?;
        if cart_lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(cart_lines.len());
        for cart_line in &cart_lines {
            let product_id = cart_line.product_id.to_string();
            let Some(product) = self.products.find_by_id(&product_id).await? else {
                tracing::warn!(
                    buyer_id = %buyer_id,
                    product_id = %product_id,
                    "Skipping cart line: product no longer exists"
                );
                continue;
            };

            money::validate_line(cart_line.unit_price, cart_line.quantity)?;
            lines.push(CheckoutLine {
                product: cart_line.product_id.clone(),
                owner_id: product.owner_id,
                quantity: cart_line.quantity,
                // cart-time snapshot, not product.price
                unit_price: cart_line.unit_price,
                line_total: money::line_total(cart_line.quantity, cart_line.unit_price),
            });
        }

        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        self.place(buyer_id, contact, lines, true).await
    }

    /// Buy a single product directly, bypassing the cart
    ///
    /// The price is read from the product's current price at call time —
    /// unlike checkout, which charges the cart-time snapshot.
    pub async fn buy_now(
        &self,
        buyer_id: &str,
        product_id: &str,
        quantity: i32,
        contact: &ContactInfo,
    ) -> Result<OrderDetail, OrderError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| OrderError::ProductNotFound(product_id.to_string()))?;

        money::validate_line(product.price, quantity)?;

        let product_ref = product
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Product row has no id".into()))?;
        let lines = vec![CheckoutLine {
            product: product_ref,
            owner_id: product.owner_id,
            quantity,
            unit_price: product.price,
            line_total: money::line_total(quantity, product.price),
        }];

        self.place(buyer_id, contact, lines, false).await
    }

    /// Shared tail of checkout/buy-now: one transaction, then notify sellers
    async fn place(
        &self,
        buyer_id: &str,
        contact: &ContactInfo,
        lines: Vec<CheckoutLine>,
        clear_cart: bool,
    ) -> Result<OrderDetail, OrderError> {
        let total = money::order_total(lines.iter().map(|l| l.line_total));

        let mut sellers: Vec<String> = lines.iter().map(|l| l.owner_id.clone()).collect();
        sellers.sort();
        sellers.dedup();

        let order = self
            .orders
            .create_with_lines(buyer_id, contact, total, lines, clear_cart)
            .await?;

        let order_id = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Order row has no id".into()))?;

        tracing::info!(
            buyer_id = %buyer_id,
            order = %order_id,
            total = total,
            sellers = sellers.len(),
            "Order placed"
        );

        for seller in &sellers {
            self.notifier
                .order_placed(seller, &order_id, &contact.buyer_name)
                .await;
        }

        let detail = self
            .orders
            .find_detail(&order_id.to_string())
            .await?
            .ok_or_else(|| RepoError::Database("Created order not readable".into()))?;
        Ok(detail)
    }

    // =========================================================================
    // Status transitions
    // =========================================================================

    /// Apply a status update in whichever vocabulary the request uses
    ///
    /// The requester must be the buyer or a seller with at least one line on
    /// the order. Confirmation updates (`accepted`/`rejected`) are seller
    /// only; on `rejected`, only the requesting seller's lines and ledger
    /// entries are removed.
    pub async fn update_status(
        &self,
        order_id: &str,
        requester_id: &str,
        requester_name: &str,
        requested: &str,
    ) -> Result<StatusChange, OrderError> {
        let request = StatusRequest::parse(requested)
            .ok_or_else(|| OrderError::UnknownStatus(requested.to_string()))?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        let items = self.orders.find_items(order_id).await?;

        let is_buyer = order.buyer_id == requester_id;
        let is_seller = items.iter().any(|item| item.owner_id == requester_id);
        if !is_buyer && !is_seller {
            return Err(OrderError::Unauthorized(
                "Requester has no standing on this order".into(),
            ));
        }

        let updated = match request {
            StatusRequest::Fulfillment(target) => {
                let updated = self.orders.set_status(order_id, target).await?;
                self.notify_buyer_if_seller(&order, is_buyer, requester_name, target)
                    .await;
                updated
            }
            StatusRequest::Confirmation(target) => {
                if !is_seller {
                    return Err(OrderError::Unauthorized(
                        "Only a seller on this order may confirm or reject it".into(),
                    ));
                }
                // Fast pre-check; the transaction re-checks under isolation
                if let Err(current) = status::check_confirmation(order.status, target) {
                    return Err(OrderError::Finalized(current));
                }

                let outcome = self
                    .orders
                    .apply_confirmation(order_id, requester_id, target)
                    .await
                    .map_err(|e| map_confirmation_err(e, order_id, order.status))?;

                if outcome.remaining_items == 0 {
                    // Fully rejected orders stay in place as an audit trail.
                    tracing::info!(
                        order = %order_id,
                        "All lines removed by rejection; keeping empty order"
                    );
                }

                self.notify_buyer_if_seller(&order, is_buyer, requester_name, target)
                    .await;
                outcome.order
            }
        };

        let status = updated.status;
        let detail = self
            .orders
            .find_detail(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        Ok(StatusChange {
            detail,
            message: format!("Order is now {}", status),
        })
    }

    /// Buyer cancels a still-pending order
    pub async fn cancel(
        &self,
        order_id: &str,
        buyer_id: &str,
        buyer_name: &str,
    ) -> Result<OrderDetail, OrderError> {
        let items = self.orders.find_items(order_id).await?;

        let order = self
            .orders
            .cancel(order_id, buyer_id)
            .await
            .map_err(|e| map_cancel_err(e, order_id))?;

        let order_ref = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Order row has no id".into()))?;

        let mut sellers: Vec<&str> = items.iter().map(|i| i.owner_id.as_str()).collect();
        sellers.sort();
        sellers.dedup();
        for seller in sellers {
            self.notifier
                .order_status(seller, &order_ref, OrderStatus::Cancelled.as_str(), buyer_name)
                .await;
        }

        let detail = self
            .orders
            .find_detail(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        Ok(detail)
    }

    /// Notify the buyer of a seller-initiated change (self-notification skipped)
    async fn notify_buyer_if_seller(
        &self,
        order: &crate::db::models::Order,
        requester_is_buyer: bool,
        requester_name: &str,
        new_status: OrderStatus,
    ) {
        if requester_is_buyer {
            return;
        }
        if let Some(order_ref) = &order.id {
            self.notifier
                .order_status(
                    &order.buyer_id,
                    order_ref,
                    new_status.as_str(),
                    requester_name,
                )
                .await;
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Order detail, restricted to the buyer and contributing sellers
    pub async fn get_order(
        &self,
        order_id: &str,
        requester_id: &str,
    ) -> Result<OrderDetail, OrderError> {
        let detail = self
            .orders
            .find_detail(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let is_party = detail.buyer_id == requester_id
            || detail.items.iter().any(|i| i.owner_id == requester_id);
        if !is_party {
            return Err(OrderError::Unauthorized(
                "Requester has no standing on this order".into(),
            ));
        }
        Ok(detail)
    }

    /// Items of an order (internal helper for reports/tests)
    pub async fn order_items(&self, order_id: &str) -> Result<Vec<OrderItem>, OrderError> {
        Ok(self.orders.find_items(order_id).await?)
    }
}

/// Map confirm-transaction markers to lifecycle errors
fn map_confirmation_err(err: RepoError, order_id: &str, current: OrderStatus) -> OrderError {
    match &err {
        RepoError::Conflict(marker) if marker == "order_finalized" => {
            OrderError::Finalized(current)
        }
        RepoError::NotFound(_) => OrderError::OrderNotFound(order_id.to_string()),
        _ => OrderError::Repo(err),
    }
}

/// Map cancel-transaction markers to lifecycle errors
fn map_cancel_err(err: RepoError, order_id: &str) -> OrderError {
    match &err {
        RepoError::Validation(marker) if marker == "invalid_state" => {
            OrderError::InvalidState("Only pending orders can be cancelled".into())
        }
        RepoError::Validation(marker) if marker == "not_order_party" => {
            OrderError::Unauthorized("Only the buyer may cancel this order".into())
        }
        RepoError::NotFound(_) => OrderError::OrderNotFound(order_id.to_string()),
        _ => OrderError::Repo(err),
    }
}
