//! Cart Repository
//!
//! One row per (user, product). Adding an existing product bumps the
//! quantity but keeps the original price snapshot.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CartItem, CartItemView};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All cart lines for a user
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<CartItem>> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE user_id = $user ORDER BY created_at")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Cart lines with product names resolved for display
    pub async fn find_by_user_resolved(&self, user_id: &str) -> RepoResult<Vec<CartItemView>> {
        let items: Vec<CartItemView> = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    <string>id AS id,
                    <string>product_id AS product_id,
                    product_id.name AS product_name,
                    quantity,
                    unit_price,
                    quantity * unit_price AS line_total
                FROM cart_item
                WHERE user_id = $user
                ORDER BY created_at
                "#,
            )
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Add a product to the cart, snapshotting its current price
    ///
    /// Upsert: a second add of the same product adds to the quantity and
    /// leaves the existing `unit_price` snapshot untouched.
    pub async fn add(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i32,
        unit_price: f64,
    ) -> RepoResult<CartItem> {
        if quantity <= 0 {
            return Err(RepoError::Validation(format!(
                "quantity must be positive, got {}",
                quantity
            )));
        }
        let product: RecordId = product_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid product ID: {}", product_id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $existing = (SELECT * FROM cart_item WHERE user_id = $user AND product_id = $product);
                IF array::len($existing) > 0 {
                    UPDATE cart_item
                        SET quantity += $quantity, updated_at = $now
                        WHERE user_id = $user AND product_id = $product
                        RETURN AFTER
                } ELSE {
                    CREATE cart_item CONTENT {
                        user_id: $user,
                        product_id: $product,
                        quantity: $quantity,
                        unit_price: $unit_price,
                        created_at: $now,
                        updated_at: $now
                    }
                }
                "#,
            )
            .bind(("user", user_id.to_string()))
            .bind(("product", product))
            .bind(("quantity", quantity))
            .bind(("unit_price", unit_price))
            .bind(("now", now_millis()))
            .await?;

        let items: Vec<CartItem> = result.take(1)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to upsert cart item".to_string()))
    }

    /// Remove one cart line
    pub async fn remove(&self, user_id: &str, product_id: &str) -> RepoResult<()> {
        let product: RecordId = product_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid product ID: {}", product_id)))?;

        self.base
            .db()
            .query("DELETE cart_item WHERE user_id = $user AND product_id = $product")
            .bind(("user", user_id.to_string()))
            .bind(("product", product))
            .await?;
        Ok(())
    }

    /// Remove every cart line for a user
    pub async fn clear(&self, user_id: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_item WHERE user_id = $user")
            .bind(("user", user_id.to_string()))
            .await?;
        Ok(())
    }
}
