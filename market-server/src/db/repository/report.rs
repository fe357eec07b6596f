//! Report Repository
//!
//! Read-only aggregation queries behind the profit reports and the owner
//! dashboard. Revenue comes from order lines (precise, per sale); cost comes
//! from ingredient batches (coarse, per category and period). Which batches
//! fall inside a window is decided by the predicates in `reports::overlap`,
//! so these queries only fetch and sum.
//!
//! All money aggregates coalesce to zero (`math::sum(..) OR 0`) — an owner
//! with no rows gets zeros, never nulls.

use super::{BaseRepository, RepoResult};
use crate::db::models::IngredientBatch;
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Revenue aggregate for one product category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRevenueRow {
    /// Null when the order line's product no longer resolves
    pub category: Option<String>,
    pub revenue: f64,
    pub sold_quantity: i64,
}

/// Itemized cost aggregate for one batch
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCostRow {
    #[serde(with = "crate::db::models::serde_helpers::record_id")]
    pub batch: RecordId,
    pub cost: f64,
}

/// Revenue headline figures for the dashboard window
#[derive(Debug, Clone, Deserialize)]
pub struct RevenueTotals {
    pub revenue: f64,
    pub order_count: i64,
}

/// Per-product sales row (dashboard top products)
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct ProductSalesRow {
    pub name: Option<String>,
    pub quantity: i64,
    pub revenue: f64,
}

/// Per-category sales row (dashboard breakdown)
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct CategorySalesRow {
    pub category: Option<String>,
    pub revenue: f64,
}

/// Per-ingredient usage row (dashboard cost side)
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct IngredientUsageRow {
    pub name: Option<String>,
    pub quantity_used: f64,
    pub cost: f64,
}

#[derive(Clone)]
pub struct ReportRepository {
    base: BaseRepository,
}

impl ReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    // =========================================================================
    // Revenue side (order lines)
    // =========================================================================

    /// Revenue and sold quantity per product category for one seller,
    /// optionally restricted to lines created inside [from, to] (inclusive)
    ///
    /// Category comes from the product join — exact label as listed in the
    /// catalog, no keyword matching here.
    pub async fn revenue_by_category(
        &self,
        owner_id: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> RepoResult<Vec<CategoryRevenueRow>> {
        let mut conditions = vec!["owner_id = $owner"];
        if from.is_some() {
            conditions.push("created_at >= $from");
        }
        if to.is_some() {
            conditions.push("created_at <= $to");
        }

        let query_str = format!(
            r#"
            SELECT
                product_id.category AS category,
                math::sum(line_total) AS revenue,
                math::sum(quantity) AS sold_quantity
            FROM order_item
            WHERE {}
            GROUP BY category
            "#,
            conditions.join(" AND ")
        );

        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("owner", owner_id.to_string()));
        if let Some(from) = from {
            query = query.bind(("from", from));
        }
        if let Some(to) = to {
            query = query.bind(("to", to));
        }

        let rows: Vec<CategoryRevenueRow> = query.await?.take(0)?;
        Ok(rows)
    }

    /// Dashboard revenue headline: total revenue plus distinct order count
    /// for lines whose parent order was created inside [from, to]
    pub async fn revenue_totals(
        &self,
        owner_id: &str,
        from: i64,
        to: i64,
    ) -> RepoResult<RevenueTotals> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    math::sum(line_total) OR 0 AS revenue,
                    array::len(array::distinct(array::group(order_id))) AS order_count
                FROM order_item
                WHERE product_id.owner_id = $owner
                    AND order_id.created_at >= $from
                    AND order_id.created_at <= $to
                GROUP ALL
                "#,
            )
            .bind(("owner", owner_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await?;

        let totals: Option<RevenueTotals> = result.take(0)?;
        Ok(totals.unwrap_or(RevenueTotals {
            revenue: 0.0,
            order_count: 0,
        }))
    }

    /// Top products by quantity sold inside the dashboard window
    pub async fn top_products(
        &self,
        owner_id: &str,
        from: i64,
        to: i64,
        limit: i64,
    ) -> RepoResult<Vec<ProductSalesRow>> {
        let rows: Vec<ProductSalesRow> = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    product_id.name AS name,
                    math::sum(quantity) AS quantity,
                    math::sum(line_total) AS revenue
                FROM order_item
                WHERE product_id.owner_id = $owner
                    AND order_id.created_at >= $from
                    AND order_id.created_at <= $to
                GROUP BY name
                ORDER BY quantity DESC
                LIMIT $limit
                "#,
            )
            .bind(("owner", owner_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Per-category revenue inside the dashboard window, highest first
    pub async fn category_sales(
        &self,
        owner_id: &str,
        from: i64,
        to: i64,
    ) -> RepoResult<Vec<CategorySalesRow>> {
        let rows: Vec<CategorySalesRow> = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    product_id.category AS category,
                    math::sum(line_total) AS revenue
                FROM order_item
                WHERE product_id.owner_id = $owner
                    AND order_id.created_at >= $from
                    AND order_id.created_at <= $to
                GROUP BY category
                ORDER BY revenue DESC
                "#,
            )
            .bind(("owner", owner_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(rows)
    }

    // =========================================================================
    // Cost side (ingredient batches)
    // =========================================================================

    /// All candidate batches of one owner, optionally narrowed to one
    /// category (exact string equality — the reconciliation matching rule)
    pub async fn batches_for_owner(
        &self,
        owner_id: &str,
        category: Option<&str>,
    ) -> RepoResult<Vec<IngredientBatch>> {
        let mut conditions = vec!["owner_id = $owner"];
        if category.is_some() {
            conditions.push("category = $category");
        }

        let query_str = format!(
            "SELECT * FROM ingredient_batch WHERE {}",
            conditions.join(" AND ")
        );

        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("owner", owner_id.to_string()));
        if let Some(category) = category {
            query = query.bind(("category", category.to_string()));
        }

        let batches: Vec<IngredientBatch> = query.await?.take(0)?;
        Ok(batches)
    }

    /// Itemized cost per batch (Σ line_cost grouped by batch)
    pub async fn batch_item_costs(
        &self,
        batch_ids: Vec<RecordId>,
    ) -> RepoResult<Vec<BatchCostRow>> {
        if batch_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<BatchCostRow> = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    batch_id AS batch,
                    math::sum(line_cost) AS cost
                FROM ingredient_batch_item
                WHERE batch_id IN $batches
                GROUP BY batch
                "#,
            )
            .bind(("batches", batch_ids))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Per-ingredient usage across the given batches (dashboard cost side)
    pub async fn ingredient_usage(
        &self,
        batch_ids: Vec<RecordId>,
    ) -> RepoResult<Vec<IngredientUsageRow>> {
        if batch_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<IngredientUsageRow> = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    ingredient_id.name AS name,
                    math::sum(quantity_used) AS quantity_used,
                    math::sum(line_cost) AS cost
                FROM ingredient_batch_item
                WHERE batch_id IN $batches
                GROUP BY name
                ORDER BY cost DESC
                "#,
            )
            .bind(("batches", batch_ids))
            .await?
            .take(0)?;
        Ok(rows)
    }
}
