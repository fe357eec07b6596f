//! Cost reconciliation reports
//!
//! Reconciles the precise per-sale revenue ledger against the coarse
//! per-category-period ingredient batches to estimate profit, per category
//! and for the owner dashboard. Read-only; missing data resolves to
//! zero-valued aggregates, never an error.

pub mod overlap;
pub mod reconcile;

use crate::db::models::IngredientBatch;
use crate::db::repository::ReportRepository;
use crate::db::repository::report::{CategorySalesRow, IngredientUsageRow, ProductSalesRow};
use crate::orders::money::{to_decimal, to_f64};
use crate::utils::time;
use chrono::NaiveDate;
use chrono_tz::Tz;
use reconcile::{CategoryProfit, ReportPeriod, RevenueEntry};
use serde::Serialize;
use shared::AppResult;
use std::collections::BTreeMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TOP_PRODUCT_LIMIT: i64 = 10;

/// Fallback label for order lines whose product link no longer resolves
const UNCATEGORIZED: &str = "Uncategorized";

/// Owner dashboard response
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub period: ReportPeriod,
    pub revenue: f64,
    pub order_count: i64,
    pub top_products: Vec<ProductSalesRow>,
    pub category_sales: Vec<CategorySalesRow>,
    pub ingredient_usage: Vec<IngredientUsageRow>,
    pub ingredient_cost: f64,
    pub profit: f64,
}

#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
    tz: Tz,
}

impl ReportService {
    pub fn new(db: Surreal<Db>, tz: Tz) -> Self {
        Self {
            reports: ReportRepository::new(db),
            tz,
        }
    }

    // =========================================================================
    // Profit reports
    // =========================================================================

    /// Profit for one category over an optional window
    ///
    /// Revenue: the owner's order lines in that exact category. Cost: the
    /// itemized lines of the owner's batches in that exact category whose
    /// period matches the window ([`overlap::matches_report_window`]).
    pub async fn profit_by_category(
        &self,
        owner_id: &str,
        category: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> AppResult<CategoryProfit> {
        let period = ReportPeriod { from, to };

        let revenue_rows = self.reports.revenue_by_category(owner_id, from, to).await?;
        let revenue = revenue_rows
            .into_iter()
            .find(|row| row.category.as_deref() == Some(category))
            .map(|row| RevenueEntry {
                revenue: row.revenue,
                sold_quantity: row.sold_quantity,
            })
            .unwrap_or_default();

        let batches = self
            .reports
            .batches_for_owner(owner_id, Some(category))
            .await?;
        let cost = self.itemized_cost_in_window(&batches, from, to).await?;

        let (profit, margin_pct) = reconcile::profit_and_margin(revenue.revenue, cost);
        Ok(CategoryProfit {
            category: category.to_string(),
            period,
            sold_quantity: revenue.sold_quantity,
            revenue: to_f64(to_decimal(revenue.revenue)),
            ingredient_cost: to_f64(to_decimal(cost)),
            profit,
            margin_pct,
        })
    }

    /// Profit rows for every category present on either ledger
    ///
    /// Union, not inner join: a category with batches but no sales (or sales
    /// but no batches) still appears with the missing side at zero.
    pub async fn profit_summary(
        &self,
        owner_id: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> AppResult<Vec<CategoryProfit>> {
        let period = ReportPeriod { from, to };

        let revenue: BTreeMap<String, RevenueEntry> = self
            .reports
            .revenue_by_category(owner_id, from, to)
            .await?
            .into_iter()
            .map(|row| {
                (
                    row.category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
                    RevenueEntry {
                        revenue: row.revenue,
                        sold_quantity: row.sold_quantity,
                    },
                )
            })
            .collect();

        let batches = self.reports.batches_for_owner(owner_id, None).await?;
        let matching: Vec<&IngredientBatch> = batches
            .iter()
            .filter(|b| {
                overlap::matches_report_window(b.period_start, b.period_end, b.created_at, from, to)
            })
            .collect();

        let ids: Vec<_> = matching.iter().filter_map(|b| b.id.clone()).collect();
        let item_costs = self.reports.batch_item_costs(ids).await?;

        // Re-key itemized costs from batch to category
        let mut cost: BTreeMap<String, f64> = BTreeMap::new();
        for row in item_costs {
            let Some(batch) = matching
                .iter()
                .find(|b| b.id.as_ref() == Some(&row.batch))
            else {
                continue;
            };
            let entry = cost.entry(batch.category.clone()).or_insert(0.0);
            *entry = to_f64(to_decimal(*entry) + to_decimal(row.cost));
        }

        Ok(reconcile::merge_category_ledgers(revenue, cost, period))
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Owner dashboard over a day-granular window
    ///
    /// Defaults: `from` → first day of the current month, `to` → today (both
    /// in the business timezone); normalized to full-day boundaries before
    /// querying.
    pub async fn dashboard(
        &self,
        owner_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Dashboard> {
        let today = time::today(self.tz);
        let from_date = from.unwrap_or_else(|| time::month_start(today));
        let to_date = to.unwrap_or(today);

        let from_ms = time::day_start_millis(from_date, self.tz);
        let to_ms = time::day_end_millis(to_date, self.tz);
        let period = ReportPeriod {
            from: Some(from_ms),
            to: Some(to_ms),
        };

        tracing::debug!(
            owner_id = %owner_id,
            from = %from_date,
            to = %to_date,
            "Computing dashboard"
        );

        // Revenue side
        let totals = self.reports.revenue_totals(owner_id, from_ms, to_ms).await?;
        let top_products = self
            .reports
            .top_products(owner_id, from_ms, to_ms, TOP_PRODUCT_LIMIT)
            .await?;
        let category_sales = self.reports.category_sales(owner_id, from_ms, to_ms).await?;

        // Cost side
        let batches = self.reports.batches_for_owner(owner_id, None).await?;
        let matching: Vec<&IngredientBatch> = batches
            .iter()
            .filter(|b| {
                overlap::matches_dashboard_window(
                    b.period_start,
                    b.period_end,
                    b.created_at,
                    Some(from_ms),
                    Some(to_ms),
                )
            })
            .collect();

        let ids: Vec<_> = matching.iter().filter_map(|b| b.id.clone()).collect();
        let ingredient_usage = self.reports.ingredient_usage(ids).await?;

        let itemized: rust_decimal::Decimal =
            ingredient_usage.iter().map(|u| to_decimal(u.cost)).sum();
        // Batches entered without itemized lines only carry total_cost
        let ingredient_cost = if itemized.is_zero() {
            let fallback: rust_decimal::Decimal =
                matching.iter().map(|b| to_decimal(b.total_cost)).sum();
            to_f64(fallback)
        } else {
            to_f64(itemized)
        };

        let revenue = to_f64(to_decimal(totals.revenue));
        let profit = to_f64(to_decimal(revenue) - to_decimal(ingredient_cost));

        Ok(Dashboard {
            period,
            revenue,
            order_count: totals.order_count,
            top_products,
            category_sales,
            ingredient_usage,
            ingredient_cost,
            profit,
        })
    }

    /// Itemized cost of the batches matching a report window
    async fn itemized_cost_in_window(
        &self,
        batches: &[IngredientBatch],
        from: Option<i64>,
        to: Option<i64>,
    ) -> AppResult<f64> {
        let ids: Vec<_> = batches
            .iter()
            .filter(|b| {
                overlap::matches_report_window(b.period_start, b.period_end, b.created_at, from, to)
            })
            .filter_map(|b| b.id.clone())
            .collect();

        let rows = self.reports.batch_item_costs(ids).await?;
        let total: rust_decimal::Decimal = rows.iter().map(|r| to_decimal(r.cost)).sum();
        Ok(to_f64(total))
    }
}
