//! Revenue/cost reconciliation
//!
//! Merges the two differently-grained ledgers into per-category profit rows:
//! revenue is exact (per order line), cost is an estimate (per
//! category-period batch). Categories present on either side appear in the
//! result — a category with batches but no sales still shows up with zero
//! revenue, and vice versa.

use crate::orders::money::{to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reporting window echoed back in responses (Unix millis, inclusive)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportPeriod {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// Per-category profit row
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProfit {
    pub category: String,
    pub period: ReportPeriod,
    pub sold_quantity: i64,
    pub revenue: f64,
    pub ingredient_cost: f64,
    pub profit: f64,
    pub margin_pct: f64,
}

/// Revenue side of one category (already aggregated)
#[derive(Debug, Clone, Default)]
pub struct RevenueEntry {
    pub revenue: f64,
    pub sold_quantity: i64,
}

/// profit = revenue − cost; margin_pct = profit / revenue × 100
///
/// Both rounded to 2 decimals. Zero revenue yields a 0 margin rather than a
/// division error, so pure-cost categories report cleanly.
pub fn profit_and_margin(revenue: f64, cost: f64) -> (f64, f64) {
    let revenue_dec = to_decimal(revenue);
    let profit = revenue_dec - to_decimal(cost);
    let margin = if revenue_dec.is_zero() {
        Decimal::ZERO
    } else {
        profit / revenue_dec * Decimal::ONE_HUNDRED
    };
    (to_f64(profit), to_f64(margin))
}

/// Merge revenue and cost aggregates into profit rows, one per category
///
/// The key set is the union of both maps, ordered by category name. Missing
/// sides default to zero.
pub fn merge_category_ledgers(
    revenue: BTreeMap<String, RevenueEntry>,
    cost: BTreeMap<String, f64>,
    period: ReportPeriod,
) -> Vec<CategoryProfit> {
    let mut categories: Vec<String> = revenue.keys().chain(cost.keys()).cloned().collect();
    categories.sort();
    categories.dedup();

    categories
        .into_iter()
        .map(|category| {
            let rev = revenue.get(&category).cloned().unwrap_or_default();
            let cost = cost.get(&category).copied().unwrap_or(0.0);
            let (profit, margin_pct) = profit_and_margin(rev.revenue, cost);
            CategoryProfit {
                category,
                period,
                sold_quantity: rev.sold_quantity,
                revenue: to_f64(to_decimal(rev.revenue)),
                ingredient_cost: to_f64(to_decimal(cost)),
                profit,
                margin_pct,
            }
        })
        .collect()
}
