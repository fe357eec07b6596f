//! Report API Handlers
//!
//! Date query parameters are YYYY-MM-DD in the business timezone; the
//! window is normalized to full-day boundaries (00:00:00 – 23:59:59) here,
//! so the services and repositories only ever see Unix millis.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::Principal;
use crate::core::ServerState;
use crate::reports::reconcile::CategoryProfit;
use crate::reports::{Dashboard, ReportService};
use crate::utils::{AppError, AppResult, time};

/// Window query params shared by the report endpoints
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Category-profit query params
#[derive(Debug, Deserialize)]
pub struct CategoryProfitQuery {
    pub category: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

fn parse_window(
    from: Option<&str>,
    to: Option<&str>,
    tz: chrono_tz::Tz,
) -> AppResult<(Option<i64>, Option<i64>)> {
    let from_ms = match from {
        Some(date) => Some(time::day_start_millis(time::parse_date(date)?, tz)),
        None => None,
    };
    let to_ms = match to {
        Some(date) => Some(time::day_end_millis(time::parse_date(date)?, tz)),
        None => None,
    };
    if let (Some(from_ms), Some(to_ms)) = (from_ms, to_ms) {
        if from_ms > to_ms {
            return Err(AppError::with_message(
                shared::ErrorCode::ReportWindowInvalid,
                "'from' must not be after 'to'",
            ));
        }
    }
    Ok((from_ms, to_ms))
}

fn parse_date_opt(raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    raw.map(time::parse_date).transpose()
}

/// GET /api/reports/category-profit — profit for one exact category
pub async fn category_profit(
    State(state): State<ServerState>,
    principal: Principal,
    Query(query): Query<CategoryProfitQuery>,
) -> AppResult<Json<CategoryProfit>> {
    principal.require_seller()?;
    let (from, to) = parse_window(
        query.from.as_deref(),
        query.to.as_deref(),
        state.config.timezone,
    )?;

    let service = ReportService::new(state.get_db(), state.config.timezone);
    let report = service
        .profit_by_category(&principal.id, &query.category, from, to)
        .await?;
    Ok(Json(report))
}

/// GET /api/reports/profit-summary — per-category profit rows (union of
/// sales-side and cost-side categories)
pub async fn profit_summary(
    State(state): State<ServerState>,
    principal: Principal,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<Vec<CategoryProfit>>> {
    principal.require_seller()?;
    let (from, to) = parse_window(
        query.from.as_deref(),
        query.to.as_deref(),
        state.config.timezone,
    )?;

    let service = ReportService::new(state.get_db(), state.config.timezone);
    let report = service.profit_summary(&principal.id, from, to).await?;
    Ok(Json(report))
}

/// GET /api/reports/dashboard — revenue/cost/profit overview
///
/// Defaults to the current month when no window is supplied.
pub async fn dashboard(
    State(state): State<ServerState>,
    principal: Principal,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<Dashboard>> {
    principal.require_seller()?;
    let from = parse_date_opt(query.from.as_deref())?;
    let to = parse_date_opt(query.to.as_deref())?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::with_message(
                shared::ErrorCode::ReportWindowInvalid,
                "'from' must not be after 'to'",
            ));
        }
    }

    let service = ReportService::new(state.get_db(), state.config.timezone);
    let report = service.dashboard(&principal.id, from, to).await?;
    Ok(Json(report))
}
