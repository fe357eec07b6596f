//! Report API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/category-profit", get(handler::category_profit))
        .route("/profit-summary", get(handler::profit_summary))
        .route("/dashboard", get(handler::dashboard))
}
