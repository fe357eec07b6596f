//! Market Server - multi-tenant bakery marketplace backend
//!
//! # Architecture
//!
//! Sellers manage shops, products, ingredients, and ingredient-cost batches;
//! buyers browse, cart, and check out. The interesting core is the order
//! lifecycle (atomic checkout with price snapshots, dual-vocabulary status
//! transitions, partial rejection) and the cost reconciliation reports that
//! match coarse per-category ingredient batches against exact per-sale
//! revenue.
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # configuration, state, server bootstrap
//! ├── auth/          # forwarded-identity principal extraction
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # embedded SurrealDB: models + repositories
//! ├── orders/        # order lifecycle (checkout, status machine, money)
//! ├── reports/       # cost reconciliation (overlap rules, profit, dashboard)
//! ├── catalog/       # keyword category matching for browsing
//! ├── notify/        # fire-and-forget notifications
//! └── utils/         # time helpers, logging, shared error types
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod reports;
pub mod utils;

// Re-export public types
pub use auth::{Principal, Role};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use orders::{OrderError, OrderService};
pub use reports::ReportService;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
