//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`products`] - product catalog (browse + seller CRUD)
//! - [`cart`] - buyer cart
//! - [`orders`] - checkout, buy-now, status transitions
//! - [`ingredients`] - seller ingredient catalog
//! - [`batches`] - ingredient consumption batches
//! - [`reports`] - profit reports and owner dashboard

pub mod batches;
pub mod cart;
pub mod health;
pub mod ingredients;
pub mod orders;
pub mod products;
pub mod reports;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
