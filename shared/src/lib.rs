//! Shared types for the marketplace backend
//!
//! Cross-cutting types used by the server crate: the unified error
//! system and small time utilities.

pub mod error;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
