//! Shared types for the storefront
//!
//! Wire models (orders, inventory, menu, stats, notifications) and the unified
//! error system used by the server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
