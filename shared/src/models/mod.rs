//! Data models
//!
//! Shared between the store server and its clients (via API). Records are
//! persisted as JSON documents, so every model here is also the storage shape.

pub mod inventory;
pub mod menu;
pub mod notification;
pub mod order;
pub mod pack;
pub mod serde_helpers;
pub mod stats;

// Re-exports
pub use inventory::*;
pub use menu::*;
pub use notification::*;
pub use order::*;
pub use pack::*;
pub use stats::*;
