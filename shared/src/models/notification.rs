//! Outbound customer notification

use serde::{Deserialize, Serialize};

/// Message handed to the notification service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Correlation id (the order id)
    #[serde(rename = "orderId", alias = "order_id")]
    pub order_id: String,
}

/// Outcome reported by the notification service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    /// Delivered through a real provider
    Sent,
    /// Logged only, no provider configured
    Simulated,
}

/// Receipt returned by the notification service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchReceipt {
    pub status: DispatchStatus,
    pub id: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub timestamp: String,
}
