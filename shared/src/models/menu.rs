//! Menu Model

use serde::{Deserialize, Serialize};

use super::inventory::{DEFAULT_LOW_STOCK_THRESHOLD, InventoryRecord};
use super::serde_helpers::{lenient_f64, lenient_i64};

/// Catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    /// Opening stock used when inventory is seeded
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock: i64,
    #[serde(alias = "lowStockThreshold", default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(alias = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MenuItem {
    /// Fresh inventory record for this item (nothing sold yet)
    pub fn to_inventory(&self) -> InventoryRecord {
        InventoryRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            stock: self.stock.max(0),
            low_stock_threshold: self
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            total_sold: 0,
        }
    }
}
