//! Inventory Model

use serde::{Deserialize, Serialize};

use super::serde_helpers::lenient_i64;

/// Default low-stock alert level when the catalog does not set one
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

fn default_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

/// Stock level for one menu item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryRecord {
    /// Menu item id
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock: i64,
    #[serde(alias = "lowStockThreshold", default = "default_threshold")]
    pub low_stock_threshold: i64,
    #[serde(alias = "totalSold", default, deserialize_with = "lenient_i64")]
    pub total_sold: i64,
}

impl InventoryRecord {
    /// Take `quantity` out of stock; stock floors at 0, sales always grow
    pub fn deduct(&mut self, quantity: i64) {
        self.stock = self.stock.saturating_sub(quantity).max(0);
        self.total_sold = self.total_sold.saturating_add(quantity);
    }

    /// Put `quantity` back; sales floor at 0
    pub fn restore(&mut self, quantity: i64) {
        self.stock = self.stock.saturating_add(quantity);
        self.total_sold = self.total_sold.saturating_sub(quantity).max(0);
    }

    /// Admin override, clamped to 0
    pub fn set_stock(&mut self, stock: i64) {
        self.stock = stock.max(0);
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

/// Stock update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStockRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

/// `{inventory}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEnvelope {
    pub inventory: InventoryRecord,
}

/// `{created}` response of catalog seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySeeded {
    pub created: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stock: i64) -> InventoryRecord {
        InventoryRecord {
            id: "chops".to_string(),
            name: "Lamb Chops".to_string(),
            stock,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            total_sold: 0,
        }
    }

    #[test]
    fn test_deduct_clamps_stock() {
        let mut r = record(5);
        r.deduct(3);
        assert_eq!((r.stock, r.total_sold), (2, 3));
        r.deduct(10);
        assert_eq!((r.stock, r.total_sold), (0, 13));
    }

    #[test]
    fn test_restore_clamps_total_sold() {
        let mut r = record(0);
        r.total_sold = 2;
        r.restore(5);
        assert_eq!((r.stock, r.total_sold), (5, 0));
    }

    #[test]
    fn test_deduct_then_restore_is_identity_without_clamping() {
        let mut r = record(10);
        r.total_sold = 4;
        let before = r.clone();
        r.deduct(6);
        r.restore(6);
        assert_eq!(r, before);
    }

    #[test]
    fn test_extreme_quantities_saturate() {
        let mut r = record(3);
        r.total_sold = i64::MAX - 1;
        r.deduct(i64::MAX);
        assert_eq!((r.stock, r.total_sold), (0, i64::MAX));

        let mut r = record(i64::MAX - 1);
        r.total_sold = 1;
        r.restore(i64::MAX);
        assert_eq!((r.stock, r.total_sold), (i64::MAX, 0));
    }

    #[test]
    fn test_set_stock_and_low_stock() {
        let mut r = record(20);
        assert!(!r.is_low_stock());
        r.set_stock(-4);
        assert_eq!(r.stock, 0);
        assert!(r.is_low_stock());
        r.set_stock(5);
        assert!(r.is_low_stock());
    }

    #[test]
    fn test_missing_threshold_uses_default() {
        let r: InventoryRecord =
            serde_json::from_str(r#"{"id":"pap","stock":3}"#).unwrap();
        assert_eq!(r.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(r.total_sold, 0);
    }
}
