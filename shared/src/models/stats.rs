//! Stats report returned by the admin dashboard endpoint

use serde::{Deserialize, Serialize};

/// Completed-order totals for one time window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct WindowTotals {
    pub order_count: usize,
    pub total_revenue: f64,
}

/// Revenue for one local calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyIncome {
    /// `YYYY-MM-DD` in the business timezone
    pub date: String,
    pub total: f64,
}

/// Quantity sold for one item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BestSeller {
    pub name: String,
    pub count: i64,
}

/// Quantity sold for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Dashboard statistics, recomputed from the full order set on each call
///
/// Revenue figures only count `completed` orders; `pending_orders` and
/// `preparing_orders` count every order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatsReport {
    pub day: WindowTotals,
    pub week: WindowTotals,
    pub month: WindowTotals,

    pub total_orders_today: usize,
    pub total_income_today: f64,
    pub total_orders_week: usize,
    pub total_income_week: f64,
    pub total_orders_month: usize,
    pub total_income_month: f64,

    pub daily_income: Vec<DailyIncome>,
    pub best_sellers: Vec<BestSeller>,
    pub orders_per_category: Vec<CategoryCount>,
    pub total_items_sold: i64,
    pub pending_orders: usize,
    pub preparing_orders: usize,
}
