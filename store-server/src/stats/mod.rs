//! 经营统计
//!
//! 对全部订单的纯函数计算，调用之间不缓存。
//!
//! | 指标 | 参与统计的订单 |
//! |------|----------------|
//! | 日 / 周 / 月汇总 | `completed`，创建于窗口起点之后 |
//! | `daily_income` | `completed`，本月 |
//! | 畅销商品、分类、售出件数 | `completed`，全部时间 |
//! | `pending_orders`、`preparing_orders` | 全部订单 |
//!
//! 时间窗口按 `now` 所在时区的本地日历计算: 日从本地零点开始，周从周日
//! 开始，月从 1 号开始。累加一律饱和，不会溢出。

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use shared::models::{
    BestSeller, CategoryCount, DailyIncome, Order, OrderStatus, StatsReport, WindowTotals,
};

use crate::utils::time::{local_date_string, local_midnight, month_start, week_start};

const BEST_SELLER_LIMIT: usize = 5;

/// 单笔订单金额超出 ± 此值时先截断再累加
const MAX_ORDER_TOTAL: f64 = 1e12;

/// `now` 对应的各窗口起点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    pub day: DateTime<Utc>,
    pub week: DateTime<Utc>,
    pub month: DateTime<Utc>,
}

impl Windows {
    pub fn at(now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        Self {
            day: local_midnight(today, tz),
            week: local_midnight(week_start(today), tz),
            month: local_midnight(month_start(today), tz),
        }
    }
}

/// 单个窗口的订单数 + 营业额
#[derive(Debug, Default)]
struct Tally {
    count: usize,
    revenue: Decimal,
}

impl Tally {
    fn add(&mut self, revenue: Decimal) {
        self.count += 1;
        self.revenue = self.revenue.saturating_add(revenue);
    }

    fn totals(&self) -> WindowTotals {
        WindowTotals {
            order_count: self.count,
            total_revenue: to_money(self.revenue),
        }
    }
}

/// 记录首次出现顺序的计数器，并列时顺序稳定
#[derive(Debug, Default)]
struct OrderedCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, i64)>,
}

impl OrderedCounter {
    fn add(&mut self, key: &str, amount: i64) {
        match self.index.get(key) {
            Some(&i) => {
                let count = &mut self.entries[i].1;
                *count = count.saturating_add(amount);
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    /// 按数量降序；`sort_by` 是稳定排序，并列保持首次出现顺序
    fn ranked(mut self) -> Vec<(String, i64)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
    }
}

fn decimal(value: f64) -> Decimal {
    if value.is_finite() {
        Decimal::from_f64(value.clamp(-MAX_ORDER_TOTAL, MAX_ORDER_TOTAL)).unwrap_or_default()
    } else {
        Decimal::ZERO
    }
}

fn to_money(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or_default()
}

/// 以 `now` 为当前时间生成统计报表
pub fn compute_stats(orders: &[Order], now: DateTime<Tz>) -> StatsReport {
    let tz = now.timezone();
    let windows = Windows::at(now);

    let mut day = Tally::default();
    let mut week = Tally::default();
    let mut month = Tally::default();
    let mut daily: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut sellers = OrderedCounter::default();
    let mut categories = OrderedCounter::default();
    let mut total_items_sold = 0i64;
    let mut pending_orders = 0;
    let mut preparing_orders = 0;

    for order in orders {
        match order.status {
            OrderStatus::Pending => pending_orders += 1,
            OrderStatus::Preparing => preparing_orders += 1,
            OrderStatus::Ready => {}
            OrderStatus::Completed => {}
        }
        if !order.status.is_completed() {
            continue;
        }

        let revenue = decimal(order.total_price);
        let created = order.created_at;
        if created >= windows.day {
            day.add(revenue);
        }
        if created >= windows.week {
            week.add(revenue);
        }
        if created >= windows.month {
            month.add(revenue);
            let total = daily.entry(local_date_string(created, tz)).or_default();
            *total = total.saturating_add(revenue);
        }

        for item in &order.items {
            sellers.add(item.display_name(), item.quantity);
            total_items_sold = total_items_sold.saturating_add(item.quantity);
            if let Some(category) = item.category.as_deref().filter(|c| !c.is_empty()) {
                categories.add(category, item.quantity);
            }
        }
    }

    let (day, week, month) = (day.totals(), week.totals(), month.totals());

    StatsReport {
        day,
        week,
        month,
        total_orders_today: day.order_count,
        total_income_today: day.total_revenue,
        total_orders_week: week.order_count,
        total_income_week: week.total_revenue,
        total_orders_month: month.order_count,
        total_income_month: month.total_revenue,
        daily_income: daily
            .into_iter()
            .map(|(date, total)| DailyIncome {
                date,
                total: to_money(total),
            })
            .collect(),
        best_sellers: sellers
            .ranked()
            .into_iter()
            .take(BEST_SELLER_LIMIT)
            .map(|(name, count)| BestSeller { name, count })
            .collect(),
        orders_per_category: categories
            .ranked()
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
        total_items_sold,
        pending_orders,
        preparing_orders,
    }
}
