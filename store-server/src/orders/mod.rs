//! 订单服务
//!
//! 基于键值存储的订单生命周期:
//!
//! ```text
//! create ──▶ pending ⇄ preparing ⇄ ready ⇄ completed
//!                                          │
//!                        进入: 扣减库存 ◀┤
//!                        离开: 回退库存 ◀┘
//! ```
//!
//! 所有读-改-写都在与 [`InventoryLedger`] 共享的写锁内完成；状态变更与
//! 受影响的库存记录在同一个 [`KvStore::batch`] 中提交。

mod validation;

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde_json::json;
use shared::models::{CreateOrderRequest, Order, OrderItem, OrderStatus};
use shared::{AppError, AppResult, ErrorCode};
use tokio::sync::Mutex;

use crate::db::{KvStore, KvStoreExt, ORDERS, WriteOp};
use crate::inventory::InventoryLedger;
use crate::notify::{self, Notifier};

pub use validation::{validate_create, validate_items};

/// 订单服务
#[derive(Debug, Clone)]
pub struct OrderService {
    store: Arc<dyn KvStore>,
    inventory: InventoryLedger,
    notifier: Arc<dyn Notifier>,
    write_gate: Arc<Mutex<()>>,
}

impl OrderService {
    /// `write_gate` 必须与 `inventory` 使用同一个写锁
    pub fn new(
        store: Arc<dyn KvStore>,
        inventory: InventoryLedger,
        notifier: Arc<dyn Notifier>,
        write_gate: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            store,
            inventory,
            notifier,
            write_gate,
        }
    }

    /// 校验并保存新订单 (pending、未支付)
    pub async fn create_order(&self, req: CreateOrderRequest) -> AppResult<Order> {
        validate_create(&req)?;

        let order = Order {
            id: shared::util::order_id(),
            items: req.items,
            status: OrderStatus::Pending,
            paid: false,
            total_price: req.total_price,
            customer_name: req.customer_name.unwrap_or_default().trim().to_string(),
            customer_phone: req.customer_phone.unwrap_or_default().trim().to_string(),
            customer_email: req.customer_email.unwrap_or_default().trim().to_string(),
            notes: req.notes.unwrap_or_default(),
            user_id: req.user_id.filter(|u| !u.trim().is_empty()),
            created_at: Utc::now(),
            updated_at: None,
        };

        self.store.put_as(ORDERS, &order.id, &order).await?;
        tracing::info!(
            order_id = %order.id,
            items = order.items.len(),
            total = order.total_price,
            backend = self.store.name(),
            "Order created"
        );

        if let Some(notification) = notify::order_placed(&order) {
            notify::dispatch_in_background(self.notifier.clone(), notification);
        }
        Ok(order)
    }

    pub async fn get_order(&self, id: &str) -> AppResult<Order> {
        self.store
            .get_as::<Order>(ORDERS, id)
            .await?
            .ok_or_else(|| AppError::order_not_found(id))
    }

    /// 新→旧；传入 `user_id` 时只返回该账户的订单
    pub async fn list_orders(&self, user_id: Option<&str>) -> AppResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.store.scan_as(ORDERS).await?;
        if let Some(user_id) = user_id {
            orders.retain(|o| o.user_id.as_deref() == Some(user_id));
        }
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// 订单状态前进或回退一步
    ///
    /// 目标状态与当前相同时直接返回，无副作用。进入 `completed` 扣减库存，
    /// 离开 `completed` 回退库存。
    pub async fn update_status(&self, id: &str, status: &str) -> AppResult<Order> {
        let target: OrderStatus = status.parse().map_err(|_| {
            AppError::with_message(
                ErrorCode::OrderInvalidStatus,
                format!("Invalid status: {:?}", status),
            )
            .with_detail("status", status)
        })?;

        let guard = self.write_gate.lock().await;
        let mut order = self.get_order(id).await?;
        let from = order.status;

        if from == target {
            return Ok(order);
        }
        if !from.is_adjacent(target) {
            return Err(AppError::with_message(
                ErrorCode::OrderInvalidTransition,
                format!("Cannot move order from {} to {}", from, target),
            )
            .with_detail("from", from.as_str())
            .with_detail("to", target.as_str()));
        }

        let stock_changes = if target.is_completed() {
            self.inventory.plan_deduct(&order.items).await?
        } else if from.is_completed() {
            self.inventory.plan_restore(&order.items).await?
        } else {
            Vec::new()
        };

        order.status = target;
        order.updated_at = Some(Utc::now());

        let mut ops = vec![WriteOp::put(ORDERS, order.id.clone(), &order)?];
        ops.extend(InventoryLedger::write_ops(&stock_changes)?);
        self.store.batch(ops).await?;
        drop(guard);

        tracing::info!(
            order_id = %order.id,
            from = %from,
            to = %target,
            stock_records = stock_changes.len(),
            "Order status updated"
        );

        if let Some(notification) = notify::status_changed(&order) {
            notify::dispatch_in_background(self.notifier.clone(), notification);
        }
        Ok(order)
    }

    /// 设置支付标记，不影响库存
    pub async fn set_paid(&self, id: &str, paid: bool) -> AppResult<Order> {
        let _guard = self.write_gate.lock().await;
        self.get_order(id).await?;

        let patch = json!({ "paid": paid, "updated_at": Utc::now() });
        let merged = self
            .store
            .update(ORDERS, id, patch)
            .await?
            .ok_or_else(|| AppError::order_not_found(id))?;
        let order: Order = serde_json::from_value(merged)
            .map_err(|e| AppError::database(format!("Corrupt order {}: {}", id, e)))?;

        tracing::info!(order_id = %id, paid, "Order payment flag set");
        Ok(order)
    }

    /// 物理删除；已完成订单扣减的库存不回退
    pub async fn delete_order(&self, id: &str) -> AppResult<()> {
        let _guard = self.write_gate.lock().await;
        self.get_order(id).await?;

        if !self.store.delete(ORDERS, id).await? {
            return Err(AppError::order_not_found(id));
        }
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// 再来一单: 复制 `id` 的商品和顾客信息下一个新订单
    ///
    /// 总价按复制的商品重新计算。
    pub async fn reorder(&self, id: &str) -> AppResult<Order> {
        let source = self.get_order(id).await?;
        let total_price = calculate_total(&source.items);

        let req = CreateOrderRequest {
            items: source.items,
            customer_name: Some(source.customer_name),
            customer_phone: Some(source.customer_phone),
            customer_email: Some(source.customer_email),
            notes: Some(source.notes),
            total_price,
            user_id: source.user_id,
        };
        let order = self.create_order(req).await?;
        tracing::info!(order_id = %order.id, source_id = %id, "Order placed again");
        Ok(order)
    }
}

/// Σ 单价 × 数量，保留两位小数 (超出 `Decimal` 范围时饱和)
pub fn calculate_total(items: &[OrderItem]) -> f64 {
    let total = items.iter().fold(Decimal::ZERO, |total, item| {
        let price = Decimal::from_f64(item.price).unwrap_or_default();
        total.saturating_add(price.saturating_mul(Decimal::from(item.quantity)))
    });
    total.round_dp(2).to_f64().unwrap_or_default()
}
