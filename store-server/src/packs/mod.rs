//! 常用订单包 (Order Packs)
//!
//! 登录用户可以把购物车保存为命名的订单包，之后一键再次下单。
//!
//! | 操作 | 说明 |
//! |------|------|
//! | [`PackService::save_pack`] | 保存购物车为订单包 |
//! | [`PackService::list_packs`] | 某个账户的全部订单包 (新→旧) |
//! | [`PackService::delete_pack`] | 删除订单包 |
//! | [`PackService::order_from_pack`] | 用订单包下一个新订单 |
//!
//! 存储键为 `{user_id}/{pack_id}`，账户之间互不可见。

use std::sync::Arc;

use chrono::Utc;
use shared::models::{
    CreateOrderRequest, Order, OrderPack, PackOrderRequest, SavePackRequest,
};
use shared::{AppError, AppResult};

use crate::db::{KvStore, KvStoreExt, ORDER_PACKS};
use crate::orders::{OrderService, calculate_total, validate_items};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};

/// 订单包服务
#[derive(Debug, Clone)]
pub struct PackService {
    store: Arc<dyn KvStore>,
    orders: OrderService,
}

fn pack_key(user_id: &str, pack_id: &str) -> String {
    format!("{}/{}", user_id, pack_id)
}

fn require_user(user_id: Option<String>) -> AppResult<String> {
    let user_id = user_id.unwrap_or_default().trim().to_string();
    if user_id.is_empty() {
        return Err(AppError::required(
            "user_id",
            "Sign in to use saved order packs",
        ));
    }
    validate_required_text(&user_id, "user_id", MAX_SHORT_TEXT_LEN)?;
    Ok(user_id)
}

impl PackService {
    pub fn new(store: Arc<dyn KvStore>, orders: OrderService) -> Self {
        Self { store, orders }
    }

    /// 保存订单包；商品行按下单规则校验
    pub async fn save_pack(&self, req: SavePackRequest) -> AppResult<OrderPack> {
        let user_id = require_user(req.user_id)?;
        let name = req.name.unwrap_or_default().trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        validate_items(&req.items)?;

        let pack = OrderPack {
            id: shared::util::order_id(),
            user_id,
            name,
            items: req.items,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.store
            .put_as(ORDER_PACKS, &pack_key(&pack.user_id, &pack.id), &pack)
            .await?;

        tracing::info!(
            pack_id = %pack.id,
            user_id = %pack.user_id,
            items = pack.items.len(),
            "Order pack saved"
        );
        Ok(pack)
    }

    /// 新→旧
    pub async fn list_packs(&self, user_id: Option<String>) -> AppResult<Vec<OrderPack>> {
        let user_id = require_user(user_id)?;
        let mut packs: Vec<OrderPack> = self.store.scan_as(ORDER_PACKS).await?;
        packs.retain(|p| p.user_id == user_id);
        packs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(packs)
    }

    pub async fn get_pack(&self, user_id: &str, pack_id: &str) -> AppResult<OrderPack> {
        self.store
            .get_as::<OrderPack>(ORDER_PACKS, &pack_key(user_id, pack_id))
            .await?
            .ok_or_else(|| AppError::order_pack_not_found(pack_id))
    }

    pub async fn delete_pack(&self, user_id: Option<String>, pack_id: &str) -> AppResult<()> {
        let user_id = require_user(user_id)?;
        self.get_pack(&user_id, pack_id).await?;

        if !self.store.delete(ORDER_PACKS, &pack_key(&user_id, pack_id)).await? {
            return Err(AppError::order_pack_not_found(pack_id));
        }
        tracing::info!(pack_id, user_id = %user_id, "Order pack deleted");
        Ok(())
    }

    /// 用订单包下单：总价按包内商品重新计算，订单关联到该账户
    pub async fn order_from_pack(&self, req: PackOrderRequest) -> AppResult<Order> {
        let user_id = require_user(req.user_id)?;
        let pack_id = req.id.unwrap_or_default();
        let pack = self.get_pack(&user_id, &pack_id).await?;

        let create = CreateOrderRequest {
            total_price: calculate_total(&pack.items),
            items: pack.items,
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            customer_email: req.customer_email,
            notes: req.notes,
            user_id: Some(user_id),
        };
        let order = self.orders.create_order(create).await?;
        tracing::info!(order_id = %order.id, pack_id = %pack.id, "Order placed from pack");
        Ok(order)
    }
}
