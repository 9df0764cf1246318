//! 库存账本
//!
//! 每个菜单商品一条库存记录。库存变化有三种来源:
//!
//! - 订单进入 `completed` → [`InventoryLedger::plan_deduct`]
//! - 订单离开 `completed` → [`InventoryLedger::plan_restore`]
//! - 管理员手动修改 → [`InventoryLedger::set_stock`]
//!
//! 没有库存记录的商品直接跳过。`plan_*` 只计算新记录，由订单服务在持有
//! 写锁时与状态写入放在同一个 batch 中提交。

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::models::{InventoryRecord, MenuItem, OrderItem};
use shared::{AppError, AppResult};
use tokio::sync::{Mutex, OnceCell};

use crate::db::{INVENTORY, KvStore, KvStoreExt, WriteOp};

/// 库存账本 (基于键值存储)
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    store: Arc<dyn KvStore>,
    write_gate: Arc<Mutex<()>>,
    seeded: Arc<OnceCell<()>>,
}

impl InventoryLedger {
    /// `write_gate` 必须与订单服务共用
    pub fn new(store: Arc<dyn KvStore>, write_gate: Arc<Mutex<()>>) -> Self {
        Self {
            store,
            write_gate,
            seeded: Arc::new(OnceCell::new()),
        }
    }

    /// 为菜单目录中缺少记录的商品播种库存
    ///
    /// 幂等: 已有记录保持原库存。返回新建记录数。
    pub async fn initialize(&self, catalog: &[MenuItem]) -> AppResult<usize> {
        let _guard = self.write_gate.lock().await;

        let mut created = 0;
        for item in catalog {
            if self.store.get(INVENTORY, &item.id).await?.is_some() {
                continue;
            }
            let record = item.to_inventory();
            self.store.put_as(INVENTORY, &record.id, &record).await?;
            created += 1;
        }

        if created > 0 {
            tracing::info!(created, catalog = catalog.len(), "Inventory seeded from catalog");
        }
        Ok(created)
    }

    /// 每个进程只播种一次 (演示存储启动时为空)
    ///
    /// 失败时下次调用重试。
    pub async fn seed_once(&self, catalog: &[MenuItem]) -> AppResult<()> {
        self.seeded
            .get_or_try_init(|| async {
                self.initialize(catalog).await?;
                Ok::<(), AppError>(())
            })
            .await?;
        Ok(())
    }

    /// 全部记录，按商品 id 排序
    pub async fn list(&self) -> AppResult<Vec<InventoryRecord>> {
        Ok(self.store.scan_as(INVENTORY).await?)
    }

    /// 库存不高于预警阈值的记录
    pub async fn list_low_stock(&self) -> AppResult<Vec<InventoryRecord>> {
        let mut records = self.list().await?;
        records.retain(InventoryRecord::is_low_stock);
        Ok(records)
    }

    pub async fn get(&self, item_id: &str) -> AppResult<Option<InventoryRecord>> {
        Ok(self.store.get_as(INVENTORY, item_id).await?)
    }

    /// 管理员修改库存 (最小为 0)
    pub async fn set_stock(&self, item_id: &str, stock: i64) -> AppResult<InventoryRecord> {
        let _guard = self.write_gate.lock().await;

        let mut record = self
            .get(item_id)
            .await?
            .ok_or_else(|| AppError::inventory_not_found(item_id))?;
        let previous = record.stock;
        record.set_stock(stock);
        self.store.put_as(INVENTORY, &record.id, &record).await?;

        tracing::info!(item_id, previous, stock = record.stock, "Stock updated");
        Ok(record)
    }

    /// 扣减 `items` 的库存并提交 (单独使用)
    pub async fn deduct(&self, items: &[OrderItem]) -> AppResult<Vec<InventoryRecord>> {
        let _guard = self.write_gate.lock().await;
        let records = self.plan_deduct(items).await?;
        self.commit(&records).await?;
        Ok(records)
    }

    /// 回退 `items` 的库存并提交 (单独使用)
    pub async fn restore(&self, items: &[OrderItem]) -> AppResult<Vec<InventoryRecord>> {
        let _guard = self.write_gate.lock().await;
        let records = self.plan_restore(items).await?;
        self.commit(&records).await?;
        Ok(records)
    }

    /// 扣减 `items` 后的记录，尚未写入
    ///
    /// 调用方需持有写锁直到提交。
    pub async fn plan_deduct(&self, items: &[OrderItem]) -> AppResult<Vec<InventoryRecord>> {
        self.plan(items, InventoryRecord::deduct).await
    }

    /// 回退 `items` 后的记录，尚未写入
    ///
    /// 调用方需持有写锁直到提交。
    pub async fn plan_restore(&self, items: &[OrderItem]) -> AppResult<Vec<InventoryRecord>> {
        self.plan(items, InventoryRecord::restore).await
    }

    async fn plan(
        &self,
        items: &[OrderItem],
        apply: fn(&mut InventoryRecord, i64),
    ) -> AppResult<Vec<InventoryRecord>> {
        // 同一订单内重复的商品 id 累加到同一条记录
        let mut touched: BTreeMap<&str, InventoryRecord> = BTreeMap::new();
        for item in items {
            if let Some(record) = touched.get_mut(item.id.as_str()) {
                apply(record, item.quantity);
                continue;
            }
            match self.get(&item.id).await? {
                Some(mut record) => {
                    apply(&mut record, item.quantity);
                    touched.insert(item.id.as_str(), record);
                }
                None => {
                    tracing::debug!(item_id = %item.id, "No inventory record, skipping");
                }
            }
        }
        Ok(touched.into_values().collect())
    }

    /// 计划记录对应的写操作
    pub fn write_ops(records: &[InventoryRecord]) -> AppResult<Vec<WriteOp>> {
        records
            .iter()
            .map(|r| WriteOp::put(INVENTORY, r.id.clone(), r).map_err(AppError::from))
            .collect()
    }

    async fn commit(&self, records: &[InventoryRecord]) -> AppResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.store.batch(Self::write_ops(records)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FailoverStore, MemoryStore, UnconfiguredStore};

    fn menu_item(id: &str, stock: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: String::new(),
            price: 10.0,
            category: "Meat".to_string(),
            stock,
            low_stock_threshold: None,
            image_url: None,
        }
    }

    fn line(id: &str, quantity: i64) -> OrderItem {
        OrderItem {
            id: id.to_string(),
            name: id.to_string(),
            quantity,
            price: 10.0,
            category: None,
        }
    }

    fn create_test_ledger() -> InventoryLedger {
        InventoryLedger::new(Arc::new(MemoryStore::new()), Arc::new(Mutex::new(())))
    }

    async fn stock_of(ledger: &InventoryLedger, id: &str) -> (i64, i64) {
        let r = ledger.get(id).await.unwrap().unwrap();
        (r.stock, r.total_sold)
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let ledger = create_test_ledger();
        let catalog = vec![menu_item("chops", 5), menu_item("pap", 20)];

        assert_eq!(ledger.initialize(&catalog).await.unwrap(), 2);
        ledger.set_stock("chops", 1).await.unwrap();

        assert_eq!(ledger.initialize(&catalog).await.unwrap(), 0);
        assert_eq!(stock_of(&ledger, "chops").await, (1, 0));
        assert_eq!(ledger.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_deduct_floors_stock_and_accumulates_sold() {
        let ledger = create_test_ledger();
        ledger.initialize(&[menu_item("chops", 5)]).await.unwrap();

        ledger.deduct(&[line("chops", 3)]).await.unwrap();
        assert_eq!(stock_of(&ledger, "chops").await, (2, 3));

        ledger.deduct(&[line("chops", 10)]).await.unwrap();
        assert_eq!(stock_of(&ledger, "chops").await, (0, 13));
    }

    #[tokio::test]
    async fn test_unknown_items_are_skipped() {
        let ledger = create_test_ledger();
        ledger.initialize(&[menu_item("chops", 5)]).await.unwrap();

        let touched = ledger
            .deduct(&[line("ghost", 2), line("chops", 1)])
            .await
            .unwrap();
        assert_eq!(touched.len(), 1);
        assert_eq!(stock_of(&ledger, "chops").await, (4, 1));
        assert!(ledger.get("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_inverts_deduct() {
        let ledger = create_test_ledger();
        ledger
            .initialize(&[menu_item("chops", 9), menu_item("pap", 4)])
            .await
            .unwrap();
        let items = [line("chops", 2), line("pap", 3), line("chops", 1)];

        ledger.deduct(&items).await.unwrap();
        assert_eq!(stock_of(&ledger, "chops").await, (6, 3));
        assert_eq!(stock_of(&ledger, "pap").await, (1, 3));

        ledger.restore(&items).await.unwrap();
        assert_eq!(stock_of(&ledger, "chops").await, (9, 0));
        assert_eq!(stock_of(&ledger, "pap").await, (4, 0));
    }

    #[tokio::test]
    async fn test_plan_does_not_write() {
        let ledger = create_test_ledger();
        ledger.initialize(&[menu_item("chops", 5)]).await.unwrap();

        let planned = ledger.plan_deduct(&[line("chops", 2)]).await.unwrap();
        assert_eq!(planned[0].stock, 3);
        assert_eq!(stock_of(&ledger, "chops").await, (5, 0));
    }

    #[tokio::test]
    async fn test_set_stock_unknown_item() {
        let ledger = create_test_ledger();
        let err = ledger.set_stock("ghost", 3).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_low_stock() {
        let ledger = create_test_ledger();
        ledger
            .initialize(&[menu_item("chops", 5), menu_item("pap", 20), menu_item("wors", 0)])
            .await
            .unwrap();

        let low: Vec<_> = ledger
            .list_low_stock()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(low, vec!["chops", "wors"]);
    }

    #[tokio::test]
    async fn test_seed_once_in_demo_mode() {
        let store = Arc::new(FailoverStore::new(
            Arc::new(UnconfiguredStore::default()),
            Arc::new(MemoryStore::new()),
        ));
        let ledger = InventoryLedger::new(store.clone(), Arc::new(Mutex::new(())));

        ledger.seed_once(&[menu_item("chops", 5)]).await.unwrap();
        ledger.set_stock("chops", 2).await.unwrap();
        ledger.seed_once(&[menu_item("chops", 5)]).await.unwrap();

        assert_eq!(stock_of(&ledger, "chops").await, (2, 0));
        assert!(store.demo().contains(INVENTORY, "chops"));
    }
}
