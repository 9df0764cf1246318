//! 降级存储 - 主存储不可用时回退到演示存储
//!
//! # 路由规则
//!
//! | 操作 | 主存储返回 `Unavailable` 时 |
//! |------|------------------------------|
//! | get / scan_all | 读演示存储 |
//! | put | 写演示存储 (下单永远可用) |
//! | update / delete | 记录存在于演示存储时操作演示存储，否则返回错误 |
//! | batch | 首个写入的记录存在于演示存储时整体写演示存储，否则返回错误 |
//!
//! 其他错误 (IO、序列化) 原样返回，不做降级。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::{KvStore, MemoryStore, StoreError, StoreResult, WriteOp};

/// Primary store with an in-memory demo fallback
#[derive(Debug)]
pub struct FailoverStore {
    primary: Arc<dyn KvStore>,
    demo: Arc<MemoryStore>,
    degraded: AtomicBool,
}

impl FailoverStore {
    pub fn new(primary: Arc<dyn KvStore>, demo: Arc<MemoryStore>) -> Self {
        Self {
            primary,
            demo,
            degraded: AtomicBool::new(false),
        }
    }

    /// No durable backend: everything lives in the demo store
    pub fn is_demo_mode(&self) -> bool {
        !self.primary.is_configured()
    }

    /// Whether any call has fallen back to the demo store so far
    pub fn has_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    pub fn primary_name(&self) -> &'static str {
        self.primary.name()
    }

    pub fn demo(&self) -> &Arc<MemoryStore> {
        &self.demo
    }

    fn fall_back(&self, op: &str, err: &StoreError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                backend = self.primary.name(),
                op,
                error = %err,
                "Primary store unavailable, serving from demo store"
            );
        } else {
            tracing::debug!(op, "Demo store fallback");
        }
    }
}

#[async_trait]
impl KvStore for FailoverStore {
    fn name(&self) -> &'static str {
        "failover"
    }

    fn is_configured(&self) -> bool {
        self.primary.is_configured()
    }

    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<Value>> {
        match self.primary.get(table, key).await {
            Err(e) if e.is_unavailable() => {
                self.fall_back("get", &e);
                self.demo.get(table, key).await
            }
            other => other,
        }
    }

    async fn put(&self, table: &str, key: &str, value: Value) -> StoreResult<()> {
        match self.primary.put(table, key, value.clone()).await {
            Err(e) if e.is_unavailable() => {
                self.fall_back("put", &e);
                self.demo.put(table, key, value).await
            }
            other => other,
        }
    }

    async fn update(&self, table: &str, key: &str, patch: Value) -> StoreResult<Option<Value>> {
        match self.primary.update(table, key, patch.clone()).await {
            Err(e) if e.is_unavailable() && self.demo.contains(table, key) => {
                self.fall_back("update", &e);
                self.demo.update(table, key, patch).await
            }
            other => other,
        }
    }

    async fn delete(&self, table: &str, key: &str) -> StoreResult<bool> {
        match self.primary.delete(table, key).await {
            Err(e) if e.is_unavailable() && self.demo.contains(table, key) => {
                self.fall_back("delete", &e);
                self.demo.delete(table, key).await
            }
            other => other,
        }
    }

    async fn scan_all(&self, table: &str) -> StoreResult<Vec<Value>> {
        match self.primary.scan_all(table).await {
            Err(e) if e.is_unavailable() => {
                self.fall_back("scan_all", &e);
                self.demo.scan_all(table).await
            }
            other => other,
        }
    }

    async fn batch(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        let anchored_in_demo = ops
            .first()
            .is_some_and(|op| self.demo.contains(op.table(), op.key()));

        match self.primary.batch(ops.clone()).await {
            Err(e) if e.is_unavailable() && anchored_in_demo => {
                self.fall_back("batch", &e);
                self.demo.batch(ops).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{INVENTORY, ORDERS, RedbStore, UnconfiguredStore};
    use serde_json::json;

    fn demo_store() -> FailoverStore {
        FailoverStore::new(
            Arc::new(UnconfiguredStore::default()),
            Arc::new(MemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn test_unconfigured_put_lands_in_demo() {
        let store = demo_store();
        assert!(store.is_demo_mode());
        assert!(!store.has_degraded());

        store.put(ORDERS, "o1", json!({"id": "o1"})).await.unwrap();
        assert!(store.has_degraded());
        assert!(store.demo().contains(ORDERS, "o1"));
        assert_eq!(store.get(ORDERS, "o1").await.unwrap(), Some(json!({"id": "o1"})));
        assert_eq!(store.scan_all(ORDERS).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_record_surfaces_unavailable() {
        let store = demo_store();
        let err = store
            .update(ORDERS, "ghost", json!({"paid": true}))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());

        let err = store.delete(ORDERS, "ghost").await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_update_and_delete_demo_record() {
        let store = demo_store();
        store.put(ORDERS, "o1", json!({"id": "o1", "paid": false})).await.unwrap();

        let merged = store.update(ORDERS, "o1", json!({"paid": true})).await.unwrap();
        assert_eq!(merged, Some(json!({"id": "o1", "paid": true})));
        assert!(store.delete(ORDERS, "o1").await.unwrap());
    }

    #[tokio::test]
    async fn test_batch_anchored_on_demo_record() {
        let store = demo_store();
        store.put(ORDERS, "o1", json!({"id": "o1"})).await.unwrap();

        store
            .batch(vec![
                WriteOp::put(ORDERS, "o1", &json!({"id": "o1", "status": "completed"})).unwrap(),
                WriteOp::put(INVENTORY, "chops", &json!({"id": "chops", "stock": 1})).unwrap(),
            ])
            .await
            .unwrap();
        assert!(store.demo().contains(INVENTORY, "chops"));

        let err = store
            .batch(vec![WriteOp::put(ORDERS, "ghost", &json!({})).unwrap()])
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_configured_primary_is_used() {
        let store = FailoverStore::new(
            Arc::new(RedbStore::open_in_memory().unwrap()),
            Arc::new(MemoryStore::new()),
        );
        assert!(!store.is_demo_mode());
        store.put(ORDERS, "o1", json!({"id": "o1"})).await.unwrap();
        assert!(store.demo().is_empty(ORDERS));
        assert!(!store.has_degraded());
        assert_eq!(store.primary_name(), "redb");
    }
}
