//! 演示存储 - 进程内 HashMap，进程退出即丢失

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::{KvStore, StoreResult, WriteOp, merge_patch};

type Table = BTreeMap<String, Value>;

/// In-memory demo store
///
/// Used directly in tests and as the fallback of [`super::FailoverStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record exists (sync, used by the failover routing)
    pub fn contains(&self, table: &str, key: &str) -> bool {
        self.tables
            .read()
            .get(table)
            .is_some_and(|t| t.contains_key(key))
    }

    /// Number of records in a table
    pub fn len(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, |t| t.len())
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .tables
            .read()
            .get(table)
            .and_then(|t| t.get(key))
            .cloned())
    }

    async fn put(&self, table: &str, key: &str, value: Value) -> StoreResult<()> {
        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn update(&self, table: &str, key: &str, patch: Value) -> StoreResult<Option<Value>> {
        let mut tables = self.tables.write();
        let Some(record) = tables.get_mut(table).and_then(|t| t.get_mut(key)) else {
            return Ok(None);
        };
        merge_patch(record, patch);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, table: &str, key: &str) -> StoreResult<bool> {
        Ok(self
            .tables
            .write()
            .get_mut(table)
            .is_some_and(|t| t.remove(key).is_some()))
    }

    async fn scan_all(&self, table: &str) -> StoreResult<Vec<Value>> {
        Ok(self
            .tables
            .read()
            .get(table)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn batch(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        // Single write lock: readers never observe a partial batch
        let mut tables = self.tables.write();
        for op in ops {
            match op {
                WriteOp::Put { table, key, value } => {
                    tables.entry(table).or_default().insert(key, value);
                }
                WriteOp::Delete { table, key } => {
                    if let Some(t) = tables.get_mut(&table) {
                        t.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{INVENTORY, ORDERS};
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();
        store.put(ORDERS, "o1", json!({"id": "o1"})).await.unwrap();

        assert_eq!(store.get(ORDERS, "o1").await.unwrap(), Some(json!({"id": "o1"})));
        assert_eq!(store.get(ORDERS, "missing").await.unwrap(), None);
        assert_eq!(store.get(INVENTORY, "o1").await.unwrap(), None);

        assert!(store.delete(ORDERS, "o1").await.unwrap());
        assert!(!store.delete(ORDERS, "o1").await.unwrap());
        assert!(store.is_empty(ORDERS));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryStore::new();
        let merged = store.update(ORDERS, "nope", json!({"paid": true})).await.unwrap();
        assert!(merged.is_none());
        assert!(!store.contains(ORDERS, "nope"));
    }

    #[tokio::test]
    async fn test_update_merges() {
        let store = MemoryStore::new();
        store
            .put(ORDERS, "o1", json!({"id": "o1", "paid": false, "status": "pending"}))
            .await
            .unwrap();
        let merged = store.update(ORDERS, "o1", json!({"paid": true})).await.unwrap();
        assert_eq!(merged, Some(json!({"id": "o1", "paid": true, "status": "pending"})));
    }

    #[tokio::test]
    async fn test_batch_applies_all() {
        let store = MemoryStore::new();
        store.put(INVENTORY, "old", json!({"id": "old"})).await.unwrap();
        store
            .batch(vec![
                WriteOp::put(ORDERS, "o1", &json!({"id": "o1"})).unwrap(),
                WriteOp::put(INVENTORY, "chops", &json!({"id": "chops"})).unwrap(),
                WriteOp::delete(INVENTORY, "old"),
            ])
            .await
            .unwrap();
        assert_eq!(store.len(ORDERS), 1);
        assert!(store.contains(INVENTORY, "chops"));
        assert!(!store.contains(INVENTORY, "old"));
    }

    #[tokio::test]
    async fn test_scan_all_in_key_order() {
        let store = MemoryStore::new();
        for key in ["b", "c", "a"] {
            store.put(ORDERS, key, json!({"id": key})).await.unwrap();
        }
        let ids: Vec<_> = store
            .scan_all(ORDERS)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
