//! redb-based durable store
//!
//! # Tables
//!
//! One redb table per collection, key = record id, value = JSON document bytes.
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `orders` | order id | `Order` |
//! | `inventory` | menu item id | `InventoryRecord` |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: once `commit()` returns the
//! write is on disk, and a [`KvStore::batch`] is a single write transaction,
//! so an order status change and its inventory writes land together or not
//! at all.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::Value;
use thiserror::Error;

use super::{INVENTORY, KvStore, ORDER_PACKS, ORDERS, StoreError, StoreResult, WriteOp, merge_patch};

/// redb errors, folded into [`StoreError::Backend`] at the trait boundary
#[derive(Debug, Error)]
enum RedbError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RedbError> for StoreError {
    fn from(err: RedbError) -> Self {
        match err {
            RedbError::Serialization(e) => StoreError::Serialization(e),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

type RedbResult<T> = Result<T, RedbError>;

fn table_def(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

/// Durable key-value store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create the database file, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let open = || -> RedbResult<Database> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Ok(Database::create(path)?)
        };
        let store = Self { db: Arc::new(open()?) };
        store.init_tables()?;
        tracing::info!(path = %path.display(), "redb store opened");
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(RedbError::from)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Create the known collections so that reads never hit a missing table
    fn init_tables(&self) -> RedbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(table_def(ORDERS))?;
            let _ = write_txn.open_table(table_def(INVENTORY))?;
            let _ = write_txn.open_table(table_def(ORDER_PACKS))?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_sync(&self, table: &str, key: &str) -> RedbResult<Option<Value>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(table_def(table)) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match table.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn put_sync(&self, table: &str, key: &str, value: &Value) -> RedbResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut t = write_txn.open_table(table_def(table))?;
            t.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn update_sync(&self, table: &str, key: &str, patch: Value) -> RedbResult<Option<Value>> {
        let write_txn = self.db.begin_write()?;
        let merged = {
            let mut t = write_txn.open_table(table_def(table))?;
            let existing = t.get(key)?.map(|guard| guard.value().to_vec());
            match existing {
                Some(bytes) => {
                    let mut record: Value = serde_json::from_slice(&bytes)?;
                    merge_patch(&mut record, patch);
                    let bytes = serde_json::to_vec(&record)?;
                    t.insert(key, bytes.as_slice())?;
                    Some(record)
                }
                None => None,
            }
        };
        if merged.is_some() {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(merged)
    }

    fn delete_sync(&self, table: &str, key: &str) -> RedbResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut t = write_txn.open_table(table_def(table))?;
            let removed = t.remove(key)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    fn scan_sync(&self, table: &str) -> RedbResult<Vec<Value>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(table_def(table)) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }

    fn batch_sync(&self, ops: Vec<WriteOp>) -> RedbResult<()> {
        let write_txn = self.db.begin_write()?;
        for op in ops {
            match op {
                WriteOp::Put { table, key, value } => {
                    let bytes = serde_json::to_vec(&value)?;
                    let mut t = write_txn.open_table(table_def(&table))?;
                    t.insert(key.as_str(), bytes.as_slice())?;
                }
                WriteOp::Delete { table, key } => {
                    let mut t = write_txn.open_table(table_def(&table))?;
                    t.remove(key.as_str())?;
                }
            }
        }
        // Dropping an uncommitted transaction on an early `?` aborts it
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for RedbStore {
    fn name(&self) -> &'static str {
        "redb"
    }

    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.get_sync(table, key)?)
    }

    async fn put(&self, table: &str, key: &str, value: Value) -> StoreResult<()> {
        Ok(self.put_sync(table, key, &value)?)
    }

    async fn update(&self, table: &str, key: &str, patch: Value) -> StoreResult<Option<Value>> {
        Ok(self.update_sync(table, key, patch)?)
    }

    async fn delete(&self, table: &str, key: &str) -> StoreResult<bool> {
        Ok(self.delete_sync(table, key)?)
    }

    async fn scan_all(&self, table: &str) -> StoreResult<Vec<Value>> {
        Ok(self.scan_sync(table)?)
    }

    async fn batch(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        Ok(self.batch_sync(ops)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_store() -> RedbStore {
        RedbStore::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = create_test_store();
        store
            .put(ORDERS, "o1", json!({"id": "o1", "status": "pending"}))
            .await
            .unwrap();

        let value = store.get(ORDERS, "o1").await.unwrap().unwrap();
        assert_eq!(value["status"], "pending");
        assert!(store.get(ORDERS, "o2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_table_reads_empty() {
        let store = create_test_store();
        assert!(store.get("sessions", "x").await.unwrap().is_none());
        assert!(store.scan_all("sessions").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = create_test_store();
        store.put(ORDERS, "o1", json!({"id": "o1", "paid": false})).await.unwrap();

        let merged = store.update(ORDERS, "o1", json!({"paid": true})).await.unwrap();
        assert_eq!(merged, Some(json!({"id": "o1", "paid": true})));
        assert!(store.update(ORDERS, "nope", json!({"paid": true})).await.unwrap().is_none());

        assert!(store.delete(ORDERS, "o1").await.unwrap());
        assert!(!store.delete(ORDERS, "o1").await.unwrap());
        assert!(store.scan_all(ORDERS).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_commits_across_tables() {
        let store = create_test_store();
        store
            .batch(vec![
                WriteOp::put(ORDERS, "o1", &json!({"id": "o1", "status": "completed"})).unwrap(),
                WriteOp::put(INVENTORY, "chops", &json!({"id": "chops", "stock": 8})).unwrap(),
            ])
            .await
            .unwrap();

        assert_eq!(store.scan_all(ORDERS).await.unwrap().len(), 1);
        let record = store.get(INVENTORY, "chops").await.unwrap().unwrap();
        assert_eq!(record["stock"], 8);
    }

    #[tokio::test]
    async fn test_reopen_from_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database").join("store.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.put(INVENTORY, "pap", json!({"id": "pap", "stock": 3})).await.unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        let record = store.get(INVENTORY, "pap").await.unwrap().unwrap();
        assert_eq!(record["stock"], 3);
    }
}
