//! 持久化适配层 - 键值文档存储
//!
//! # 模块结构
//!
//! - [`KvStore`] - 存储 trait (get / put / update / delete / scan_all / batch)
//! - [`MemoryStore`] - 进程内演示存储 (demo store)
//! - [`RedbStore`] - 嵌入式持久化存储 (redb)
//! - [`UnconfiguredStore`] - 未配置后端时的空适配器
//! - [`FailoverStore`] - 主存储不可用时降级到演示存储
//!
//! 记录以 JSON 文档形式保存，按表 (collection) 分组，表内以字符串 id 为键。

mod failover;
mod memory;
mod redb_store;
mod unconfigured;

pub use failover::FailoverStore;
pub use memory::MemoryStore;
pub use redb_store::RedbStore;
pub use unconfigured::UnconfiguredStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::AppError;
use thiserror::Error;

/// Orders collection
pub const ORDERS: &str = "orders";
/// Inventory collection
pub const INVENTORY: &str = "inventory";
/// Saved order packs, keyed `{user_id}/{pack_id}`
pub const ORDER_PACKS: &str = "order_packs";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend absent or not reachable; callers may degrade to the demo store
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AppError::backend_unavailable(msg),
            other => AppError::database(other.to_string()),
        }
    }
}

/// One write inside an atomic [`KvStore::batch`]
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Put {
        table: String,
        key: String,
        value: Value,
    },
    Delete {
        table: String,
        key: String,
    },
}

impl WriteOp {
    /// Serialize `value` into a put operation
    pub fn put<T: Serialize>(table: &str, key: impl Into<String>, value: &T) -> StoreResult<Self> {
        Ok(WriteOp::Put {
            table: table.to_string(),
            key: key.into(),
            value: serde_json::to_value(value)?,
        })
    }

    pub fn delete(table: &str, key: impl Into<String>) -> Self {
        WriteOp::Delete {
            table: table.to_string(),
            key: key.into(),
        }
    }

    pub fn table(&self) -> &str {
        match self {
            WriteOp::Put { table, .. } | WriteOp::Delete { table, .. } => table,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            WriteOp::Put { key, .. } | WriteOp::Delete { key, .. } => key,
        }
    }
}

/// Key-value document store
///
/// Every business operation goes through this trait, so the durable backend
/// and the demo store share one implementation of the order and inventory
/// rules.
#[async_trait]
pub trait KvStore: Send + Sync + std::fmt::Debug {
    /// Backend name for health output and logs
    fn name(&self) -> &'static str;

    /// Whether a real backend sits behind this store
    fn is_configured(&self) -> bool {
        true
    }

    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<Value>>;

    /// Insert or replace a whole record
    async fn put(&self, table: &str, key: &str, value: Value) -> StoreResult<()>;

    /// Shallow-merge `patch` into an existing record
    ///
    /// Returns the merged record, or `None` if the key does not exist.
    async fn update(&self, table: &str, key: &str, patch: Value) -> StoreResult<Option<Value>>;

    /// Returns whether a record was removed
    async fn delete(&self, table: &str, key: &str) -> StoreResult<bool>;

    /// Every record of a table, in key order
    async fn scan_all(&self, table: &str) -> StoreResult<Vec<Value>>;

    /// Apply all writes or none of them
    async fn batch(&self, ops: Vec<WriteOp>) -> StoreResult<()>;
}

/// Typed helpers over [`KvStore`]
#[async_trait]
pub trait KvStoreExt: KvStore {
    async fn get_as<T: DeserializeOwned + Send>(&self, table: &str, key: &str) -> StoreResult<Option<T>> {
        match self.get(table, key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn put_as<T: Serialize + Sync>(&self, table: &str, key: &str, value: &T) -> StoreResult<()> {
        let value = serde_json::to_value(value)?;
        self.put(table, key, value).await
    }

    /// Decode every record, skipping (and logging) documents that do not parse
    async fn scan_as<T: DeserializeOwned + Send>(&self, table: &str) -> StoreResult<Vec<T>> {
        let values = self.scan_all(table).await?;
        let mut records = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value(value) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(table, error = %e, "Skipping undecodable record"),
            }
        }
        Ok(records)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

/// Shallow merge: top-level keys of `patch` replace those of `target`
///
/// A non-object patch replaces the record entirely.
pub(crate) fn merge_patch(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (k, v) in patch {
                target.insert(k, v);
            }
        }
        (target, patch) => *target = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_patch_is_shallow() {
        let mut doc = json!({"id": "a", "status": "pending", "meta": {"x": 1, "y": 2}});
        merge_patch(&mut doc, json!({"status": "ready", "meta": {"x": 5}}));
        assert_eq!(doc, json!({"id": "a", "status": "ready", "meta": {"x": 5}}));
    }

    #[test]
    fn test_store_error_maps_to_app_error() {
        let err: AppError = StoreError::Unavailable("no backend".into()).into();
        assert_eq!(err.code, shared::ErrorCode::BackendUnavailable);

        let err: AppError = StoreError::Backend("disk full".into()).into();
        assert_eq!(err.code, shared::ErrorCode::DatabaseError);
        assert_eq!(err.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_write_op_accessors() {
        let op = WriteOp::put(ORDERS, "o1", &json!({"id": "o1"})).unwrap();
        assert_eq!(op.table(), ORDERS);
        assert_eq!(op.key(), "o1");
        let op = WriteOp::delete(INVENTORY, "chops");
        assert_eq!(op.table(), INVENTORY);
        assert_eq!(op.key(), "chops");
    }
}
