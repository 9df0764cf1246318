//! Null adapter used when no durable backend is configured

use async_trait::async_trait;
use serde_json::Value;

use super::{KvStore, StoreError, StoreResult, WriteOp};

/// Every call fails with [`StoreError::Unavailable`]
#[derive(Debug, Clone)]
pub struct UnconfiguredStore {
    reason: String,
}

impl UnconfiguredStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> StoreError {
        StoreError::Unavailable(self.reason.clone())
    }
}

impl Default for UnconfiguredStore {
    fn default() -> Self {
        Self::new("no storage backend configured")
    }
}

#[async_trait]
impl KvStore for UnconfiguredStore {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn get(&self, _table: &str, _key: &str) -> StoreResult<Option<Value>> {
        Err(self.unavailable())
    }

    async fn put(&self, _table: &str, _key: &str, _value: Value) -> StoreResult<()> {
        Err(self.unavailable())
    }

    async fn update(&self, _table: &str, _key: &str, _patch: Value) -> StoreResult<Option<Value>> {
        Err(self.unavailable())
    }

    async fn delete(&self, _table: &str, _key: &str) -> StoreResult<bool> {
        Err(self.unavailable())
    }

    async fn scan_all(&self, _table: &str) -> StoreResult<Vec<Value>> {
        Err(self.unavailable())
    }

    async fn batch(&self, _ops: Vec<WriteOp>) -> StoreResult<()> {
        Err(self.unavailable())
    }
}
