//! Mock storage implementation for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Result, StorageError, TransactionRecord, TransactionRepository};

type RecordKey = (String, String);

/// In-memory repository that counts writes.
pub struct MockTransactionRepository<T> {
    records: RwLock<HashMap<RecordKey, T>>,
    create_calls: RwLock<usize>,
    update_calls: RwLock<usize>,
    delete_calls: RwLock<usize>,
    fail_on_get: RwLock<bool>,
    fail_on_create: RwLock<bool>,
    fail_on_update: RwLock<bool>,
    fail_on_delete: RwLock<bool>,
}

impl<T> Default for MockTransactionRepository<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            create_calls: RwLock::new(0),
            update_calls: RwLock::new(0),
            delete_calls: RwLock::new(0),
            fail_on_get: RwLock::new(false),
            fail_on_create: RwLock::new(false),
            fail_on_update: RwLock::new(false),
            fail_on_delete: RwLock::new(false),
        }
    }
}

impl<T: TransactionRecord> MockTransactionRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_get(&self, fail: bool) {
        *self.fail_on_get.write().await = fail;
    }

    pub async fn set_fail_on_create(&self, fail: bool) {
        *self.fail_on_create.write().await = fail;
    }

    pub async fn set_fail_on_update(&self, fail: bool) {
        *self.fail_on_update.write().await = fail;
    }

    pub async fn set_fail_on_delete(&self, fail: bool) {
        *self.fail_on_delete.write().await = fail;
    }

    pub async fn create_count(&self) -> usize {
        *self.create_calls.read().await
    }

    pub async fn update_count(&self) -> usize {
        *self.update_calls.read().await
    }

    pub async fn delete_count(&self) -> usize {
        *self.delete_calls.read().await
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of a stored record.
    pub async fn stored(&self, shop_id: &str, doc_no: &str) -> Option<T> {
        self.records
            .read()
            .await
            .get(&key(shop_id, doc_no))
            .cloned()
    }

    /// Seed a record without counting it as a create.
    pub async fn insert(&self, record: T) {
        let k = key(record.shop_id(), record.doc_no());
        self.records.write().await.insert(k, record);
    }
}

fn key(shop_id: &str, doc_no: &str) -> RecordKey {
    (shop_id.to_string(), doc_no.to_string())
}

fn injected(op: &str) -> StorageError {
    StorageError::Unavailable(format!("mock {} failure", op))
}

#[async_trait]
impl<T: TransactionRecord> TransactionRepository<T> for MockTransactionRepository<T> {
    async fn get(&self, shop_id: &str, doc_no: &str) -> Result<Option<T>> {
        if *self.fail_on_get.read().await {
            return Err(injected("get"));
        }
        Ok(self.stored(shop_id, doc_no).await)
    }

    async fn create(&self, record: &T) -> Result<()> {
        if *self.fail_on_create.read().await {
            return Err(injected("create"));
        }
        let k = key(record.shop_id(), record.doc_no());
        let mut records = self.records.write().await;
        if records.contains_key(&k) {
            return Err(StorageError::AlreadyExists {
                shop_id: k.0,
                doc_no: k.1,
            });
        }
        records.insert(k, record.clone());
        *self.create_calls.write().await += 1;
        Ok(())
    }

    async fn update(&self, shop_id: &str, doc_no: &str, record: &T) -> Result<()> {
        if *self.fail_on_update.read().await {
            return Err(injected("update"));
        }
        let k = key(shop_id, doc_no);
        let mut records = self.records.write().await;
        let Some(slot) = records.get_mut(&k) else {
            return Err(StorageError::NotFound {
                shop_id: k.0,
                doc_no: k.1,
            });
        };
        *slot = record.clone();
        *self.update_calls.write().await += 1;
        Ok(())
    }

    async fn delete(&self, shop_id: &str, doc_no: &str) -> Result<bool> {
        if *self.fail_on_delete.read().await {
            return Err(injected("delete"));
        }
        let removed = self
            .records
            .write()
            .await
            .remove(&key(shop_id, doc_no))
            .is_some();
        *self.delete_calls.write().await += 1;
        Ok(removed)
    }
}
