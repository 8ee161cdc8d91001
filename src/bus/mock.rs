//! Mock ledger publisher for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BusError, LedgerEvent, LedgerEventPublisher, Result};

/// Records published ledger events in memory.
#[derive(Default)]
pub struct MockLedgerPublisher {
    published: RwLock<Vec<LedgerEvent>>,
    fail_on_publish: RwLock<bool>,
}

impl MockLedgerPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_publish(&self, fail: bool) {
        *self.fail_on_publish.write().await = fail;
    }

    pub async fn published_count(&self) -> usize {
        self.published.read().await.len()
    }

    pub async fn published(&self) -> Vec<LedgerEvent> {
        self.published.read().await.clone()
    }

    pub async fn take_published(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut *self.published.write().await)
    }
}

#[async_trait]
impl LedgerEventPublisher for MockLedgerPublisher {
    async fn publish(&self, event: &LedgerEvent) -> Result<()> {
        if *self.fail_on_publish.read().await {
            return Err(BusError::Publish("Mock publish failure".to_string()));
        }
        self.published.write().await.push(event.clone());
        Ok(())
    }
}
