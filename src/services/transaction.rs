use std::sync::Arc;

use tracing::{debug, error, info};

use crate::bus::{LedgerAction, LedgerEvent, LedgerEventPublisher, LedgerKind};
use crate::models::SameContent;
use crate::storage::{Result, TransactionRecord, TransactionRepository};

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    /// The stored row already had the same content; nothing was written.
    Unchanged,
}

/// Upserts and deletes one record type, skipping writes that would not
/// change the stored row.
///
/// When built with [`with_publisher`](Self::with_publisher), every write
/// that changed the database is announced as a [`LedgerEvent`].
pub struct TransactionConsumerService<T: TransactionRecord> {
    repo: Arc<dyn TransactionRepository<T>>,
    publisher: Option<(LedgerKind, Arc<dyn LedgerEventPublisher>)>,
}

impl<T: TransactionRecord> TransactionConsumerService<T> {
    pub fn new(repo: Arc<dyn TransactionRepository<T>>) -> Self {
        Self {
            repo,
            publisher: None,
        }
    }

    pub fn with_publisher(
        mut self,
        ledger: LedgerKind,
        publisher: Arc<dyn LedgerEventPublisher>,
    ) -> Self {
        self.publisher = Some((ledger, publisher));
        self
    }

    pub async fn upsert(&self, shop_id: &str, doc_no: &str, doc: &T) -> Result<UpsertOutcome> {
        let outcome = match self.repo.get(shop_id, doc_no).await? {
            None => {
                self.repo.create(doc).await?;
                info!(shop_id = %shop_id, doc_no = %doc_no, "Created transaction");
                UpsertOutcome::Created
            }
            Some(existing) if existing.same_content(doc) => {
                debug!(shop_id = %shop_id, doc_no = %doc_no, "Transaction unchanged, skipping update");
                UpsertOutcome::Unchanged
            }
            Some(_) => {
                self.repo.update(shop_id, doc_no, doc).await?;
                info!(shop_id = %shop_id, doc_no = %doc_no, "Updated transaction");
                UpsertOutcome::Updated
            }
        };

        match outcome {
            UpsertOutcome::Created => self.emit(LedgerAction::Created, shop_id, doc_no).await,
            UpsertOutcome::Updated => self.emit(LedgerAction::Updated, shop_id, doc_no).await,
            UpsertOutcome::Unchanged => {}
        }
        Ok(outcome)
    }

    /// Delete the record and its lines. Returns whether a record existed.
    pub async fn delete(&self, shop_id: &str, doc_no: &str) -> Result<bool> {
        let existed = self.repo.delete(shop_id, doc_no).await?;
        if existed {
            info!(shop_id = %shop_id, doc_no = %doc_no, "Deleted transaction");
            self.emit(LedgerAction::Deleted, shop_id, doc_no).await;
        } else {
            debug!(shop_id = %shop_id, doc_no = %doc_no, "Transaction not found, nothing to delete");
        }
        Ok(existed)
    }

    /// Publish failures are logged; the database write already happened.
    async fn emit(&self, action: LedgerAction, shop_id: &str, doc_no: &str) {
        let Some((ledger, publisher)) = &self.publisher else {
            return;
        };
        let event = LedgerEvent::new(*ledger, action, shop_id, doc_no);
        if let Err(e) = publisher.publish(&event).await {
            error!(
                ledger = %ledger,
                shop_id = %shop_id,
                doc_no = %doc_no,
                error = %e,
                "Failed to publish ledger event"
            );
        }
    }
}
