//! Document consumers.
//!
//! One consumer per document type turns raw topic messages into writes on the
//! document tables and the derived ledgers. `DocumentConsumer` serves every
//! header-bearing document type, configured by a [`DocumentProfile`];
//! `PaymentConsumer` serves the payment-only documents.

use std::sync::Arc;

use async_trait::async_trait;

use crate::bus::TopicAction;
use crate::models::{CreditorTransaction, DebtorTransaction, StockTransaction, TransactionPayment};
use crate::phaser::{PhaseError, StockTransactionPhaser};
use crate::services::TransactionConsumerService;
use crate::storage::StorageError;

mod document;
mod payment;
mod registry;

pub use document::DocumentConsumer;
pub use payment::PaymentConsumer;
pub use registry::{build_registry, ConsumerRegistry, DocumentServices, DocumentType, Route};

/// Result type for consumer operations.
pub type Result<T> = std::result::Result<T, ConsumerError>;

/// Errors returned by a consumer for one message.
#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error("Cannot persist {step} for {doc_no}: {source}")]
    Storage {
        step: &'static str,
        doc_no: String,
        #[source]
        source: StorageError,
    },
}

impl ConsumerError {
    pub(crate) fn storage(step: &'static str, doc_no: &str, source: StorageError) -> Self {
        Self::Storage {
            step,
            doc_no: doc_no.to_string(),
            source,
        }
    }

    /// Whether redelivering the same message can succeed.
    ///
    /// Phase errors are a property of the message itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

/// Consumes the messages of one document type.
#[async_trait]
pub trait TransactionDocConsumer: Send + Sync {
    /// Display name, e.g. "Sale Invoice".
    fn name(&self) -> &str;

    async fn consume_on_create_or_update(&self, msg: &str) -> Result<()>;

    async fn consume_on_bulk_create_or_update(&self, msg: &str) -> Result<()>;

    async fn consume_on_delete(&self, msg: &str) -> Result<()>;

    async fn consume_on_bulk_delete(&self, msg: &str) -> Result<()>;

    /// Route a message by the kind of topic it arrived on.
    async fn consume(&self, action: TopicAction, msg: &str) -> Result<()> {
        match action {
            TopicAction::Created | TopicAction::Updated => {
                self.consume_on_create_or_update(msg).await
            }
            TopicAction::BulkCreated | TopicAction::BulkUpdated => {
                self.consume_on_bulk_create_or_update(msg).await
            }
            TopicAction::Deleted => self.consume_on_delete(msg).await,
            TopicAction::BulkDeleted => self.consume_on_bulk_delete(msg).await,
        }
    }
}

/// Which party ledger a document type posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    None,
    Debtor,
    Creditor,
}

/// How a consumer treats a failed ledger upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Return the first persistence error; the message is redelivered.
    FailFast,
    /// Log upsert errors and go on with the next step.
    LogAndContinue,
}

/// Ledger effects of one document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentProfile {
    pub stock: Option<StockTransactionPhaser>,
    pub party: Party,
    pub payment: bool,
    pub error_policy: ErrorPolicy,
}

/// Services of the derived ledgers, shared by all consumers.
#[derive(Clone)]
pub struct LedgerServices {
    pub stock: Arc<TransactionConsumerService<StockTransaction>>,
    pub debtor: Arc<TransactionConsumerService<DebtorTransaction>>,
    pub creditor: Arc<TransactionConsumerService<CreditorTransaction>>,
    pub payment: Arc<TransactionConsumerService<TransactionPayment>>,
}
