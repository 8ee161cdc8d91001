//! Kafka plumbing for document topics and ledger change events.
//!
//! This module contains:
//! - `TopicAction`: the six topic kinds of a document type and their naming
//! - `LedgerEvent` / `LedgerEventPublisher`: re-emit of derived ledger changes
//! - `dispatch`: routing of a raw message to its consumer, with retry
//! - Implementations: Kafka, Mock

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod dispatch;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod mock;

pub use dispatch::{process_message, DispatchResult};
#[cfg(feature = "kafka")]
pub use kafka::{KafkaConfig, KafkaConsumerRunner, KafkaLedgerPublisher};
pub use mock::MockLedgerPublisher;

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors that can occur during bus operations.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Subscribe failed: {0}")]
    Subscribe(String),

    #[error("Topic administration failed: {0}")]
    Admin(String),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The kind of message a document topic carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicAction {
    Created,
    Updated,
    Deleted,
    BulkCreated,
    BulkUpdated,
    BulkDeleted,
}

impl TopicAction {
    pub const ALL: [TopicAction; 6] = [
        TopicAction::Created,
        TopicAction::Updated,
        TopicAction::Deleted,
        TopicAction::BulkCreated,
        TopicAction::BulkUpdated,
        TopicAction::BulkDeleted,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            TopicAction::Created => "created",
            TopicAction::Updated => "updated",
            TopicAction::Deleted => "deleted",
            TopicAction::BulkCreated => "bulk-created",
            TopicAction::BulkUpdated => "bulk-updated",
            TopicAction::BulkDeleted => "bulk-deleted",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.suffix() == suffix)
    }

    pub fn is_bulk(&self) -> bool {
        matches!(
            self,
            TopicAction::BulkCreated | TopicAction::BulkUpdated | TopicAction::BulkDeleted
        )
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, TopicAction::Deleted | TopicAction::BulkDeleted)
    }
}

impl fmt::Display for TopicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Full topic name: `{prefix}{base}-{suffix}`.
pub fn topic_name(prefix: &str, base: &str, action: TopicAction) -> String {
    format!("{}{}-{}", prefix, base, action.suffix())
}

/// Split a full topic name back into its base and action.
pub fn parse_topic<'a>(prefix: &str, topic: &'a str) -> Option<(&'a str, TopicAction)> {
    let rest = topic.strip_prefix(prefix)?;
    // Bulk suffixes end with the plain ones, so they must be tried first.
    let mut actions = TopicAction::ALL;
    actions.sort_by_key(|a| std::cmp::Reverse(a.suffix().len()));
    actions.into_iter().find_map(|action| {
        rest.strip_suffix(action.suffix())
            .and_then(|base| base.strip_suffix('-'))
            .filter(|base| !base.is_empty())
            .map(|base| (base, action))
    })
}

/// A derived ledger the consumer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Stock,
    Debtor,
    Creditor,
    Payment,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Stock => "stock",
            LedgerKind::Debtor => "debtor",
            LedgerKind::Creditor => "creditor",
            LedgerKind::Payment => "payment",
        }
    }

    /// Topic the ledger's change events are published to.
    pub fn changed_topic(&self, prefix: &str) -> String {
        format!("{}{}-transaction-changed", prefix, self.as_str())
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerAction {
    Created,
    Updated,
    Deleted,
}

/// A change to a derived ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub ledger: LedgerKind,
    pub action: LedgerAction,
    pub shopid: String,
    pub docno: String,
}

impl LedgerEvent {
    pub fn new(
        ledger: LedgerKind,
        action: LedgerAction,
        shop_id: impl Into<String>,
        doc_no: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            action,
            shopid: shop_id.into(),
            docno: doc_no.into(),
        }
    }

    /// Message key: keeps events of one document on one partition.
    pub fn key(&self) -> String {
        format!("{}:{}", self.shopid, self.docno)
    }
}

/// Publishes ledger change events.
#[async_trait]
pub trait LedgerEventPublisher: Send + Sync {
    async fn publish(&self, event: &LedgerEvent) -> Result<()>;
}
