//! Message dispatch.
//!
//! Routes a raw message to the consumer registered for its topic, retrying
//! failed persistence in place before giving up on the delivery.

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, error, warn};

use crate::consumer::{ConsumerError, ConsumerRegistry};

/// Result of processing a message through its consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// The consumer succeeded, safe to commit.
    Success,
    /// Persistence kept failing after retries; the message must be redelivered.
    HandlerFailed,
    /// The message can never be processed, no retry will help.
    DecodeError,
}

impl DispatchResult {
    /// Returns true if the message offset should be committed.
    ///
    /// Decode errors are committed to prevent infinite redelivery of bad messages.
    pub fn should_ack(&self) -> bool {
        matches!(self, Self::Success | Self::DecodeError)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Process a message payload received on `topic`.
///
/// # Returns
/// * `DispatchResult::Success` - The consumer succeeded
/// * `DispatchResult::HandlerFailed` - Persistence failed after all retries
/// * `DispatchResult::DecodeError` - Unknown topic, non-UTF-8 payload, or a
///   document that cannot be phased
pub async fn process_message(
    registry: &ConsumerRegistry,
    topic: &str,
    payload: &[u8],
    backoff: ExponentialBuilder,
) -> DispatchResult {
    let Some(route) = registry.route(topic) else {
        if registry.is_document_topic(topic) {
            error!(topic = %topic, "No consumer registered for document topic");
        } else {
            error!(topic = %topic, "Message on unknown topic");
        }
        return DispatchResult::DecodeError;
    };

    let msg = match std::str::from_utf8(payload) {
        Ok(msg) => msg,
        Err(e) => {
            error!(topic = %topic, error = %e, "Payload is not UTF-8");
            return DispatchResult::DecodeError;
        }
    };

    let result = (|| async { route.consumer.consume(route.action, msg).await })
        .retry(backoff)
        .when(ConsumerError::is_retryable)
        .notify(|err: &ConsumerError, dur| {
            warn!(
                topic = %topic,
                error = %err,
                delay_ms = dur.as_millis() as u64,
                "Consumer failed, retrying"
            );
        })
        .await;

    match result {
        Ok(()) => {
            debug!(topic = %topic, doc = %route.consumer.name(), "Message processed");
            DispatchResult::Success
        }
        Err(e) if e.is_retryable() => {
            error!(topic = %topic, error = %e, "Consumer failed after retries");
            DispatchResult::HandlerFailed
        }
        Err(e) => {
            error!(topic = %topic, error = %e, "Dropping message that cannot be phased");
            DispatchResult::DecodeError
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::consumer::{build_registry, DocumentServices, LedgerServices};
    use crate::models::{SaleTransaction, StockTransaction};
    use crate::services::TransactionConsumerService;
    use crate::storage::{MockTransactionRepository, TransactionRecord};

    fn service<T: TransactionRecord>(
        repo: &Arc<MockTransactionRepository<T>>,
    ) -> Arc<TransactionConsumerService<T>> {
        Arc::new(TransactionConsumerService::new(repo.clone()))
    }

    struct Fixture {
        registry: ConsumerRegistry,
        sales: Arc<MockTransactionRepository<SaleTransaction>>,
        stock: Arc<MockTransactionRepository<StockTransaction>>,
    }

    fn fixture() -> Fixture {
        let sales = Arc::new(MockTransactionRepository::new());
        let stock = Arc::new(MockTransactionRepository::new());
        let ledgers = LedgerServices {
            stock: service(&stock),
            debtor: service(&Arc::new(MockTransactionRepository::new())),
            creditor: service(&Arc::new(MockTransactionRepository::new())),
            payment: service(&Arc::new(MockTransactionRepository::new())),
        };
        let documents = DocumentServices {
            sale_invoice: service(&sales),
            sale_invoice_return: service(&Arc::new(MockTransactionRepository::new())),
            purchase: service(&Arc::new(MockTransactionRepository::new())),
            purchase_return: service(&Arc::new(MockTransactionRepository::new())),
            stock_adjustment: service(&Arc::new(MockTransactionRepository::new())),
            stock_balance: service(&Arc::new(MockTransactionRepository::new())),
            stock_pickup: service(&Arc::new(MockTransactionRepository::new())),
            stock_receive: service(&Arc::new(MockTransactionRepository::new())),
            stock_return: service(&Arc::new(MockTransactionRepository::new())),
            stock_transfer: service(&Arc::new(MockTransactionRepository::new())),
            debtor_payment: service(&Arc::new(MockTransactionRepository::new())),
        };
        Fixture {
            registry: build_registry("", documents, ledgers),
            sales,
            stock,
        }
    }

    fn fast_backoff() -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2))
            .with_max_times(2)
    }

    fn sale_payload() -> Vec<u8> {
        json!({
            "shopid": "shop1",
            "docno": "SI001",
            "inquirytype": 0,
            "custcode": "AR001",
            "details": [{ "barcode": "B001", "qty": 1 }]
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn test_dispatch_result_should_ack() {
        assert!(DispatchResult::Success.should_ack());
        assert!(DispatchResult::DecodeError.should_ack());
        assert!(!DispatchResult::HandlerFailed.should_ack());
        assert!(!DispatchResult::DecodeError.is_success());
    }

    #[tokio::test]
    async fn test_process_message_success() {
        let f = fixture();

        let result =
            process_message(&f.registry, "saleinvoice-created", &sale_payload(), fast_backoff())
                .await;

        assert_eq!(result, DispatchResult::Success);
        assert_eq!(f.sales.len().await, 1);
    }

    #[tokio::test]
    async fn test_process_message_unknown_topic() {
        let f = fixture();

        let result =
            process_message(&f.registry, "orders-created", &sale_payload(), fast_backoff()).await;

        assert_eq!(result, DispatchResult::DecodeError);
    }

    #[tokio::test]
    async fn test_process_message_not_utf8() {
        let f = fixture();

        let result =
            process_message(&f.registry, "saleinvoice-created", &[0xff, 0xfe], fast_backoff())
                .await;

        assert_eq!(result, DispatchResult::DecodeError);
    }

    #[tokio::test]
    async fn test_process_message_malformed_json_is_acked() {
        let f = fixture();

        let result =
            process_message(&f.registry, "saleinvoice-created", b"{\"docno\":", fast_backoff())
                .await;

        assert_eq!(result, DispatchResult::DecodeError);
        assert!(result.should_ack());
        assert!(f.sales.is_empty().await);
    }

    #[tokio::test]
    async fn test_process_message_storage_failure_is_not_acked() {
        let f = fixture();
        f.stock.set_fail_on_create(true).await;

        let result =
            process_message(&f.registry, "saleinvoice-created", &sale_payload(), fast_backoff())
                .await;

        assert_eq!(result, DispatchResult::HandlerFailed);
        assert!(!result.should_ack());
        // Retries reuse the stored document instead of creating it again.
        assert_eq!(f.sales.create_count().await, 1);
    }

    #[tokio::test]
    async fn test_process_message_delete_topic() {
        let f = fixture();
        process_message(&f.registry, "saleinvoice-created", &sale_payload(), fast_backoff()).await;

        let result =
            process_message(&f.registry, "saleinvoice-deleted", &sale_payload(), fast_backoff())
                .await;

        assert_eq!(result, DispatchResult::Success);
        assert!(f.sales.is_empty().await);
        assert!(f.stock.is_empty().await);
    }
}
