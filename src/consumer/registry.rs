use std::collections::HashMap;
use std::sync::Arc;

use super::{
    DocumentConsumer, DocumentProfile, ErrorPolicy, LedgerServices, Party, PaymentConsumer,
    TransactionDocConsumer,
};
use crate::bus::{parse_topic, topic_name, TopicAction};
use crate::models::{
    DebtorPaymentTransaction, InventoryTransaction, PurchaseTransaction, SaleTransaction,
};
use crate::phaser::{
    InventoryTransactionPhaser, PaymentPhaser, PurchaseTransactionPhaser, SaleTransactionPhaser,
    StockTransactionPhaser,
};
use crate::services::TransactionConsumerService;
use crate::storage::RecordTables;

/// Document types with a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    SaleInvoice,
    SaleInvoiceReturn,
    Purchase,
    PurchaseReturn,
    StockAdjustment,
    StockBalance,
    StockPickup,
    StockReceive,
    StockReturn,
    /// Moves stock between warehouses.
    StockTransfer,
    /// Payment to a creditor.
    Pay,
    /// Payment from a debtor.
    Paid,
}

impl DocumentType {
    pub const ALL: [DocumentType; 12] = [
        DocumentType::SaleInvoice,
        DocumentType::SaleInvoiceReturn,
        DocumentType::Purchase,
        DocumentType::PurchaseReturn,
        DocumentType::StockAdjustment,
        DocumentType::StockBalance,
        DocumentType::StockPickup,
        DocumentType::StockReceive,
        DocumentType::StockReturn,
        DocumentType::StockTransfer,
        DocumentType::Pay,
        DocumentType::Paid,
    ];

    /// Base of the document's topic names.
    pub fn topic_base(&self) -> &'static str {
        match self {
            DocumentType::SaleInvoice => "saleinvoice",
            DocumentType::SaleInvoiceReturn => "saleinvoicereturn",
            DocumentType::Purchase => "purchase",
            DocumentType::PurchaseReturn => "purchasereturn",
            DocumentType::StockAdjustment => "stockadjustment",
            DocumentType::StockBalance => "stockbalance",
            DocumentType::StockPickup => "stockpickupproduct",
            DocumentType::StockReceive => "stockreceiveproduct",
            DocumentType::StockReturn => "stockreturnproduct",
            DocumentType::StockTransfer => "stocktransfer",
            DocumentType::Pay => "pay",
            DocumentType::Paid => "paid",
        }
    }

    /// Tables of the document record. Creditor payments have none of their
    /// own; they only write the payment ledger.
    pub fn tables(&self) -> Option<RecordTables> {
        let tables = match self {
            DocumentType::SaleInvoice => {
                RecordTables::with_detail("saleinvoice_transaction", "saleinvoice_transaction_detail")
            }
            DocumentType::SaleInvoiceReturn => RecordTables::with_detail(
                "saleinvoicereturn_transaction",
                "saleinvoicereturn_transaction_detail",
            ),
            DocumentType::Purchase => {
                RecordTables::with_detail("purchase_transaction", "purchase_transaction_detail")
            }
            DocumentType::PurchaseReturn => RecordTables::with_detail(
                "purchasereturn_transaction",
                "purchasereturn_transaction_detail",
            ),
            DocumentType::StockAdjustment => RecordTables::with_detail(
                "stockadjustment_transaction",
                "stockadjustment_transaction_detail",
            ),
            DocumentType::StockBalance => RecordTables::with_detail(
                "stockbalance_transaction",
                "stockbalance_transaction_detail",
            ),
            DocumentType::StockPickup => RecordTables::with_detail(
                "stockpickup_transaction",
                "stockpickup_transaction_detail",
            ),
            DocumentType::StockReceive => RecordTables::with_detail(
                "stockreceive_transaction",
                "stockreceive_transaction_detail",
            ),
            DocumentType::StockReturn => RecordTables::with_detail(
                "stockreturn_transaction",
                "stockreturn_transaction_detail",
            ),
            DocumentType::StockTransfer => RecordTables::with_detail(
                "stocktransfer_transaction",
                "stocktransfer_transaction_detail",
            ),
            DocumentType::Paid => {
                RecordTables::with_detail("paid_transaction", "paid_transaction_detail")
            }
            DocumentType::Pay => return None,
        };
        Some(tables)
    }

    /// Ledger effects of a header-bearing document type.
    pub fn profile(&self) -> Option<DocumentProfile> {
        let (stock, party, payment, error_policy) = match self {
            DocumentType::SaleInvoice => (
                StockTransactionPhaser::sale_invoice(),
                Party::Debtor,
                true,
                ErrorPolicy::FailFast,
            ),
            DocumentType::SaleInvoiceReturn => (
                StockTransactionPhaser::sale_invoice_return(),
                Party::Debtor,
                true,
                ErrorPolicy::FailFast,
            ),
            DocumentType::Purchase => (
                StockTransactionPhaser::purchase(),
                Party::Creditor,
                true,
                ErrorPolicy::FailFast,
            ),
            DocumentType::PurchaseReturn => (
                StockTransactionPhaser::purchase_return(),
                Party::Creditor,
                true,
                ErrorPolicy::FailFast,
            ),
            DocumentType::StockAdjustment => (
                StockTransactionPhaser::stock_adjustment(),
                Party::None,
                false,
                ErrorPolicy::LogAndContinue,
            ),
            DocumentType::StockBalance => (
                StockTransactionPhaser::stock_balance(),
                Party::None,
                false,
                ErrorPolicy::LogAndContinue,
            ),
            DocumentType::StockPickup => (
                StockTransactionPhaser::stock_pickup(),
                Party::None,
                false,
                ErrorPolicy::LogAndContinue,
            ),
            DocumentType::StockReceive => (
                StockTransactionPhaser::stock_receive(),
                Party::None,
                false,
                ErrorPolicy::LogAndContinue,
            ),
            DocumentType::StockReturn => (
                StockTransactionPhaser::stock_return(),
                Party::None,
                false,
                ErrorPolicy::LogAndContinue,
            ),
            DocumentType::StockTransfer => (
                StockTransactionPhaser::stock_transfer(),
                Party::None,
                false,
                ErrorPolicy::LogAndContinue,
            ),
            DocumentType::Pay | DocumentType::Paid => return None,
        };
        Some(DocumentProfile {
            stock: Some(stock),
            party,
            payment,
            error_policy,
        })
    }
}

/// Consumer and message kind a topic is routed to.
#[derive(Clone)]
pub struct Route {
    pub consumer: Arc<dyn TransactionDocConsumer>,
    pub action: TopicAction,
}

/// Maps full topic names to their consumer.
pub struct ConsumerRegistry {
    prefix: String,
    routes: HashMap<String, Route>,
}

impl ConsumerRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Route all six topics of `base` to `consumer`.
    pub fn register(&mut self, base: &str, consumer: Arc<dyn TransactionDocConsumer>) {
        for action in TopicAction::ALL {
            self.routes.insert(
                topic_name(&self.prefix, base, action),
                Route {
                    consumer: consumer.clone(),
                    action,
                },
            );
        }
    }

    pub fn route(&self, topic: &str) -> Option<&Route> {
        self.routes.get(topic)
    }

    /// Whether a topic name has the shape of a document topic under this
    /// registry's prefix, registered or not.
    pub fn is_document_topic(&self, topic: &str) -> bool {
        parse_topic(&self.prefix, topic).is_some()
    }

    /// All registered topics, sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.routes.keys().cloned().collect();
        topics.sort();
        topics
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Services of the document tables.
pub struct DocumentServices {
    pub sale_invoice: Arc<TransactionConsumerService<SaleTransaction>>,
    pub sale_invoice_return: Arc<TransactionConsumerService<SaleTransaction>>,
    pub purchase: Arc<TransactionConsumerService<PurchaseTransaction>>,
    pub purchase_return: Arc<TransactionConsumerService<PurchaseTransaction>>,
    pub stock_adjustment: Arc<TransactionConsumerService<InventoryTransaction>>,
    pub stock_balance: Arc<TransactionConsumerService<InventoryTransaction>>,
    pub stock_pickup: Arc<TransactionConsumerService<InventoryTransaction>>,
    pub stock_receive: Arc<TransactionConsumerService<InventoryTransaction>>,
    pub stock_return: Arc<TransactionConsumerService<InventoryTransaction>>,
    pub stock_transfer: Arc<TransactionConsumerService<InventoryTransaction>>,
    pub debtor_payment: Arc<TransactionConsumerService<DebtorPaymentTransaction>>,
}

/// Build the consumer of every document type and route its topics.
pub fn build_registry(
    prefix: impl Into<String>,
    documents: DocumentServices,
    ledgers: LedgerServices,
) -> ConsumerRegistry {
    let mut registry = ConsumerRegistry::new(prefix);

    for doc_type in DocumentType::ALL {
        let consumer: Arc<dyn TransactionDocConsumer> = match (doc_type, doc_type.profile()) {
            (DocumentType::SaleInvoice, Some(profile)) => Arc::new(DocumentConsumer::new(
                SaleTransactionPhaser::sale_invoice(),
                profile,
                documents.sale_invoice.clone(),
                ledgers.clone(),
            )),
            (DocumentType::SaleInvoiceReturn, Some(profile)) => Arc::new(DocumentConsumer::new(
                SaleTransactionPhaser::sale_invoice_return(),
                profile,
                documents.sale_invoice_return.clone(),
                ledgers.clone(),
            )),
            (DocumentType::Purchase, Some(profile)) => Arc::new(DocumentConsumer::new(
                PurchaseTransactionPhaser::purchase(),
                profile,
                documents.purchase.clone(),
                ledgers.clone(),
            )),
            (DocumentType::PurchaseReturn, Some(profile)) => Arc::new(DocumentConsumer::new(
                PurchaseTransactionPhaser::purchase_return(),
                profile,
                documents.purchase_return.clone(),
                ledgers.clone(),
            )),
            (DocumentType::StockAdjustment, Some(profile)) => Arc::new(DocumentConsumer::new(
                InventoryTransactionPhaser::stock_adjustment(),
                profile,
                documents.stock_adjustment.clone(),
                ledgers.clone(),
            )),
            (DocumentType::StockBalance, Some(profile)) => Arc::new(DocumentConsumer::new(
                InventoryTransactionPhaser::stock_balance(),
                profile,
                documents.stock_balance.clone(),
                ledgers.clone(),
            )),
            (DocumentType::StockPickup, Some(profile)) => Arc::new(DocumentConsumer::new(
                InventoryTransactionPhaser::stock_pickup(),
                profile,
                documents.stock_pickup.clone(),
                ledgers.clone(),
            )),
            (DocumentType::StockReceive, Some(profile)) => Arc::new(DocumentConsumer::new(
                InventoryTransactionPhaser::stock_receive(),
                profile,
                documents.stock_receive.clone(),
                ledgers.clone(),
            )),
            (DocumentType::StockReturn, Some(profile)) => Arc::new(DocumentConsumer::new(
                InventoryTransactionPhaser::stock_return(),
                profile,
                documents.stock_return.clone(),
                ledgers.clone(),
            )),
            (DocumentType::StockTransfer, Some(profile)) => Arc::new(DocumentConsumer::new(
                InventoryTransactionPhaser::stock_transfer(),
                profile,
                documents.stock_transfer.clone(),
                ledgers.clone(),
            )),
            (DocumentType::Pay, _) => Arc::new(PaymentConsumer::new(
                PaymentPhaser::pay(),
                ledgers.payment.clone(),
            )),
            (DocumentType::Paid, _) => Arc::new(
                PaymentConsumer::new(PaymentPhaser::paid(), ledgers.payment.clone())
                    .with_debtor_payments(documents.debtor_payment.clone()),
            ),
            (_, None) => continue,
        };
        registry.register(doc_type.topic_base(), consumer);
    }

    registry
}
