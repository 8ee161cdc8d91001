//! ledger-consumer: document projection service
//!
//! Consumes business documents from Kafka and projects them into the document
//! tables and the stock, debtor, creditor and payment ledgers.
//!
//! ## Architecture
//! ```text
//! [saleinvoice-created, purchase-deleted, ...] --> [ledger-consumer] --> PostgreSQL
//!                                                          |
//!                                                          v
//!                                          {ledger}-transaction-changed
//! ```
//!
//! ## Configuration
//! - LEDGER_CONFIG: Path to a YAML config file (optional)
//! - LEDGER__*: Overrides for any config key, e.g. LEDGER__STORAGE__POSTGRES__URI
//! - TRANSACTION_CONSUMER_GROUP: Kafka consumer group
//! - LEDGER_LOG / LEDGER_LOG_FORMAT: Log filter and format

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{error, info};

use ledger_consumer::bus::kafka::ensure_topics;
use ledger_consumer::bus::{
    KafkaConfig, KafkaConsumerRunner, KafkaLedgerPublisher, LedgerEventPublisher, LedgerKind,
};
use ledger_consumer::config::Config;
use ledger_consumer::consumer::{build_registry, DocumentServices, DocumentType, LedgerServices};
use ledger_consumer::services::TransactionConsumerService;
use ledger_consumer::storage::{PostgresTransactionRepository, RecordTables, TransactionRecord};
use ledger_consumer::utils::bootstrap::{connect_postgres, init_tracing};
use ledger_consumer::utils::retry::consumer_backoff;

type BoxError = Box<dyn std::error::Error>;

/// Create the tables of `T` and wrap its repository in a service.
async fn service<T: TransactionRecord>(
    pool: &PgPool,
    tables: RecordTables,
) -> Result<TransactionConsumerService<T>, BoxError> {
    let repo = PostgresTransactionRepository::<T>::new(pool.clone(), tables);
    repo.init().await?;
    Ok(TransactionConsumerService::new(Arc::new(repo)))
}

async fn document_service<T: TransactionRecord>(
    pool: &PgPool,
    doc_type: DocumentType,
) -> Result<Arc<TransactionConsumerService<T>>, BoxError> {
    let tables = doc_type
        .tables()
        .ok_or_else(|| format!("{} has no document tables", doc_type.topic_base()))?;
    Ok(Arc::new(service(pool, tables).await?))
}

async fn ledger_service<T: TransactionRecord>(
    pool: &PgPool,
    tables: RecordTables,
    kind: LedgerKind,
    publisher: Option<&Arc<dyn LedgerEventPublisher>>,
) -> Result<Arc<TransactionConsumerService<T>>, BoxError> {
    let service = service(pool, tables).await?;
    let service = match publisher {
        Some(publisher) => service.with_publisher(kind, publisher.clone()),
        None => service,
    };
    Ok(Arc::new(service))
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();

    let config = Config::load(None)?;
    let kafka = KafkaConfig::from_settings(&config.messaging.kafka);

    let pool = connect_postgres(&config.storage.postgres).await?;

    let publisher: Option<Arc<dyn LedgerEventPublisher>> = if config.messaging.publish_ledger_events
    {
        Some(Arc::new(KafkaLedgerPublisher::new(&kafka)?))
    } else {
        None
    };
    let publisher = publisher.as_ref();

    let ledgers = LedgerServices {
        stock: ledger_service(&pool, RecordTables::STOCK, LedgerKind::Stock, publisher).await?,
        debtor: ledger_service(&pool, RecordTables::DEBTOR, LedgerKind::Debtor, publisher).await?,
        creditor: ledger_service(&pool, RecordTables::CREDITOR, LedgerKind::Creditor, publisher)
            .await?,
        payment: ledger_service(&pool, RecordTables::PAYMENT, LedgerKind::Payment, publisher)
            .await?,
    };

    let documents = DocumentServices {
        sale_invoice: document_service(&pool, DocumentType::SaleInvoice).await?,
        sale_invoice_return: document_service(&pool, DocumentType::SaleInvoiceReturn).await?,
        purchase: document_service(&pool, DocumentType::Purchase).await?,
        purchase_return: document_service(&pool, DocumentType::PurchaseReturn).await?,
        stock_adjustment: document_service(&pool, DocumentType::StockAdjustment).await?,
        stock_balance: document_service(&pool, DocumentType::StockBalance).await?,
        stock_pickup: document_service(&pool, DocumentType::StockPickup).await?,
        stock_receive: document_service(&pool, DocumentType::StockReceive).await?,
        stock_return: document_service(&pool, DocumentType::StockReturn).await?,
        stock_transfer: document_service(&pool, DocumentType::StockTransfer).await?,
        debtor_payment: document_service(&pool, DocumentType::Paid).await?,
    };

    let registry = build_registry(kafka.topic_prefix.clone(), documents, ledgers);

    if config.messaging.topics.auto_create {
        ensure_topics(&kafka, &registry.topics(), &config.messaging.topics).await?;
    }

    info!(
        topics = registry.len(),
        group_id = ?kafka.group_id,
        "ledger-consumer started"
    );

    let runner = KafkaConsumerRunner::new(
        &kafka,
        registry,
        consumer_backoff(&config.consumer.retry),
    )?;

    runner
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    pool.close().await;
    info!("ledger-consumer stopped");
    Ok(())
}
