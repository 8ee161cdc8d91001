use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::{
    ConsumerError, DocumentProfile, ErrorPolicy, LedgerServices, Party, Result,
    TransactionDocConsumer,
};
use crate::models::{LedgerSource, TransactionDocument};
use crate::phaser::{
    decode_document, decode_documents, has_party_effect, has_payment_effect,
    parse_transaction_to_payment, CreditorTransactionPhaser, DebtorTransactionPhaser,
    TransactionPhaser,
};
use crate::services::TransactionConsumerService;
use crate::storage::{self, StorageError, TransactionRecord};

/// Consumer for a header-bearing document type.
///
/// Create/update writes the document, then its stock, party and payment
/// ledgers as the profile allows. Delete removes the document and then each
/// ledger the profile names. Steps already written are not undone when a
/// later step fails; redelivery of the message completes them.
pub struct DocumentConsumer<P: TransactionPhaser> {
    phaser: P,
    profile: DocumentProfile,
    documents: Arc<TransactionConsumerService<P::Record>>,
    ledgers: LedgerServices,
}

impl<P: TransactionPhaser> DocumentConsumer<P> {
    pub fn new(
        phaser: P,
        profile: DocumentProfile,
        documents: Arc<TransactionConsumerService<P::Record>>,
        ledgers: LedgerServices,
    ) -> Self {
        Self {
            phaser,
            profile,
            documents,
            ledgers,
        }
    }

    pub fn profile(&self) -> &DocumentProfile {
        &self.profile
    }

    /// Apply the error policy to the result of an upsert step.
    fn upserted<T>(
        &self,
        step: &'static str,
        doc_no: &str,
        result: storage::Result<T>,
    ) -> Result<()> {
        match (result, self.profile.error_policy) {
            (Ok(_), _) => Ok(()),
            (Err(e), ErrorPolicy::FailFast) => Err(ConsumerError::storage(step, doc_no, e)),
            (Err(e), ErrorPolicy::LogAndContinue) => {
                error!(
                    doc = %self.phaser.doc_name(),
                    step = step,
                    doc_no = %doc_no,
                    error = %e,
                    "Upsert failed, continuing"
                );
                Ok(())
            }
        }
    }

    async fn write(&self, doc: &TransactionDocument, record: &P::Record) -> Result<()> {
        let shop_id = record.shop_id();
        let doc_no = record.doc_no();

        let result = self.documents.upsert(shop_id, doc_no, record).await;
        self.upserted("document", doc_no, result)?;

        if let Some(stock) = self.profile.stock {
            let row = stock.phase(record);
            let result = self.ledgers.stock.upsert(shop_id, doc_no, &row).await;
            self.upserted("stock", doc_no, result)?;
        }

        if has_party_effect(record.header()) {
            match self.profile.party {
                Party::Debtor => {
                    let row = DebtorTransactionPhaser.phase(record)?;
                    let result = self.ledgers.debtor.upsert(shop_id, doc_no, &row).await;
                    self.upserted("debtor", doc_no, result)?;
                }
                Party::Creditor => {
                    let row = CreditorTransactionPhaser.phase(record)?;
                    let result = self.ledgers.creditor.upsert(shop_id, doc_no, &row).await;
                    self.upserted("creditor", doc_no, result)?;
                }
                Party::None => {}
            }
        }

        if self.profile.payment && has_payment_effect(doc) {
            let row = parse_transaction_to_payment(doc)?;
            let result = self.ledgers.payment.upsert(shop_id, doc_no, &row).await;
            self.upserted("payment", doc_no, result)?;
        }

        Ok(())
    }

    async fn remove(&self, record: &P::Record) -> Result<()> {
        let shop_id = record.shop_id();
        let doc_no = record.doc_no();
        let failed =
            |step: &'static str| move |e: StorageError| ConsumerError::storage(step, doc_no, e);

        self.documents
            .delete(shop_id, doc_no)
            .await
            .map_err(failed("document"))?;

        if self.profile.stock.is_some() {
            self.ledgers
                .stock
                .delete(shop_id, doc_no)
                .await
                .map_err(failed("stock"))?;
        }

        match self.profile.party {
            Party::Debtor => {
                self.ledgers
                    .debtor
                    .delete(shop_id, doc_no)
                    .await
                    .map_err(failed("debtor"))?;
            }
            Party::Creditor => {
                self.ledgers
                    .creditor
                    .delete(shop_id, doc_no)
                    .await
                    .map_err(failed("creditor"))?;
            }
            Party::None => {}
        }

        if self.profile.payment {
            self.ledgers
                .payment
                .delete(shop_id, doc_no)
                .await
                .map_err(failed("payment"))?;
        }

        Ok(())
    }
}

#[async_trait]
impl<P: TransactionPhaser> TransactionDocConsumer for DocumentConsumer<P> {
    fn name(&self) -> &str {
        self.phaser.doc_name()
    }

    async fn consume_on_create_or_update(&self, msg: &str) -> Result<()> {
        let doc = decode_document(self.phaser.doc_name(), msg)?;
        let record = self.phaser.phase_doc(&doc)?;
        debug!(doc = %self.name(), doc_no = %record.doc_no(), "Consuming document");
        self.write(&doc, &record).await
    }

    async fn consume_on_bulk_create_or_update(&self, msg: &str) -> Result<()> {
        let docs = decode_documents(self.phaser.doc_name(), msg)?;
        let records = docs
            .iter()
            .map(|doc| self.phaser.phase_doc(doc))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(doc = %self.name(), count = records.len(), "Consuming document batch");

        for (doc, record) in docs.iter().zip(&records) {
            self.write(doc, record).await?;
        }
        Ok(())
    }

    async fn consume_on_delete(&self, msg: &str) -> Result<()> {
        let record = self.phaser.phase_single_doc(msg)?;
        self.remove(&record).await
    }

    async fn consume_on_bulk_delete(&self, msg: &str) -> Result<()> {
        let records = self.phaser.phase_multiple_doc(msg)?;
        for record in &records {
            self.remove(record).await?;
        }
        Ok(())
    }
}
