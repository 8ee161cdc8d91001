use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{ConsumerError, Result, TransactionDocConsumer};
use crate::models::{DebtorPaymentTransaction, TransactionPayment};
use crate::phaser::{DebtorPaymentTransactionPhaser, PaymentPhaser};
use crate::services::TransactionConsumerService;

/// Consumer for payment documents (`pay`, `paid`).
///
/// Payment documents touch the payment ledger whatever their `inquirytype`.
/// Debtor payments also keep the bills they settle, written before the
/// payment ledger and deleted with it.
pub struct PaymentConsumer {
    phaser: PaymentPhaser,
    payments: Arc<TransactionConsumerService<TransactionPayment>>,
    debtor_payments: Option<Arc<TransactionConsumerService<DebtorPaymentTransaction>>>,
}

impl PaymentConsumer {
    pub fn new(
        phaser: PaymentPhaser,
        payments: Arc<TransactionConsumerService<TransactionPayment>>,
    ) -> Self {
        Self {
            phaser,
            payments,
            debtor_payments: None,
        }
    }

    /// Also write each message as a debtor payment document.
    pub fn with_debtor_payments(
        mut self,
        debtor_payments: Arc<TransactionConsumerService<DebtorPaymentTransaction>>,
    ) -> Self {
        self.debtor_payments = Some(debtor_payments);
        self
    }

    async fn write(&self, payment: &TransactionPayment) -> Result<()> {
        self.payments
            .upsert(&payment.shopid, &payment.docno, payment)
            .await
            .map_err(|e| ConsumerError::storage("payment", &payment.docno, e))?;
        Ok(())
    }

    async fn write_bills(&self, document: &DebtorPaymentTransaction) -> Result<()> {
        if let Some(debtor_payments) = &self.debtor_payments {
            debtor_payments
                .upsert(&document.shopid, &document.docno, document)
                .await
                .map_err(|e| ConsumerError::storage("debtor payment", &document.docno, e))?;
        }
        Ok(())
    }

    async fn remove(&self, payment: &TransactionPayment) -> Result<()> {
        if let Some(debtor_payments) = &self.debtor_payments {
            debtor_payments
                .delete(&payment.shopid, &payment.docno)
                .await
                .map_err(|e| ConsumerError::storage("debtor payment", &payment.docno, e))?;
        }
        self.payments
            .delete(&payment.shopid, &payment.docno)
            .await
            .map_err(|e| ConsumerError::storage("payment", &payment.docno, e))?;
        Ok(())
    }
}

#[async_trait]
impl TransactionDocConsumer for PaymentConsumer {
    fn name(&self) -> &str {
        self.phaser.doc_name()
    }

    async fn consume_on_create_or_update(&self, msg: &str) -> Result<()> {
        let payment = self.phaser.phase_single_doc(msg)?;
        let bills = match self.debtor_payments {
            Some(_) => Some(DebtorPaymentTransactionPhaser.phase_single_doc(msg)?),
            None => None,
        };
        debug!(doc = %self.name(), doc_no = %payment.docno, "Consuming payment");

        if let Some(bills) = &bills {
            self.write_bills(bills).await?;
        }
        self.write(&payment).await
    }

    async fn consume_on_bulk_create_or_update(&self, msg: &str) -> Result<()> {
        let payments = self.phaser.phase_multiple_doc(msg)?;
        let bills = match self.debtor_payments {
            Some(_) => DebtorPaymentTransactionPhaser.phase_multiple_doc(msg)?,
            None => Vec::new(),
        };

        for (i, payment) in payments.iter().enumerate() {
            if let Some(document) = bills.get(i) {
                self.write_bills(document).await?;
            }
            self.write(payment).await?;
        }
        Ok(())
    }

    async fn consume_on_delete(&self, msg: &str) -> Result<()> {
        let payment = self.phaser.phase_single_doc(msg)?;
        self.remove(&payment).await
    }

    async fn consume_on_bulk_delete(&self, msg: &str) -> Result<()> {
        let payments = self.phaser.phase_multiple_doc(msg)?;
        for payment in &payments {
            self.remove(payment).await?;
        }
        Ok(())
    }
}
