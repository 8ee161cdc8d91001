use crate::models::{default_names, PurchaseTransaction, TransactionDocument};

use super::{phase_details, phase_header, trans_flag, Result, TransactionPhaser};

/// Phases purchases and purchase returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseTransactionPhaser {
    doc_name: &'static str,
    transflag: i16,
}

impl PurchaseTransactionPhaser {
    pub const fn purchase() -> Self {
        Self {
            doc_name: "Purchase",
            transflag: trans_flag::PURCHASE,
        }
    }

    pub const fn purchase_return() -> Self {
        Self {
            doc_name: "Purchase Return",
            transflag: trans_flag::PURCHASE_RETURN,
        }
    }

    pub fn transflag(&self) -> i16 {
        self.transflag
    }
}

impl TransactionPhaser for PurchaseTransactionPhaser {
    type Record = PurchaseTransaction;

    fn doc_name(&self) -> &'static str {
        self.doc_name
    }

    fn phase_doc(&self, doc: &TransactionDocument) -> Result<PurchaseTransaction> {
        let items = phase_details(self.doc_name, doc)?;

        Ok(PurchaseTransaction {
            header: phase_header(doc, self.transflag),
            creditorcode: doc.custcode.clone(),
            creditornames: default_names(&doc.custnames),
            totalpaycash: doc.paymentdetail.cashamount,
            totalpaycredit: doc.paymentdetail.credit_card_total(),
            totalpaytransfer: doc.paymentdetail.transfer_total(),
            items,
        })
    }
}
