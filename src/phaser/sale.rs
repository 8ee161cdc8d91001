use crate::models::{default_names, SaleTransaction, TransactionDocument};

use super::{phase_details, phase_header, trans_flag, Result, TransactionPhaser};

/// Phases sale invoices and sale invoice returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTransactionPhaser {
    doc_name: &'static str,
    transflag: i16,
}

impl SaleTransactionPhaser {
    pub const fn sale_invoice() -> Self {
        Self {
            doc_name: "Sale Invoice",
            transflag: trans_flag::SALE_INVOICE,
        }
    }

    pub const fn sale_invoice_return() -> Self {
        Self {
            doc_name: "Sale Invoice Return",
            transflag: trans_flag::SALE_INVOICE_RETURN,
        }
    }

    pub fn transflag(&self) -> i16 {
        self.transflag
    }
}

impl TransactionPhaser for SaleTransactionPhaser {
    type Record = SaleTransaction;

    fn doc_name(&self) -> &'static str {
        self.doc_name
    }

    fn phase_doc(&self, doc: &TransactionDocument) -> Result<SaleTransaction> {
        let items = phase_details(self.doc_name, doc)?;

        Ok(SaleTransaction {
            header: phase_header(doc, self.transflag),
            ispos: doc.ispos,
            salecode: doc.salecode.clone(),
            salename: doc.salename.clone(),
            detaildiscountformula: doc.detaildiscountformula.clone(),
            detailtotalamount: doc.detailtotalamount,
            totaldiscountvatamount: doc.totaldiscountvatamount,
            totaldiscountexceptvatamount: doc.totaldiscountexceptvatamount,
            detailtotaldiscount: doc.detailtotaldiscount,
            debtorcode: doc.custcode.clone(),
            debtornames: default_names(&doc.custnames),
            totalpaycash: doc.paymentdetail.cashamount,
            totalpaycredit: doc.paymentdetail.credit_card_total(),
            totalpaytransfer: doc.paymentdetail.transfer_total(),
            items,
        })
    }
}
