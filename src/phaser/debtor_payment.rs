use crate::models::{
    default_names, pg_time, DebtorPaymentBill, DebtorPaymentDocument, DebtorPaymentTransaction,
    DebtorPaymentTransactionDetail,
};

use super::payment::payment_detail;
use super::{PhaseError, Result};

/// Phases debtor payments (`paid` topics) into the bills they settle.
///
/// A payment without a `details` array settled no bills and phases to a
/// record without lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebtorPaymentTransactionPhaser;

impl DebtorPaymentTransactionPhaser {
    pub const DOC_NAME: &'static str = "Debtor Payment";

    pub fn phase_doc(&self, doc: &DebtorPaymentDocument) -> Result<DebtorPaymentTransaction> {
        let payment = payment_detail(Self::DOC_NAME, &doc.paymentdetailraw, &doc.paymentdetail)?;

        let details = doc
            .details
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, bill)| phase_bill(doc, i, bill))
            .collect();

        Ok(DebtorPaymentTransaction {
            guidfixed: doc.guidfixed.clone(),
            shopid: doc.shopid.clone(),
            docno: doc.docno.clone(),
            docdate: pg_time(doc.docdatetime),
            transflag: doc.transflag,
            branchcode: doc.branch.code.clone(),
            branchnames: default_names(&doc.branch.names),
            debtorcode: doc.custcode.clone(),
            debtornames: default_names(&doc.custnames),
            iscancel: doc.iscancel,
            totalamount: doc.totalamount,
            totalpaycash: payment.cashamount,
            totalpaytransfer: payment.transfer_total(),
            totalpaycredit: payment.credit_card_total(),
            details,
        })
    }

    pub fn phase_single_doc(&self, msg: &str) -> Result<DebtorPaymentTransaction> {
        let doc: DebtorPaymentDocument = serde_json::from_str(msg).map_err(|source| {
            PhaseError::Decode {
                doc: Self::DOC_NAME,
                source,
            }
        })?;
        self.phase_doc(&doc)
    }

    pub fn phase_multiple_doc(&self, msg: &str) -> Result<Vec<DebtorPaymentTransaction>> {
        let docs: Vec<DebtorPaymentDocument> =
            serde_json::from_str(msg).map_err(|source| PhaseError::Decode {
                doc: Self::DOC_NAME,
                source,
            })?;
        docs.iter().map(|doc| self.phase_doc(doc)).collect()
    }
}

fn phase_bill(
    doc: &DebtorPaymentDocument,
    linenumber: usize,
    bill: &DebtorPaymentBill,
) -> DebtorPaymentTransactionDetail {
    DebtorPaymentTransactionDetail {
        shopid: doc.shopid.clone(),
        docno: doc.docno.clone(),
        linenumber: linenumber as i32,
        billingno: bill.docno.clone(),
        billtype: bill.transflag,
        billdate: pg_time(bill.docdatetime),
        billamount: bill.value,
        balanceamount: bill.balance,
        payamount: bill.paymentamount,
    }
}
