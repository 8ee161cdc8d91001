use crate::models::payment::{PAYMENT_TYPE_CREDIT_CARD, PAYMENT_TYPE_TRANSFER};
use crate::models::{
    default_names, pg_time, PaymentDetail, TransactionDocument, TransactionPayment,
    TransactionPaymentDetail,
};

use super::{decode_document, decode_documents, PhaseError, Result};

const PAYMENT_DOC: &str = "Payment";

/// Map a document into its payment ledger row.
pub fn parse_transaction_to_payment(doc: &TransactionDocument) -> Result<TransactionPayment> {
    build_payment(PAYMENT_DOC, doc)
}

/// Phases payment-only documents (`pay`, `paid`) straight into the payment
/// ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentPhaser {
    doc_name: &'static str,
}

impl Default for PaymentPhaser {
    fn default() -> Self {
        Self {
            doc_name: PAYMENT_DOC,
        }
    }
}

impl PaymentPhaser {
    /// Payment made to a creditor.
    pub const fn pay() -> Self {
        Self { doc_name: "Pay" }
    }

    /// Payment received from a debtor.
    pub const fn paid() -> Self {
        Self { doc_name: "Paid" }
    }

    pub fn doc_name(&self) -> &'static str {
        self.doc_name
    }

    pub fn phase_doc(&self, doc: &TransactionDocument) -> Result<TransactionPayment> {
        build_payment(self.doc_name, doc)
    }

    pub fn phase_single_doc(&self, msg: &str) -> Result<TransactionPayment> {
        let doc = decode_document(self.doc_name, msg)?;
        self.phase_doc(&doc)
    }

    pub fn phase_multiple_doc(&self, msg: &str) -> Result<Vec<TransactionPayment>> {
        decode_documents(self.doc_name, msg)?
            .iter()
            .map(|doc| self.phase_doc(doc))
            .collect()
    }
}

/// `paymentdetailraw` takes precedence over `paymentdetail` when it holds an
/// object. Clients send `""`, `"[]"` or `"null"` when there is none.
pub(super) fn payment_detail(
    name: &'static str,
    raw: &str,
    structured: &PaymentDetail,
) -> Result<PaymentDetail> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "[]" || raw == "null" {
        return Ok(structured.clone());
    }
    serde_json::from_str(raw)
        .map_err(|e| PhaseError::convert(name, format!("invalid paymentdetailraw: {}", e)))
}

fn build_payment(name: &'static str, doc: &TransactionDocument) -> Result<TransactionPayment> {
    let detail = payment_detail(name, &doc.paymentdetailraw, &doc.paymentdetail)?;
    let docdate = pg_time(doc.docdatetime);

    let line = |linenumber: usize| TransactionPaymentDetail {
        shopid: doc.shopid.clone(),
        docno: doc.docno.clone(),
        linenumber: linenumber as i32,
        docdate,
        transflag: doc.transflag,
        ..Default::default()
    };

    let cards = detail.paymentcreditcards.iter().flatten();
    let transfers = detail.paymenttransfers.iter().flatten();
    let card_count = cards.clone().count();

    let mut details: Vec<TransactionPaymentDetail> = cards
        .enumerate()
        .map(|(i, card)| TransactionPaymentDetail {
            paymenttype: PAYMENT_TYPE_CREDIT_CARD,
            paiddatetime: pg_time(card.docdatetime),
            cardnumber: card.cardnumber.clone(),
            chargeword: card.chargeword.clone(),
            chargevalue: card.chargevalue,
            amount: card.amount,
            ..line(i)
        })
        .collect();
    details.extend(
        transfers
            .enumerate()
            .map(|(i, transfer)| TransactionPaymentDetail {
                paymenttype: PAYMENT_TYPE_TRANSFER,
                paiddatetime: pg_time(transfer.docdatetime),
                bankcode: transfer.bankcode.clone(),
                banknames: default_names(&transfer.banknames),
                accountnumber: transfer.accountnumber.clone(),
                amount: transfer.amount,
                ..line(card_count + i)
            }),
    );

    Ok(TransactionPayment {
        guidfixed: doc.guidfixed.clone(),
        shopid: doc.shopid.clone(),
        docno: doc.docno.clone(),
        docdate,
        doctype: doc.doctype,
        transflag: doc.transflag,
        inquirytype: doc.inquirytype,
        branchcode: doc.branch.code.clone(),
        branchnames: default_names(&doc.branch.names),
        custcode: doc.custcode.clone(),
        custnames: default_names(&doc.custnames),
        iscancel: doc.iscancel,
        totalamount: doc.totalamount,
        paycashamount: doc.paycashamount,
        totalpaycash: detail.cashamount,
        totalpaycredit: detail.credit_card_total(),
        totalpaytransfer: detail.transfer_total(),
        details,
    })
}
