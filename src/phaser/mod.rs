//! Phasers map wire documents into relational records.
//!
//! A document phaser turns a `TransactionDocument` into its header record
//! (sale, purchase, inventory). Ledger phasers then derive the stock, debtor,
//! creditor and payment rows from an already phased record or document.
//! Debtor payments phase separately into the bills they settle.
//! Phasing is pure: no I/O happens here.

use crate::models::{
    default_names, pg_time, DocumentDetail, LedgerSource, TransactionDetail, TransactionDocument,
    TransactionHeader,
};
use crate::storage::TransactionRecord;

mod debtor_payment;
mod inventory;
mod party;
mod payment;
mod purchase;
mod sale;
mod stock;

pub use debtor_payment::DebtorPaymentTransactionPhaser;
pub use inventory::InventoryTransactionPhaser;
pub use party::{CreditorTransactionPhaser, DebtorTransactionPhaser};
pub use payment::{parse_transaction_to_payment, PaymentPhaser};
pub use purchase::PurchaseTransactionPhaser;
pub use sale::SaleTransactionPhaser;
pub use stock::StockTransactionPhaser;

/// Document type codes carried in `transflag`.
pub mod trans_flag {
    pub const PURCHASE: i16 = 12;
    pub const PURCHASE_RETURN: i16 = 16;
    pub const SALE_INVOICE: i16 = 44;
    pub const SALE_INVOICE_RETURN: i16 = 48;
}

/// Result type for phasing.
pub type Result<T> = std::result::Result<T, PhaseError>;

/// Errors raised while phasing a message.
#[derive(Debug, thiserror::Error)]
pub enum PhaseError {
    /// The message is not valid JSON for the document shape.
    #[error("Cannot Unmarshal {doc} Message : {source}")]
    Decode {
        doc: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The document decoded but cannot be mapped into its record.
    #[error("Error on Convert {doc} : {reason}")]
    Convert { doc: &'static str, reason: String },
}

impl PhaseError {
    pub fn convert(doc: &'static str, reason: impl Into<String>) -> Self {
        Self::Convert {
            doc,
            reason: reason.into(),
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Maps one document type into its header record.
pub trait TransactionPhaser: Send + Sync {
    type Record: TransactionRecord + LedgerSource;

    /// Display name used in error messages, e.g. "Sale Invoice".
    fn doc_name(&self) -> &'static str;

    fn phase_doc(&self, doc: &TransactionDocument) -> Result<Self::Record>;

    fn phase_single_doc(&self, msg: &str) -> Result<Self::Record> {
        let doc = decode_document(self.doc_name(), msg)?;
        self.phase_doc(&doc)
    }

    fn phase_multiple_doc(&self, msg: &str) -> Result<Vec<Self::Record>> {
        decode_documents(self.doc_name(), msg)?
            .iter()
            .map(|doc| self.phase_doc(doc))
            .collect()
    }
}

/// Decode a single document message.
pub fn decode_document(doc: &'static str, msg: &str) -> Result<TransactionDocument> {
    serde_json::from_str(msg).map_err(|source| PhaseError::Decode { doc, source })
}

/// Decode a bulk message: a JSON array of documents.
pub fn decode_documents(doc: &'static str, msg: &str) -> Result<Vec<TransactionDocument>> {
    serde_json::from_str(msg).map_err(|source| PhaseError::Decode { doc, source })
}

/// Credit documents (`inquirytype` 0) post to the debtor or creditor ledger.
pub fn has_party_effect(header: &TransactionHeader) -> bool {
    header.inquirytype == 0
}

/// Cash documents (`inquirytype` 1) post to the payment ledger.
pub fn has_payment_effect(doc: &TransactionDocument) -> bool {
    doc.inquirytype == 1
}

pub(crate) fn phase_header(doc: &TransactionDocument, transflag: i16) -> TransactionHeader {
    TransactionHeader {
        guidfixed: doc.guidfixed.clone(),
        shopid: doc.shopid.clone(),
        docno: doc.docno.clone(),
        docdate: pg_time(doc.docdatetime),
        inquirytype: doc.inquirytype,
        transflag,
        docreftype: doc.docreftype,
        docrefno: doc.docrefno.clone(),
        docrefdate: pg_time(doc.docrefdate),
        guidref: doc.guidref.clone(),
        taxdocno: doc.taxdocno.clone(),
        taxdocdate: pg_time(doc.taxdocdate),
        devicename: doc.devicename.clone(),
        guidpos: doc.guidpos.clone(),
        branchcode: doc.branch.code.clone(),
        branchnames: default_names(&doc.branch.names),
        description: doc.description.clone(),
        discountword: doc.discountword.clone(),
        iscancel: doc.iscancel,
        isbom: false,
        status: doc.status,
        ismanualamount: doc.ismanualamount,
        vattype: doc.vattype,
        vatrate: doc.vatrate,
        totalvalue: doc.totalvalue,
        deliveryamount: 0.0,
        totaldiscount: doc.totaldiscount,
        totalbeforevat: doc.totalbeforevat,
        totalvatvalue: doc.totalvatvalue,
        totalexceptvat: doc.totalexceptvat,
        totalaftervat: doc.totalaftervat,
        totalamount: doc.totalamount,
        alcoholamount: 0.0,
        otheramount: 0.0,
        drinkamount: 0.0,
        foodamount: 0.0,
    }
}

/// Map the document lines. A document without a `details` array is rejected.
pub(crate) fn phase_details(
    name: &'static str,
    doc: &TransactionDocument,
) -> Result<Vec<TransactionDetail>> {
    let details = doc
        .details
        .as_ref()
        .ok_or_else(|| PhaseError::convert(name, "details is missing"))?;

    Ok(details.iter().map(|d| phase_detail(doc, d)).collect())
}

fn phase_detail(doc: &TransactionDocument, d: &DocumentDetail) -> TransactionDetail {
    TransactionDetail {
        shopid: doc.shopid.clone(),
        docno: doc.docno.clone(),
        linenumber: d.linenumber,
        docdate: pg_time(d.docdatetime),
        barcode: d.barcode.clone(),
        itemnames: default_names(&d.itemnames),
        unitcode: d.unitcode.clone(),
        unitnames: default_names(&d.unitnames),
        itemtype: d.itemtype,
        itemguid: d.itemguid.clone(),
        qty: d.qty,
        price: d.price,
        priceexcludevat: d.priceexcludevat,
        discount: d.discount.clone(),
        discountamount: d.discountamount,
        sumamount: d.sumamount,
        sumamountexcludevat: d.sumamountexcludevat,
        sumamountchoice: d.sumamountchoice,
        totalvaluevat: d.totalvaluevat,
        refguid: d.refguid.clone(),
        docref: d.docref.clone(),
        docrefdatetime: pg_time(d.docrefdatetime),
        remark: d.remark.clone(),
        whcode: d.whcode.clone(),
        whnames: default_names(&d.whnames),
        locationcode: d.locationcode.clone(),
        locationnames: default_names(&d.locationnames),
        whcodedestination: d.towhcode.clone(),
        locationcodedestination: d.tolocationcode.clone(),
        vatcal: d.vatcal,
        foodtype: d.foodtype,
        vattype: d.vattype,
        taxtype: d.taxtype,
        ischoice: d.ischoice,
        calcflag: d.calcflag,
        standvalue: d.standvalue,
        dividevalue: d.dividevalue,
        groupcode: d.groupcode.clone(),
        groupnames: default_names(&d.groupnames),
        manufacturerguid: d.manufacturerguid.clone(),
        manufacturercode: d.manufacturercode.clone(),
        manufacturernames: default_names(&d.manufacturernames),
    }
}

#[cfg(test)]
mod tests;
