//! Payment ledger records.

use chrono::{DateTime, Utc};

use super::names::NameX;
use super::same_content_by_eq;
use crate::storage::{pg_row, TransactionRecord};

/// `paymenttype` of a credit card detail line.
pub const PAYMENT_TYPE_CREDIT_CARD: i16 = 1;
/// `paymenttype` of a bank transfer detail line.
pub const PAYMENT_TYPE_TRANSFER: i16 = 2;

pg_row! {
    /// How a document was settled: cash, credit cards and transfers.
    pub struct TransactionPayment {
        flatten {}
        columns {
            guidfixed: String => "guidfixed",
            shopid: String => "shopid",
            docno: String => "docno",
            docdate: DateTime<Utc> => "docdate",
            doctype: i16 => "doctype",
            transflag: i16 => "transflag",
            inquirytype: i32 => "inquirytype",
            branchcode: String => "branchcode",
            branchnames: Vec<NameX> => "branchnames",
            custcode: String => "custcode",
            custnames: Vec<NameX> => "custnames",
            iscancel: bool => "iscancel",
            totalamount: f64 => "totalamount",
            paycashamount: f64 => "paycashamount",
            totalpaycash: f64 => "totalpaycash",
            totalpaycredit: f64 => "totalpaycredit",
            totalpaytransfer: f64 => "totalpaytransfer",
        }
        lines {
            details: Vec<TransactionPaymentDetail> => "details"
        }
    }
}

pg_row! {
    /// One credit card or transfer used to settle a document.
    pub struct TransactionPaymentDetail {
        flatten {}
        columns {
            shopid: String => "shopid",
            docno: String => "docno",
            linenumber: i32 => "linenumber",
            docdate: DateTime<Utc> => "docdate",
            transflag: i16 => "transflag",
            paymenttype: i16 => "paymenttype",
            paiddatetime: DateTime<Utc> => "paiddatetime",
            cardnumber: String => "cardnumber",
            chargeword: String => "chargeword",
            chargevalue: f64 => "chargevalue",
            bankcode: String => "bankcode",
            banknames: Vec<NameX> => "banknames",
            accountnumber: String => "accountnumber",
            amount: f64 => "amount",
        }
    }
}

same_content_by_eq!(TransactionPayment);

impl TransactionRecord for TransactionPayment {
    type Line = TransactionPaymentDetail;

    fn shop_id(&self) -> &str {
        &self.shopid
    }

    fn doc_no(&self) -> &str {
        &self.docno
    }

    fn lines(&self) -> &[TransactionPaymentDetail] {
        &self.details
    }

    fn set_lines(&mut self, lines: Vec<TransactionPaymentDetail>) {
        self.details = lines;
    }
}
