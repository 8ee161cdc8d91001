//! Debtor payment documents: bills settled by a customer.

use chrono::{DateTime, Utc};

use super::names::NameX;
use super::same_content_by_eq;
use crate::storage::{pg_row, TransactionRecord};

pg_row! {
    pub struct DebtorPaymentTransaction {
        flatten {}
        columns {
            guidfixed: String => "guidfixed",
            shopid: String => "shopid",
            docno: String => "docno",
            docdate: DateTime<Utc> => "docdate",
            transflag: i16 => "transflag",
            branchcode: String => "branchcode",
            branchnames: Vec<NameX> => "branchnames",
            debtorcode: String => "debtorcode",
            debtornames: Vec<NameX> => "debtornames",
            iscancel: bool => "iscancel",
            totalamount: f64 => "totalamount",
            totalpaycash: f64 => "totalpaycash",
            totalpaytransfer: f64 => "totalpaytransfer",
            totalpaycredit: f64 => "totalpaycredit",
        }
        lines {
            details: Vec<DebtorPaymentTransactionDetail> => "details"
        }
    }
}

pg_row! {
    /// One bill and the amount paid against it.
    pub struct DebtorPaymentTransactionDetail {
        flatten {}
        columns {
            shopid: String => "shopid",
            docno: String => "docno",
            linenumber: i32 => "linenumber",
            billingno: String => "billingno",
            billtype: i16 => "billtype",
            billdate: DateTime<Utc> => "billdate",
            billamount: f64 => "billamount",
            balanceamount: f64 => "balanceamount",
            payamount: f64 => "payamount",
        }
    }
}

same_content_by_eq!(DebtorPaymentTransaction);

impl TransactionRecord for DebtorPaymentTransaction {
    type Line = DebtorPaymentTransactionDetail;

    fn shop_id(&self) -> &str {
        &self.shopid
    }

    fn doc_no(&self) -> &str {
        &self.docno
    }

    fn lines(&self) -> &[DebtorPaymentTransactionDetail] {
        &self.details
    }

    fn set_lines(&mut self, lines: Vec<DebtorPaymentTransactionDetail>) {
        self.details = lines;
    }
}
