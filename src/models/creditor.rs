//! Creditor (accounts payable) ledger rows.

use chrono::{DateTime, Utc};

use super::names::NameX;
use super::same_content_by_eq;
use crate::storage::{pg_row, TransactionRecord};

pg_row! {
    /// Amount owed to a supplier for one credit purchase document.
    pub struct CreditorTransaction {
        flatten {}
        columns {
            guidfixed: String => "guidfixed",
            shopid: String => "shopid",
            docno: String => "docno",
            docdate: DateTime<Utc> => "docdate",
            transflag: i16 => "transflag",
            inquirytype: i32 => "inquirytype",
            branchcode: String => "branchcode",
            branchnames: Vec<NameX> => "branchnames",
            creditorcode: String => "creditorcode",
            creditornames: Vec<NameX> => "creditornames",
            description: String => "description",
            iscancel: bool => "iscancel",
            status: i16 => "status",
            totalvalue: f64 => "totalvalue",
            totalbeforevat: f64 => "totalbeforevat",
            totalvatvalue: f64 => "totalvatvalue",
            totalexceptvat: f64 => "totalexceptvat",
            totalaftervat: f64 => "totalaftervat",
            totalamount: f64 => "totalamount",
            balanceamount: f64 => "balanceamount",
            paidamount: f64 => "paidamount",
        }
    }
}

same_content_by_eq!(CreditorTransaction);

impl TransactionRecord for CreditorTransaction {
    type Line = ();

    fn shop_id(&self) -> &str {
        &self.shopid
    }

    fn doc_no(&self) -> &str {
        &self.docno
    }

    fn lines(&self) -> &[()] {
        &[]
    }

    fn set_lines(&mut self, _lines: Vec<()>) {}
}
