//! Sale invoice and sale invoice return records.

use super::names::NameX;
use super::transaction::{TransactionDetail, TransactionHeader};
use super::{header_record, same_content_by_eq, LedgerSource, PartyRef};
use crate::storage::pg_row;

pg_row! {
    /// A sale document. The debtor is the document's customer.
    pub struct SaleTransaction {
        flatten {
            header: TransactionHeader,
        }
        columns {
            ispos: bool => "ispos",
            salecode: String => "salecode",
            salename: String => "salename",
            detaildiscountformula: String => "detaildiscountformula",
            detailtotalamount: f64 => "detailtotalamount",
            totaldiscountvatamount: f64 => "totaldiscountvatamount",
            totaldiscountexceptvatamount: f64 => "totaldiscountexceptvatamount",
            detailtotaldiscount: f64 => "detailtotaldiscount",
            debtorcode: String => "debtorcode",
            debtornames: Vec<NameX> => "debtornames",
            totalpaycash: f64 => "totalpaycash",
            totalpaycredit: f64 => "totalpaycredit",
            totalpaytransfer: f64 => "totalpaytransfer",
        }
        lines {
            items: Vec<TransactionDetail> => "items"
        }
    }
}

header_record!(SaleTransaction, header, lines: TransactionDetail => items);
same_content_by_eq!(SaleTransaction);

impl LedgerSource for SaleTransaction {
    fn header(&self) -> &TransactionHeader {
        &self.header
    }

    fn detail_lines(&self) -> &[TransactionDetail] {
        &self.items
    }

    fn party(&self) -> Option<PartyRef<'_>> {
        Some(PartyRef {
            code: &self.debtorcode,
            names: &self.debtornames,
        })
    }
}
