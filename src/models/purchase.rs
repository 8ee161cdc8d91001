//! Purchase and purchase return records.

use super::names::NameX;
use super::transaction::{TransactionDetail, TransactionHeader};
use super::{header_record, same_content_by_eq, LedgerSource, PartyRef};
use crate::storage::pg_row;

pg_row! {
    /// A purchase document. The creditor is the document's supplier.
    pub struct PurchaseTransaction {
        flatten {
            header: TransactionHeader,
        }
        columns {
            creditorcode: String => "creditorcode",
            creditornames: Vec<NameX> => "creditornames",
            totalpaycash: f64 => "totalpaycash",
            totalpaycredit: f64 => "totalpaycredit",
            totalpaytransfer: f64 => "totalpaytransfer",
        }
        lines {
            items: Vec<TransactionDetail> => "items"
        }
    }
}

header_record!(PurchaseTransaction, header, lines: TransactionDetail => items);
same_content_by_eq!(PurchaseTransaction);

impl LedgerSource for PurchaseTransaction {
    fn header(&self) -> &TransactionHeader {
        &self.header
    }

    fn detail_lines(&self) -> &[TransactionDetail] {
        &self.items
    }

    fn party(&self) -> Option<PartyRef<'_>> {
        Some(PartyRef {
            code: &self.creditorcode,
            names: &self.creditornames,
        })
    }
}
