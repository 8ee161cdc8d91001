//! Stock adjustment, stock balance and stock pickup records.

use super::transaction::{TransactionDetail, TransactionHeader};
use super::{header_record, same_content_by_eq, LedgerSource};
use crate::storage::pg_row;

pg_row! {
    /// An inventory document: header and lines only, no party.
    pub struct InventoryTransaction {
        flatten {
            header: TransactionHeader,
        }
        columns {}
        lines {
            items: Vec<TransactionDetail> => "items"
        }
    }
}

header_record!(InventoryTransaction, header, lines: TransactionDetail => items);
same_content_by_eq!(InventoryTransaction);

impl LedgerSource for InventoryTransaction {
    fn header(&self) -> &TransactionHeader {
        &self.header
    }

    fn detail_lines(&self) -> &[TransactionDetail] {
        &self.items
    }
}
