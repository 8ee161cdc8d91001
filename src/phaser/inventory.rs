use crate::models::{InventoryTransaction, TransactionDocument};

use super::{phase_details, phase_header, Result, TransactionPhaser};

/// Phases the stock documents: adjustments, balances, pickups, receipts,
/// returns and transfers.
///
/// These documents keep the `transflag` they were issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryTransactionPhaser {
    doc_name: &'static str,
}

impl InventoryTransactionPhaser {
    pub const fn stock_adjustment() -> Self {
        Self {
            doc_name: "Stock Adjustment",
        }
    }

    pub const fn stock_balance() -> Self {
        Self {
            doc_name: "Stock Balance",
        }
    }

    pub const fn stock_pickup() -> Self {
        Self {
            doc_name: "Stock Pickup",
        }
    }

    pub const fn stock_receive() -> Self {
        Self {
            doc_name: "Stock Receive",
        }
    }

    pub const fn stock_return() -> Self {
        Self {
            doc_name: "Stock Return",
        }
    }

    pub const fn stock_transfer() -> Self {
        Self {
            doc_name: "Stock Transfer",
        }
    }
}

impl TransactionPhaser for InventoryTransactionPhaser {
    type Record = InventoryTransaction;

    fn doc_name(&self) -> &'static str {
        self.doc_name
    }

    fn phase_doc(&self, doc: &TransactionDocument) -> Result<InventoryTransaction> {
        let items = phase_details(self.doc_name, doc)?;

        Ok(InventoryTransaction {
            header: phase_header(doc, doc.transflag),
            items,
        })
    }
}
