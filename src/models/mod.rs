//! Wire documents and relational records.
//!
//! `document` holds the JSON shape consumed from the document topics. The
//! remaining modules hold the Postgres records phased from it: document
//! headers with their lines, and the derived stock, debtor, creditor and
//! payment ledgers.

use chrono::{DateTime, SubsecRound, Utc};

pub mod creditor;
pub mod debtor;
pub mod debtor_payment;
pub mod document;
pub mod inventory;
pub mod names;
pub mod payment;
pub mod purchase;
pub mod sale;
pub mod stock;
pub mod transaction;

pub use creditor::CreditorTransaction;
pub use debtor::DebtorTransaction;
pub use debtor_payment::{DebtorPaymentTransaction, DebtorPaymentTransactionDetail};
pub use document::{
    DebtorPaymentBill, DebtorPaymentDocument, DocumentDetail, PaymentCreditCard, PaymentDetail,
    PaymentTransfer, TransactionBranch, TransactionDocument,
};
pub use inventory::InventoryTransaction;
pub use names::{default_names, NameX};
pub use payment::{TransactionPayment, TransactionPaymentDetail};
pub use purchase::PurchaseTransaction;
pub use sale::SaleTransaction;
pub use stock::{StockTransaction, StockTransactionDetail};
pub use transaction::{TransactionDetail, TransactionHeader};

/// Content equality used to suppress no-op writes.
///
/// Two records with the same content produce the same stored rows, so an
/// update between them is skipped.
pub trait SameContent {
    fn same_content(&self, other: &Self) -> bool;
}

/// Implement [`SameContent`] as plain `PartialEq`.
macro_rules! same_content_by_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::models::SameContent for $ty {
                fn same_content(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

pub(crate) use same_content_by_eq;

/// Implement `TransactionRecord` for a record embedding a `TransactionHeader`.
macro_rules! header_record {
    ($ty:ty, $header:ident, lines: $line:ty => $items:ident) => {
        impl $crate::storage::TransactionRecord for $ty {
            type Line = $line;

            fn shop_id(&self) -> &str {
                &self.$header.shopid
            }

            fn doc_no(&self) -> &str {
                &self.$header.docno
            }

            fn lines(&self) -> &[Self::Line] {
                &self.$items
            }

            fn set_lines(&mut self, lines: Vec<Self::Line>) {
                self.$items = lines;
            }
        }
    };
}

pub(crate) use header_record;

/// Postgres stores timestamps with microsecond precision.
///
/// Phased timestamps are truncated so a freshly phased record compares equal
/// to the row read back from the database.
pub fn pg_time(t: DateTime<Utc>) -> DateTime<Utc> {
    t.trunc_subsecs(6)
}

/// Debtor or creditor named on a document record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartyRef<'a> {
    pub code: &'a str,
    pub names: &'a [NameX],
}

/// A phased document record that ledgers can be derived from.
pub trait LedgerSource {
    fn header(&self) -> &TransactionHeader;

    fn detail_lines(&self) -> &[TransactionDetail];

    /// The debtor (sales) or creditor (purchases) of the document.
    fn party(&self) -> Option<PartyRef<'_>> {
        None
    }
}
