//! Consumer services: upsert and delete of phased records.

mod transaction;

pub use transaction::{TransactionConsumerService, UpsertOutcome};
