//! Ledger consumer
//!
//! Kafka consumers that project business documents (sale invoices,
//! purchases, stock movements, payments) into relational transaction tables
//! and the stock, debtor, creditor and payment ledgers derived from them.

pub mod bus;
pub mod config;
pub mod consumer;
pub mod models;
pub mod phaser;
pub mod services;
pub mod storage;
pub mod utils;
