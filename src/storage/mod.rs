//! Relational persistence for document headers and derived ledgers.
//!
//! This module contains:
//! - `TransactionRecord`: a header row with optional detail lines
//! - `TransactionRepository`: get/create/update/delete keyed by (shop, doc no)
//! - Implementations: PostgreSQL, Mock

use async_trait::async_trait;

use crate::models::SameContent;

pub mod mock;
pub mod postgres;
mod row;

pub use mock::MockTransactionRepository;
pub use postgres::{PostgresTransactionRepository, RecordTables};
pub(crate) use row::pg_row;
pub use row::{ColumnValue, RowMapping};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Record not found: shop={shop_id}, docno={doc_no}")]
    NotFound { shop_id: String, doc_no: String },

    #[error("Record already exists: shop={shop_id}, docno={doc_no}")]
    AlreadyExists { shop_id: String, doc_no: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Query build error: {0}")]
    QueryBuild(#[from] sea_query::error::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A header row keyed by (shop, doc no), optionally owning detail lines.
pub trait TransactionRecord:
    RowMapping + SameContent + Clone + Default + Send + Sync + Unpin + 'static
{
    /// Detail row type; `()` for records without lines.
    type Line: RowMapping + Clone + Send + Sync + Unpin + 'static;

    fn shop_id(&self) -> &str;
    fn doc_no(&self) -> &str;
    fn lines(&self) -> &[Self::Line];
    fn set_lines(&mut self, lines: Vec<Self::Line>);
}

/// Persistence of one record type.
///
/// `create`, `update` and `delete` write the header and its lines atomically.
#[async_trait]
pub trait TransactionRepository<T: TransactionRecord>: Send + Sync {
    async fn get(&self, shop_id: &str, doc_no: &str) -> Result<Option<T>>;

    async fn create(&self, record: &T) -> Result<()>;

    async fn update(&self, shop_id: &str, doc_no: &str, record: &T) -> Result<()>;

    /// Delete lines then header. Returns whether a header row existed.
    async fn delete(&self, shop_id: &str, doc_no: &str) -> Result<bool>;
}
