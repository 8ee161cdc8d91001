//! PostgreSQL TransactionRepository implementation.
//!
//! One generic repository serves every record type; the tables it writes to
//! are supplied at construction.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_query::{
    Alias, ColumnDef, Expr, Index, Order, PostgresQueryBuilder, Query, SimpleExpr, Table,
};
use sea_query_binder::SqlxBinder;
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use tracing::{debug, info};

use super::{Result, RowMapping, TransactionRecord, TransactionRepository};

const SHOP_ID: &str = "shopid";
const DOC_NO: &str = "docno";
/// Position of a line within its record. Line numbers sent by clients are
/// not unique, so lines are read back in this order.
const LINE_SEQ: &str = "lineseq";

/// Postgres rejects statements with more bind parameters than this.
const MAX_BIND_PARAMS: usize = 65_535;

/// Rows per multi-row INSERT for a table of `columns` columns.
pub(crate) fn lines_per_insert(columns: usize) -> usize {
    (MAX_BIND_PARAMS / columns.max(1)).max(1)
}

/// Header table and optional detail table of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTables {
    pub header: &'static str,
    pub detail: Option<&'static str>,
}

impl RecordTables {
    pub const STOCK: RecordTables =
        RecordTables::with_detail("stock_transaction", "stock_transaction_detail");
    pub const DEBTOR: RecordTables = RecordTables::header_only("debtor_transaction");
    pub const CREDITOR: RecordTables = RecordTables::header_only("creditor_transaction");
    pub const PAYMENT: RecordTables =
        RecordTables::with_detail("transaction_payment", "transaction_payment_detail");

    pub const fn with_detail(header: &'static str, detail: &'static str) -> Self {
        Self {
            header,
            detail: Some(detail),
        }
    }

    pub const fn header_only(header: &'static str) -> Self {
        Self {
            header,
            detail: None,
        }
    }
}

/// PostgreSQL implementation of TransactionRepository.
pub struct PostgresTransactionRepository<T> {
    pool: PgPool,
    tables: RecordTables,
    _marker: PhantomData<fn() -> T>,
}

impl<T: TransactionRecord> PostgresTransactionRepository<T> {
    pub fn new(pool: PgPool, tables: RecordTables) -> Self {
        Self {
            pool,
            tables,
            _marker: PhantomData,
        }
    }

    pub fn tables(&self) -> RecordTables {
        self.tables
    }

    /// Create the header and detail tables if they do not exist.
    pub async fn init(&self) -> Result<()> {
        let mut create_header = Table::create();
        create_header.table(Alias::new(self.tables.header)).if_not_exists();
        for mut def in T::column_defs() {
            create_header.col(&mut def);
        }
        create_header.primary_key(
            Index::create()
                .col(Alias::new(SHOP_ID))
                .col(Alias::new(DOC_NO)),
        );
        let sql = create_header.to_string(PostgresQueryBuilder);
        sqlx::query(&sql).execute(&self.pool).await?;

        if let Some(detail) = self.tables.detail {
            let mut create_detail = Table::create();
            create_detail.table(Alias::new(detail)).if_not_exists();
            for mut def in <T::Line as RowMapping>::column_defs() {
                create_detail.col(&mut def);
            }
            create_detail.col(ColumnDef::new(Alias::new(LINE_SEQ)).integer().not_null());
            let sql = create_detail.to_string(PostgresQueryBuilder);
            sqlx::query(&sql).execute(&self.pool).await?;

            let idx = Index::create()
                .if_not_exists()
                .name(format!("idx_{}_shop_doc", detail))
                .table(Alias::new(detail))
                .col(Alias::new(SHOP_ID))
                .col(Alias::new(DOC_NO))
                .to_string(PostgresQueryBuilder);
            sqlx::query(&idx).execute(&self.pool).await?;
        }

        info!(table = %self.tables.header, "Transaction table schema initialized");
        Ok(())
    }

    fn key_filter(shop_id: &str, doc_no: &str) -> [SimpleExpr; 2] {
        [
            Expr::col(Alias::new(SHOP_ID)).eq(shop_id),
            Expr::col(Alias::new(DOC_NO)).eq(doc_no),
        ]
    }

    async fn insert_lines(&self, tx: &mut Transaction<'_, Postgres>, record: &T) -> Result<()> {
        let Some(detail) = self.tables.detail else {
            return Ok(());
        };
        let lines = record.lines();
        if lines.is_empty() {
            return Ok(());
        }

        let mut columns = <T::Line as RowMapping>::column_names();
        columns.push(LINE_SEQ);
        let per_insert = lines_per_insert(columns.len());

        for (batch, chunk) in lines.chunks(per_insert).enumerate() {
            let mut stmt = Query::insert();
            stmt.into_table(Alias::new(detail))
                .columns(columns.iter().copied().map(Alias::new));
            for (i, line) in chunk.iter().enumerate() {
                let seq = (batch * per_insert + i) as i32;
                let mut values = line.values();
                values.push(seq.into());
                stmt.values(values.into_iter().map(SimpleExpr::Value))?;
            }

            let (sql, values) = stmt.build_sqlx(PostgresQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut **tx).await?;
        }
        Ok(())
    }

    async fn delete_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop_id: &str,
        doc_no: &str,
    ) -> Result<u64> {
        let Some(detail) = self.tables.detail else {
            return Ok(0);
        };

        let [shop, doc] = Self::key_filter(shop_id, doc_no);
        let (sql, values) = Query::delete()
            .from_table(Alias::new(detail))
            .and_where(shop)
            .and_where(doc)
            .build_sqlx(PostgresQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl<T: TransactionRecord> TransactionRepository<T> for PostgresTransactionRepository<T> {
    async fn get(&self, shop_id: &str, doc_no: &str) -> Result<Option<T>> {
        let [shop, doc] = Self::key_filter(shop_id, doc_no);
        let (sql, values) = Query::select()
            .columns(T::column_names().into_iter().map(Alias::new))
            .from(Alias::new(self.tables.header))
            .and_where(shop)
            .and_where(doc)
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_with(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut record = T::from_row(&row)?;

        if let Some(detail) = self.tables.detail {
            let [shop, doc] = Self::key_filter(shop_id, doc_no);
            let (sql, values) = Query::select()
                .columns(
                    <T::Line as RowMapping>::column_names()
                        .into_iter()
                        .map(Alias::new),
                )
                .from(Alias::new(detail))
                .and_where(shop)
                .and_where(doc)
                .order_by(Alias::new(LINE_SEQ), Order::Asc)
                .build_sqlx(PostgresQueryBuilder);

            let rows = sqlx::query_with(&sql, values).fetch_all(&self.pool).await?;
            let lines = rows
                .iter()
                .map(<T::Line as RowMapping>::from_row)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            record.set_lines(lines);
        }

        Ok(Some(record))
    }

    async fn create(&self, record: &T) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let (sql, values) = Query::insert()
            .into_table(Alias::new(self.tables.header))
            .columns(T::column_names().into_iter().map(Alias::new))
            .values(record.values().into_iter().map(SimpleExpr::Value))?
            .build_sqlx(PostgresQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        self.insert_lines(&mut tx, record).await?;

        tx.commit().await?;

        debug!(
            table = %self.tables.header,
            shop_id = %record.shop_id(),
            doc_no = %record.doc_no(),
            lines = record.lines().len(),
            "Created record"
        );
        Ok(())
    }

    async fn update(&self, shop_id: &str, doc_no: &str, record: &T) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let [shop, doc] = Self::key_filter(shop_id, doc_no);
        let assignments = T::column_names()
            .into_iter()
            .map(Alias::new)
            .zip(record.values().into_iter().map(SimpleExpr::Value));
        let (sql, values) = Query::update()
            .table(Alias::new(self.tables.header))
            .values(assignments)
            .and_where(shop)
            .and_where(doc)
            .build_sqlx(PostgresQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        // Lines are replaced wholesale.
        self.delete_lines(&mut tx, shop_id, doc_no).await?;
        self.insert_lines(&mut tx, record).await?;

        tx.commit().await?;

        debug!(
            table = %self.tables.header,
            shop_id = %shop_id,
            doc_no = %doc_no,
            "Updated record"
        );
        Ok(())
    }

    async fn delete(&self, shop_id: &str, doc_no: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let lines = self.delete_lines(&mut tx, shop_id, doc_no).await?;

        let [shop, doc] = Self::key_filter(shop_id, doc_no);
        let (sql, values) = Query::delete()
            .from_table(Alias::new(self.tables.header))
            .and_where(shop)
            .and_where(doc)
            .build_sqlx(PostgresQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        debug!(
            table = %self.tables.header,
            shop_id = %shop_id,
            doc_no = %doc_no,
            lines,
            "Deleted record"
        );
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StockTransactionDetail, TransactionDetail};

    #[test]
    fn test_lines_per_insert_stays_under_bind_limit() {
        for columns in [
            TransactionDetail::column_names().len() + 1,
            StockTransactionDetail::column_names().len() + 1,
        ] {
            let rows = lines_per_insert(columns);
            assert!(rows * columns <= MAX_BIND_PARAMS);
            assert!((rows + 1) * columns > MAX_BIND_PARAMS);
        }
    }

    #[test]
    fn test_lines_per_insert_without_columns() {
        assert_eq!(lines_per_insert(0), MAX_BIND_PARAMS);
        assert_eq!(lines_per_insert(70_000), 1);
    }
}
