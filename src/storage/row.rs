//! Row mapping between records and Postgres tables.
//!
//! Records are declared once with [`pg_row!`], which generates the struct,
//! its serde names, its column definitions, bind values and row decoding.
//! Column names double as JSON field names.

use chrono::{DateTime, Utc};
use sea_query::{Alias, ColumnDef, Value};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::models::NameX;

/// A record (or an embedded part of one) that maps onto table columns.
pub trait RowMapping: Sized {
    /// Column definitions, in column order.
    fn column_defs() -> Vec<ColumnDef>;
    /// Column names, in the same order as `column_defs`.
    fn column_names() -> Vec<&'static str>;
    /// Bind values, in the same order as `column_names`.
    fn values(&self) -> Vec<Value>;
    fn from_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error>;
}

/// Records without detail lines use `()` as their line type.
impl RowMapping for () {
    fn column_defs() -> Vec<ColumnDef> {
        Vec::new()
    }

    fn column_names() -> Vec<&'static str> {
        Vec::new()
    }

    fn values(&self) -> Vec<Value> {
        Vec::new()
    }

    fn from_row(_row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(())
    }
}

/// A single column's Postgres type, bind value and decoding.
pub trait ColumnValue: Sized {
    fn column_def(name: &'static str) -> ColumnDef;
    fn to_value(&self) -> Value;
    fn decode(row: &PgRow, name: &str) -> std::result::Result<Self, sqlx::Error>;
}

impl ColumnValue for String {
    fn column_def(name: &'static str) -> ColumnDef {
        ColumnDef::new(Alias::new(name)).text().not_null().to_owned()
    }

    fn to_value(&self) -> Value {
        self.clone().into()
    }

    fn decode(row: &PgRow, name: &str) -> std::result::Result<Self, sqlx::Error> {
        row.try_get(name)
    }
}

impl ColumnValue for i16 {
    fn column_def(name: &'static str) -> ColumnDef {
        ColumnDef::new(Alias::new(name))
            .small_integer()
            .not_null()
            .to_owned()
    }

    fn to_value(&self) -> Value {
        (*self).into()
    }

    fn decode(row: &PgRow, name: &str) -> std::result::Result<Self, sqlx::Error> {
        row.try_get(name)
    }
}

impl ColumnValue for i32 {
    fn column_def(name: &'static str) -> ColumnDef {
        ColumnDef::new(Alias::new(name)).integer().not_null().to_owned()
    }

    fn to_value(&self) -> Value {
        (*self).into()
    }

    fn decode(row: &PgRow, name: &str) -> std::result::Result<Self, sqlx::Error> {
        row.try_get(name)
    }
}

impl ColumnValue for f64 {
    fn column_def(name: &'static str) -> ColumnDef {
        ColumnDef::new(Alias::new(name)).double().not_null().to_owned()
    }

    fn to_value(&self) -> Value {
        (*self).into()
    }

    fn decode(row: &PgRow, name: &str) -> std::result::Result<Self, sqlx::Error> {
        row.try_get(name)
    }
}

impl ColumnValue for bool {
    fn column_def(name: &'static str) -> ColumnDef {
        ColumnDef::new(Alias::new(name)).boolean().not_null().to_owned()
    }

    fn to_value(&self) -> Value {
        (*self).into()
    }

    fn decode(row: &PgRow, name: &str) -> std::result::Result<Self, sqlx::Error> {
        row.try_get(name)
    }
}

impl ColumnValue for DateTime<Utc> {
    fn column_def(name: &'static str) -> ColumnDef {
        ColumnDef::new(Alias::new(name))
            .timestamp_with_time_zone()
            .not_null()
            .to_owned()
    }

    fn to_value(&self) -> Value {
        (*self).into()
    }

    fn decode(row: &PgRow, name: &str) -> std::result::Result<Self, sqlx::Error> {
        row.try_get(name)
    }
}

/// Name arrays are stored as jsonb.
impl ColumnValue for Vec<NameX> {
    fn column_def(name: &'static str) -> ColumnDef {
        ColumnDef::new(Alias::new(name))
            .json_binary()
            .not_null()
            .to_owned()
    }

    fn to_value(&self) -> Value {
        serde_json::to_value(self)
            .unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
            .into()
    }

    fn decode(row: &PgRow, name: &str) -> std::result::Result<Self, sqlx::Error> {
        let names: sqlx::types::Json<Vec<NameX>> = row.try_get(name)?;
        Ok(names.0)
    }
}

/// Declare a record struct together with its row mapping.
///
/// ```ignore
/// pg_row! {
///     pub struct DebtorTransaction {
///         flatten {}
///         columns {
///             shopid: String => "shopid",
///             docno: String => "docno",
///         }
///     }
/// }
/// ```
///
/// `flatten` embeds other `pg_row!` structs (serde-flattened, columns
/// appended first). The optional `lines` field holds detail rows; it is not a
/// column and is loaded separately by the repository.
macro_rules! pg_row {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            flatten { $($efield:ident : $ety:ty),* $(,)? }
            columns {
                $( $(#[$fmeta:meta])* $field:ident : $fty:ty => $col:literal ),* $(,)?
            }
            $( lines { $lfield:ident : $lty:ty => $lcol:literal } )?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[serde(flatten)]
                pub $efield: $ety,
            )*
            $(
                $(#[$fmeta])*
                #[serde(rename = $col)]
                pub $field: $fty,
            )*
            $(
                #[serde(rename = $lcol)]
                pub $lfield: $lty,
            )?
        }

        impl $crate::storage::RowMapping for $name {
            fn column_defs() -> Vec<sea_query::ColumnDef> {
                #[allow(unused_mut)]
                let mut defs = Vec::new();
                $( defs.extend(<$ety as $crate::storage::RowMapping>::column_defs()); )*
                $( defs.push(<$fty as $crate::storage::ColumnValue>::column_def($col)); )*
                defs
            }

            fn column_names() -> Vec<&'static str> {
                #[allow(unused_mut)]
                let mut names = Vec::new();
                $( names.extend(<$ety as $crate::storage::RowMapping>::column_names()); )*
                $( names.push($col); )*
                names
            }

            fn values(&self) -> Vec<sea_query::Value> {
                #[allow(unused_mut)]
                let mut values = Vec::new();
                $( values.extend($crate::storage::RowMapping::values(&self.$efield)); )*
                $( values.push($crate::storage::ColumnValue::to_value(&self.$field)); )*
                values
            }

            fn from_row(
                row: &sqlx::postgres::PgRow,
            ) -> std::result::Result<Self, sqlx::Error> {
                Ok(Self {
                    $( $efield: <$ety as $crate::storage::RowMapping>::from_row(row)?, )*
                    $( $field: <$fty as $crate::storage::ColumnValue>::decode(row, $col)?, )*
                    $( $lfield: <$lty as Default>::default(), )?
                })
            }
        }
    };
}

pub(crate) use pg_row;
