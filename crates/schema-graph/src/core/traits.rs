//! Core traits for engine-agnostic catalog introspection.
//!
//! - [`CatalogSource`]: Runs metadata queries and returns raw catalog rows
//! - [`Dialect`]: SQL syntax strategy (quoting, catalog queries, label expressions)
//!
//! The introspection session only talks to these two traits, so a new engine
//! needs a dialect and a source and nothing else.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CatalogError, Result};

use super::value::{CatalogRow, CatalogValue};

/// Read metadata rows from a database catalog.
///
/// Implementations execute the query text produced by a [`Dialect`] and
/// return rows keyed by result column name. Statement execution beyond the
/// catalog is out of scope for this trait.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Run a catalog query and return every row.
    async fn fetch(&self, sql: &str) -> Result<Vec<CatalogRow>>;

    /// Run a catalog query and extract a single column from each row.
    ///
    /// The default implementation delegates to [`fetch`](Self::fetch) and
    /// picks the value at `index` in select order. A row without that
    /// column is reported as a query error.
    async fn fetch_column(&self, sql: &str, index: usize) -> Result<Vec<CatalogValue>> {
        let rows = self.fetch(sql).await?;
        rows.into_iter()
            .map(|row| {
                row.get_index(index).cloned().ok_or_else(|| {
                    CatalogError::query(
                        format!("row has no column at index {} ({} columns)", index, row.len()),
                        sql.trim(),
                    )
                })
            })
            .collect()
    }

    /// Get the database type identifier (e.g., "mysql", "memory").
    fn db_type(&self) -> &str;

    /// Release connections held by the source.
    async fn close(&self) {}
}

#[async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for Arc<S> {
    async fn fetch(&self, sql: &str) -> Result<Vec<CatalogRow>> {
        (**self).fetch(sql).await
    }

    async fn fetch_column(&self, sql: &str, index: usize) -> Result<Vec<CatalogValue>> {
        (**self).fetch_column(sql, index).await
    }

    fn db_type(&self) -> &str {
        (**self).db_type()
    }

    async fn close(&self) {
        (**self).close().await
    }
}

/// SQL syntax strategy for a database engine.
///
/// Covers the three places where engines differ for this crate: how
/// identifiers are quoted, where the catalog lives, and how a truncated
/// label string is spelled.
pub trait Dialect: Send + Sync {
    /// Get the dialect name (e.g., "mysql").
    fn name(&self) -> &str;

    /// Quote an identifier (table, column or alias name).
    fn quote_ident(&self, name: &str) -> String;

    /// Dot-qualify a column with a table name or alias.
    fn qualify(&self, qualifier: &str, column: &str) -> String {
        format!("{}.{}", self.quote_ident(qualifier), self.quote_ident(column))
    }

    /// Query listing the tables of the active schema; the table name is
    /// the first result column.
    fn tables_query(&self) -> String;

    /// Query listing every foreign key column of the active schema, ordered
    /// by table then ordinal position.
    ///
    /// Result columns: `TABLE_NAME`, `COLUMN_NAME`, `REFERENCED_TABLE_NAME`,
    /// `REFERENCED_COLUMN_NAME`.
    fn key_column_usage_query(&self) -> String;

    /// Query listing every column of the active schema, ordered by table
    /// then ordinal position.
    ///
    /// Result columns: `TABLE_NAME`, `COLUMN_NAME`, `DATA_TYPE`,
    /// `COLUMN_TYPE`, `IS_NULLABLE`, `COLUMN_DEFAULT`,
    /// `CHARACTER_MAXIMUM_LENGTH`, `NUMERIC_PRECISION`, `NUMERIC_SCALE`,
    /// `COLUMN_COMMENT`, `COLUMN_KEY`.
    fn columns_query(&self) -> String;

    /// Check if a column's full declared type is the engine's boolean encoding.
    fn is_boolean_storage(&self, column_type: &str) -> bool;

    /// Render a label expression joining `columns` with `separator`, each
    /// cut to at most `width` characters.
    fn label_expression(&self, columns: &[String], width: usize, separator: &str) -> String;

    /// Render a string literal.
    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}
