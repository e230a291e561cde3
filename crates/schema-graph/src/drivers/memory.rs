//! In-memory catalog source.
//!
//! [`MemoryCatalog`] answers catalog queries from canned rows registered up
//! front and records how many times each query ran. It is the source used in
//! tests, and it lets callers introspect a catalog captured elsewhere without
//! a live connection.
//!
//! ```rust,ignore
//! let catalog = MemoryCatalog::new(MysqlDialect::new())
//!     .with_column(ColumnDef::new("customers", "id", "int(11)").key("PRI"))
//!     .with_column(ColumnDef::new("customers", "name", "varchar(100)"))
//!     .with_column(ColumnDef::new("orders", "customer_id", "int(11)").key("MUL"))
//!     .with_foreign_key("orders", "customer_id", "customers", "id");
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::traits::{CatalogSource, Dialect};
use crate::core::value::{CatalogRow, CatalogValue};
use crate::error::{CatalogError, Result};

/// Collapse whitespace so registered and issued query text compare equal.
fn normalize_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Catalog source backed by registered query results.
pub struct MemoryCatalog {
    dialect: Arc<dyn Dialect>,
    database: String,
    tables: Vec<String>,
    results: HashMap<String, Vec<CatalogRow>>,
    failures: HashMap<String, String>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MemoryCatalog {
    /// Create an empty catalog answering the given dialect's catalog queries.
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        let dialect: Arc<dyn Dialect> = Arc::new(dialect);
        let mut results = HashMap::new();
        results.insert(normalize_sql(&dialect.tables_query()), Vec::new());
        results.insert(normalize_sql(&dialect.key_column_usage_query()), Vec::new());
        results.insert(normalize_sql(&dialect.columns_query()), Vec::new());

        Self {
            dialect,
            database: "memory".to_string(),
            tables: Vec::new(),
            results,
            failures: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Set the database name reported in the `SHOW TABLES` column header.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self.rebuild_tables();
        self
    }

    /// Register rows for an arbitrary query.
    pub fn with_result(mut self, sql: &str, rows: Vec<CatalogRow>) -> Self {
        self.results.insert(normalize_sql(sql), rows);
        self
    }

    /// Make a query fail with a catalog error.
    pub fn with_failure(mut self, sql: &str, message: impl Into<String>) -> Self {
        self.failures.insert(normalize_sql(sql), message.into());
        self
    }

    /// Add a table to the table listing.
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.add_table(name.into());
        self
    }

    /// Add a column row. Its table is listed if it was not already.
    ///
    /// Rows are returned in the order they were added, so add them grouped
    /// by table and in ordinal position.
    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.add_table(column.table.clone());
        let key = normalize_sql(&self.dialect.columns_query());
        self.results.entry(key).or_default().push(column.into_row());
        self
    }

    /// Add a foreign key column row.
    pub fn with_foreign_key(
        mut self,
        table: &str,
        column: &str,
        referenced_table: &str,
        referenced_column: &str,
    ) -> Self {
        let key = normalize_sql(&self.dialect.key_column_usage_query());
        self.results
            .entry(key)
            .or_default()
            .push(CatalogRow::from_pairs([
                ("TABLE_NAME", table),
                ("COLUMN_NAME", column),
                ("REFERENCED_TABLE_NAME", referenced_table),
                ("REFERENCED_COLUMN_NAME", referenced_column),
            ]));
        self
    }

    /// Number of times a query has run.
    pub fn query_count(&self, sql: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(&normalize_sql(sql)).copied().unwrap_or(0)
    }

    /// Number of queries run in total.
    pub fn total_queries(&self) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.values().sum()
    }

    fn add_table(&mut self, name: String) {
        if !self.tables.contains(&name) {
            self.tables.push(name);
            self.rebuild_tables();
        }
    }

    fn rebuild_tables(&mut self) {
        let header = format!("Tables_in_{}", self.database);
        let rows = self
            .tables
            .iter()
            .map(|t| CatalogRow::from_pairs([(header.as_str(), t.as_str())]))
            .collect();
        self.results
            .insert(normalize_sql(&self.dialect.tables_query()), rows);
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn fetch(&self, sql: &str) -> Result<Vec<CatalogRow>> {
        let key = normalize_sql(sql);
        {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            *calls.entry(key.clone()).or_insert(0) += 1;
        }

        if let Some(message) = self.failures.get(&key) {
            return Err(CatalogError::query(message, key));
        }

        self.results
            .get(&key)
            .cloned()
            .ok_or_else(|| CatalogError::query("no result registered for query", key))
    }

    fn db_type(&self) -> &str {
        "memory"
    }
}

/// Catalog query results captured from a live source.
///
/// Serialized as JSON, a capture lets the whole introspection pipeline run
/// later against a [`MemoryCatalog`] without a database connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedCatalog {
    /// Database the capture was taken from.
    pub database: String,
    /// Table listing.
    pub tables: Vec<String>,
    /// Key column usage rows.
    pub key_column_usage: Vec<CatalogRow>,
    /// Columns rows.
    pub columns: Vec<CatalogRow>,
}

impl CapturedCatalog {
    /// Run the dialect's catalog queries against `source` and keep the rows.
    pub async fn capture<S: CatalogSource + ?Sized>(
        source: &S,
        dialect: &dyn Dialect,
        database: impl Into<String>,
    ) -> Result<Self> {
        let tables = source
            .fetch_column(&dialect.tables_query(), 0)
            .await?
            .iter()
            .filter_map(CatalogValue::to_text)
            .collect();
        let key_column_usage = source.fetch(&dialect.key_column_usage_query()).await?;
        let columns = source.fetch(&dialect.columns_query()).await?;

        Ok(Self {
            database: database.into(),
            tables,
            key_column_usage,
            columns,
        })
    }

    /// Load a capture from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Serialize the capture as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl MemoryCatalog {
    /// Create a catalog answering with previously captured rows.
    pub fn from_captured(dialect: impl Dialect + 'static, captured: CapturedCatalog) -> Self {
        let mut catalog = Self::new(dialect).with_database(captured.database);
        for table in captured.tables {
            catalog.add_table(table);
        }
        let fk_key = normalize_sql(&catalog.dialect.key_column_usage_query());
        catalog.results.insert(fk_key, captured.key_column_usage);
        let columns_key = normalize_sql(&catalog.dialect.columns_query());
        catalog.results.insert(columns_key, captured.columns);
        catalog
    }
}

/// Column row definition for [`MemoryCatalog`].
///
/// Mirrors a row of the columns catalog query. The bare data type is derived
/// from the full column type (`varchar(255)` → `varchar`).
#[derive(Debug, Clone)]
pub struct ColumnDef {
    table: String,
    name: String,
    data_type: String,
    column_type: String,
    nullable: bool,
    default: Option<String>,
    length: Option<i64>,
    precision: Option<i64>,
    scale: Option<i64>,
    comment: String,
    key: String,
}

impl ColumnDef {
    /// Create a nullable column with no key, default or comment.
    ///
    /// A parenthesized width on a character type (`varchar(120)`) becomes
    /// the declared length.
    pub fn new(table: &str, name: &str, column_type: &str) -> Self {
        let data_type = column_type
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let width = column_type
            .split_once('(')
            .and_then(|(_, rest)| rest.split(|c: char| c == ')' || c == ',').next())
            .and_then(|w| w.trim().parse::<i64>().ok());
        let length = match data_type.as_str() {
            "char" | "varchar" => width,
            "tinytext" => Some(255),
            "text" | "blob" => Some(65_535),
            "mediumtext" => Some(16_777_215),
            "longtext" => Some(4_294_967_295),
            _ => None,
        };

        Self {
            table: table.to_string(),
            name: name.to_string(),
            data_type,
            column_type: column_type.to_string(),
            nullable: true,
            default: None,
            length,
            precision: None,
            scale: None,
            comment: String::new(),
            key: String::new(),
        }
    }

    /// Set the key classification (`PRI`, `UNI`, `MUL`).
    pub fn key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// Mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set the default value expression.
    pub fn default_value(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Override the declared character length.
    pub fn length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    /// Set numeric precision and scale.
    pub fn numeric(mut self, precision: i64, scale: i64) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Set the column comment.
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    fn into_row(self) -> CatalogRow {
        CatalogRow::from_pairs([
            ("TABLE_NAME", CatalogValue::from(self.table)),
            ("COLUMN_NAME", CatalogValue::from(self.name)),
            ("DATA_TYPE", CatalogValue::from(self.data_type)),
            ("COLUMN_TYPE", CatalogValue::from(self.column_type)),
            (
                "IS_NULLABLE",
                CatalogValue::from(if self.nullable { "YES" } else { "NO" }),
            ),
            ("COLUMN_DEFAULT", CatalogValue::from(self.default)),
            ("CHARACTER_MAXIMUM_LENGTH", CatalogValue::from(self.length)),
            ("NUMERIC_PRECISION", CatalogValue::from(self.precision)),
            ("NUMERIC_SCALE", CatalogValue::from(self.scale)),
            ("COLUMN_COMMENT", CatalogValue::from(self.comment)),
            ("COLUMN_KEY", CatalogValue::from(self.key)),
        ])
    }
}
