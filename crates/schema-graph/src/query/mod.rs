//! Display SQL synthesis.
//!
//! Builds a SELECT that returns every column of a table plus, for each of
//! its foreign keys, a `<column>_TEXT` label made from the name columns of
//! the referenced table. The label lets a UI show "Ada Lovelace" instead of
//! `customer_id = 17`.

pub mod ast;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::identifier::validate_identifier;
use crate::core::schema::{ColumnMap, ForeignKeyIndex};
use crate::core::traits::Dialect;
use crate::error::Result;
use crate::naming;

pub use ast::{Join, LabelProjection, Projection, SelectStatement};

/// Message reported for a table that is not in the catalog.
pub const INVALID_TABLE: &str = "Invalid Table";

/// Suffix appended to a foreign key column to name its label.
pub const LABEL_SUFFIX: &str = "_TEXT";

/// Options for display SQL synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Referenced tables that are never joined.
    pub excluded_tables: Vec<String>,
    /// Characters shared by the label columns of one foreign key.
    pub label_width: usize,
    /// Text placed between label columns.
    pub separator: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            excluded_tables: Vec::new(),
            label_width: 50,
            separator: " - ".to_string(),
        }
    }
}

impl SynthesisOptions {
    /// Exclude `tables` from joining.
    pub fn excluding<I, T>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.excluded_tables.extend(tables.into_iter().map(Into::into));
        self
    }

    /// Check if `table` must not be joined.
    pub fn excludes(&self, table: &str) -> bool {
        self.excluded_tables.iter().any(|t| t == table)
    }
}

/// Outcome of display SQL synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordQuery {
    /// The synthesized statement.
    Statement(String),
    /// The requested table has no columns in the catalog.
    InvalidTable {
        /// Table that was asked for.
        table: String,
    },
}

impl RecordQuery {
    /// Get the SQL text, if synthesis succeeded.
    pub fn sql(&self) -> Option<&str> {
        match self {
            RecordQuery::Statement(sql) => Some(sql),
            RecordQuery::InvalidTable { .. } => None,
        }
    }

    /// Get the error message, if the table was invalid.
    pub fn error(&self) -> Option<&'static str> {
        match self {
            RecordQuery::Statement(_) => None,
            RecordQuery::InvalidTable { .. } => Some(INVALID_TABLE),
        }
    }

    /// Check if the table was invalid.
    pub fn is_invalid(&self) -> bool {
        matches!(self, RecordQuery::InvalidTable { .. })
    }
}

/// Build the statement for `table` without rendering it.
///
/// Returns `None` when the table has no columns in `columns`. Joins get the
/// aliases `t1`, `t2`, ... in foreign key order; excluded tables are skipped
/// without consuming an alias.
pub fn belongs_statement(
    table: &str,
    columns: &ColumnMap,
    foreign_keys: &ForeignKeyIndex,
    options: &SynthesisOptions,
    dialect: &dyn Dialect,
) -> Result<Option<SelectStatement>> {
    if columns.get(table).map_or(true, |c| c.is_empty()) {
        return Ok(None);
    }
    validate_identifier(table)?;

    let mut stmt = SelectStatement::new(table);
    stmt.projections.push(Projection::AllColumns {
        qualifier: table.to_string(),
    });

    let Some(outgoing) = foreign_keys.get(table) else {
        return Ok(Some(stmt));
    };

    for (column, target) in outgoing {
        if options.excludes(&target.table) {
            debug!("Skipping join {}.{} -> {} (excluded)", table, column, target.table);
            continue;
        }

        let alias = format!("t{}", stmt.joins.len() + 1);
        let labels = match columns.get(&target.table) {
            Some(target_columns) => naming::name_columns(target_columns, &alias, dialect),
            None => Default::default(),
        };
        if labels.is_empty() {
            warn!(
                "No name columns for {} (referenced by {}.{}), label will be NULL",
                target.table, table, column
            );
        }

        stmt.projections.push(Projection::Label(LabelProjection::new(
            labels.into_values().collect(),
            options.label_width,
            options.separator.clone(),
            format!("{}{}", column, LABEL_SUFFIX),
        )));
        stmt.joins.push(Join {
            table: target.table.clone(),
            alias,
            column: target.column.clone(),
            source: table.to_string(),
            source_column: column.clone(),
        });
    }

    Ok(Some(stmt))
}

/// Synthesize display SQL for `table`.
///
/// A table missing from the catalog yields [`RecordQuery::InvalidTable`]
/// rather than an error; errors are reserved for unusable identifiers.
pub fn load_record_with_belongs(
    table: &str,
    columns: &ColumnMap,
    foreign_keys: &ForeignKeyIndex,
    options: &SynthesisOptions,
    dialect: &dyn Dialect,
) -> Result<RecordQuery> {
    let query = match belongs_statement(table, columns, foreign_keys, options, dialect)? {
        Some(stmt) => RecordQuery::Statement(stmt.render(dialect)),
        None => {
            debug!("No columns for table {}, reporting invalid table", table);
            RecordQuery::InvalidTable {
                table: table.to_string(),
            }
        }
    };
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, ColumnRef, SemanticType, TableColumns};
    use crate::drivers::MysqlDialect;

    fn cols(table: &str, defs: &[(&str, SemanticType)]) -> TableColumns {
        defs.iter()
            .map(|(name, ty)| (name.to_string(), Column::new(table, *name, *ty)))
            .collect()
    }

    fn shop() -> (ColumnMap, ForeignKeyIndex) {
        use SemanticType::*;

        let mut columns = ColumnMap::new();
        columns.insert(
            "customers".into(),
            cols("customers", &[("id", Integer), ("name", Text), ("email", Text)]),
        );
        columns.insert(
            "shippers".into(),
            cols("shippers", &[("id", Integer), ("company", Text)]),
        );
        columns.insert(
            "orders".into(),
            cols(
                "orders",
                &[("id", Integer), ("customer_id", Integer), ("shipper_id", Integer)],
            ),
        );

        let mut fks = ForeignKeyIndex::new();
        let orders = fks.entry("orders".to_string()).or_default();
        orders.insert("customer_id".into(), ColumnRef::new("customers", "id"));
        orders.insert("shipper_id".into(), ColumnRef::new("shippers", "id"));

        (columns, fks)
    }

    #[test]
    fn test_single_join() {
        let (columns, fks) = shop();
        let options = SynthesisOptions::default().excluding(["shippers"]);
        let query =
            load_record_with_belongs("orders", &columns, &fks, &options, &MysqlDialect::new())
                .unwrap();

        assert_eq!(
            query.sql().unwrap(),
            "SELECT `orders`.*, \
             CONCAT_WS(' - ', SUBSTRING(`t1`.`email`, 1, 25), SUBSTRING(`t1`.`name`, 1, 25)) AS `customer_id_TEXT` \
             FROM `orders` LEFT JOIN `customers` `t1` ON `t1`.`id` = `orders`.`customer_id`"
        );
    }

    #[test]
    fn test_aliases_follow_foreign_key_order() {
        let (columns, fks) = shop();
        let query = load_record_with_belongs(
            "orders",
            &columns,
            &fks,
            &SynthesisOptions::default(),
            &MysqlDialect::new(),
        )
        .unwrap();
        let sql = query.sql().unwrap();

        assert!(sql.contains("LEFT JOIN `customers` `t1` ON `t1`.`id` = `orders`.`customer_id`"));
        assert!(sql.contains("LEFT JOIN `shippers` `t2` ON `t2`.`id` = `orders`.`shipper_id`"));
        assert!(sql.contains("SUBSTRING(`t2`.`company`, 1, 50)) AS `shipper_id_TEXT`"));
    }

    #[test]
    fn test_excluding_every_target_leaves_plain_select() {
        let (columns, fks) = shop();
        let options = SynthesisOptions::default().excluding(["customers", "shippers"]);
        let query =
            load_record_with_belongs("orders", &columns, &fks, &options, &MysqlDialect::new())
                .unwrap();
        assert_eq!(query.sql().unwrap(), "SELECT `orders`.* FROM `orders`");
    }

    #[test]
    fn test_excluded_table_does_not_consume_alias() {
        let (columns, fks) = shop();
        let options = SynthesisOptions::default().excluding(["customers"]);
        let query =
            load_record_with_belongs("orders", &columns, &fks, &options, &MysqlDialect::new())
                .unwrap();
        let sql = query.sql().unwrap();
        assert!(sql.contains("LEFT JOIN `shippers` `t1`"));
        assert!(!sql.contains("`t2`"));
        assert!(!sql.contains("customers"));
    }

    #[test]
    fn test_table_without_foreign_keys() {
        let (columns, fks) = shop();
        let query = load_record_with_belongs(
            "customers",
            &columns,
            &fks,
            &SynthesisOptions::default(),
            &MysqlDialect::new(),
        )
        .unwrap();
        assert_eq!(query.sql().unwrap(), "SELECT `customers`.* FROM `customers`");
    }

    #[test]
    fn test_unknown_table_is_invalid() {
        let (columns, fks) = shop();
        let query = load_record_with_belongs(
            "nonexistent",
            &columns,
            &fks,
            &SynthesisOptions::default(),
            &MysqlDialect::new(),
        )
        .unwrap();
        assert!(query.is_invalid());
        assert_eq!(query.error(), Some(INVALID_TABLE));
        assert_eq!(query.sql(), None);
    }

    #[test]
    fn test_missing_target_columns_render_null_label() {
        let (mut columns, fks) = shop();
        columns.shift_remove("shippers");
        let options = SynthesisOptions::default().excluding(["customers"]);
        let query =
            load_record_with_belongs("orders", &columns, &fks, &options, &MysqlDialect::new())
                .unwrap();
        assert_eq!(
            query.sql().unwrap(),
            "SELECT `orders`.*, NULL AS `shipper_id_TEXT` \
             FROM `orders` LEFT JOIN `shippers` `t1` ON `t1`.`id` = `orders`.`shipper_id`"
        );
    }

    #[test]
    fn test_custom_width_and_separator() {
        let (columns, fks) = shop();
        let options = SynthesisOptions {
            excluded_tables: vec!["shippers".into()],
            label_width: 21,
            separator: ", ".into(),
        };
        let query =
            load_record_with_belongs("orders", &columns, &fks, &options, &MysqlDialect::new())
                .unwrap();
        assert!(query
            .sql()
            .unwrap()
            .contains("CONCAT_WS(', ', SUBSTRING(`t1`.`email`, 1, 10), SUBSTRING(`t1`.`name`, 1, 10))"));
    }

    #[test]
    fn test_record_query_serializes() {
        let invalid = RecordQuery::InvalidTable {
            table: "nope".into(),
        };
        let json = serde_json::to_value(&invalid).unwrap();
        assert_eq!(json["invalid_table"]["table"], "nope");
    }
}
