//! Normalization of raw catalog rows into schema metadata.
//!
//! These functions are pure: they take rows already fetched by a
//! [`CatalogSource`](crate::core::CatalogSource) and build the indexes the
//! session caches. Keeping them free of I/O lets the session decide when
//! queries run and lets tests feed rows directly.

use tracing::warn;

use crate::core::schema::{Column, ColumnMap, ColumnRef, ForeignKeyIndex, SemanticType};
use crate::core::traits::Dialect;
use crate::core::value::{CatalogRow, CatalogValue};
use crate::error::{CatalogError, Result};
use crate::typemap::map_type;

/// Get a required text column from a catalog row.
fn required<'a>(row: &'a CatalogRow, column: &str, context: &str) -> Result<&'a str> {
    row.str(column).ok_or_else(|| {
        CatalogError::query(format!("catalog row is missing {}", column), context)
    })
}

/// Get an optional column, treating empty and zero-equivalent values as absent.
fn present<'a>(row: &'a CatalogRow, column: &str) -> Option<&'a CatalogValue> {
    row.get(column).filter(|v| !v.is_blank())
}

/// Build the foreign key index from key column usage rows.
///
/// Rows are expected in table then ordinal order, which the index keeps so
/// composite keys list their columns in declaration order. Rows without a
/// referenced table are not foreign keys and are skipped.
pub fn build_foreign_keys(rows: &[CatalogRow]) -> Result<ForeignKeyIndex> {
    const CONTEXT: &str = "building foreign key index";

    let mut index = ForeignKeyIndex::new();
    for row in rows {
        let Some(referenced_table) = row.str("REFERENCED_TABLE_NAME") else {
            continue;
        };
        let table = required(row, "TABLE_NAME", CONTEXT)?;
        let column = required(row, "COLUMN_NAME", CONTEXT)?;
        let referenced_column = required(row, "REFERENCED_COLUMN_NAME", CONTEXT)?;

        index
            .entry(table.to_string())
            .or_default()
            .insert(
                column.to_string(),
                ColumnRef::new(referenced_table, referenced_column),
            );
    }

    Ok(index)
}

/// Build one column from a columns catalog row.
///
/// The native type goes through [`map_type`]; the dialect's boolean storage
/// check then overrides integer-shaped boolean encodings.
pub fn column_from_row(
    row: &CatalogRow,
    foreign_keys: &ForeignKeyIndex,
    dialect: &dyn Dialect,
) -> Result<Column> {
    const CONTEXT: &str = "building column map";

    let table = required(row, "TABLE_NAME", CONTEXT)?;
    let name = required(row, "COLUMN_NAME", CONTEXT)?;
    let data_type = required(row, "DATA_TYPE", CONTEXT)?;

    let mut semantic_type = map_type(data_type).map_err(|e| {
        warn!("Column {}.{} has unsupported type {}", table, name, data_type);
        e
    })?;
    if row
        .str("COLUMN_TYPE")
        .is_some_and(|t| dialect.is_boolean_storage(t))
    {
        semantic_type = SemanticType::Boolean;
    }

    let key = row.str("COLUMN_KEY").unwrap_or_default();

    Ok(Column {
        table: table.to_string(),
        name: name.to_string(),
        semantic_type,
        nullable: row.str("IS_NULLABLE") == Some("YES"),
        default: present(row, "COLUMN_DEFAULT").and_then(CatalogValue::to_text),
        length: present(row, "CHARACTER_MAXIMUM_LENGTH").and_then(CatalogValue::as_i64),
        precision: present(row, "NUMERIC_PRECISION").and_then(CatalogValue::as_i64),
        scale: present(row, "NUMERIC_SCALE").and_then(CatalogValue::as_i64),
        comment: present(row, "COLUMN_COMMENT").and_then(CatalogValue::to_text),
        is_indexed: !key.is_empty(),
        is_primary: key == "PRI",
        is_unique: key == "UNI",
        reference: foreign_keys
            .get(table)
            .and_then(|cols| cols.get(name))
            .cloned(),
    })
}

/// Build the column map from columns catalog rows.
///
/// Tables and columns keep the order of the rows. An unsupported native
/// type anywhere in the schema fails the whole pass.
pub fn build_columns(
    rows: &[CatalogRow],
    foreign_keys: &ForeignKeyIndex,
    dialect: &dyn Dialect,
) -> Result<ColumnMap> {
    let mut columns = ColumnMap::new();
    for row in rows {
        let column = column_from_row(row, foreign_keys, dialect)?;
        columns
            .entry(column.table.clone())
            .or_default()
            .insert(column.name.clone(), column);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::MysqlDialect;

    fn fk_row(table: &str, column: &str, rt: &str, rc: &str) -> CatalogRow {
        CatalogRow::from_pairs([
            ("TABLE_NAME", table),
            ("COLUMN_NAME", column),
            ("REFERENCED_TABLE_NAME", rt),
            ("REFERENCED_COLUMN_NAME", rc),
        ])
    }

    fn column_row(table: &str, name: &str, data_type: &str, column_type: &str) -> CatalogRow {
        CatalogRow::from_pairs([
            ("TABLE_NAME", CatalogValue::from(table)),
            ("COLUMN_NAME", CatalogValue::from(name)),
            ("DATA_TYPE", CatalogValue::from(data_type)),
            ("COLUMN_TYPE", CatalogValue::from(column_type)),
            ("IS_NULLABLE", CatalogValue::from("YES")),
            ("COLUMN_DEFAULT", CatalogValue::Null),
            ("CHARACTER_MAXIMUM_LENGTH", CatalogValue::Null),
            ("NUMERIC_PRECISION", CatalogValue::Null),
            ("NUMERIC_SCALE", CatalogValue::Null),
            ("COLUMN_COMMENT", CatalogValue::from("")),
            ("COLUMN_KEY", CatalogValue::from("")),
        ])
    }

    #[test]
    fn test_build_foreign_keys_groups_by_table() {
        let rows = vec![
            fk_row("order_items", "order_id", "orders", "id"),
            fk_row("order_items", "product_id", "products", "id"),
            fk_row("orders", "customer_id", "customers", "id"),
        ];
        let index = build_foreign_keys(&rows).unwrap();

        assert_eq!(index.len(), 2);
        let items: Vec<_> = index["order_items"].keys().cloned().collect();
        assert_eq!(items, vec!["order_id", "product_id"]);
        assert_eq!(
            index["orders"]["customer_id"],
            ColumnRef::new("customers", "id")
        );
    }

    #[test]
    fn test_build_foreign_keys_skips_unreferenced_rows() {
        let mut row = fk_row("orders", "id", "x", "y");
        row.insert("REFERENCED_TABLE_NAME", CatalogValue::Null);
        let index = build_foreign_keys(&[row]).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_build_foreign_keys_missing_column_errors() {
        let row = CatalogRow::from_pairs([("REFERENCED_TABLE_NAME", "customers")]);
        let err = build_foreign_keys(&[row]).unwrap_err();
        assert!(matches!(err, CatalogError::CatalogQuery { .. }));
    }

    #[test]
    fn test_column_normalizes_blank_metadata() {
        let mut row = column_row("users", "age", "int", "int(11)");
        row.insert("COLUMN_DEFAULT", "0");
        row.insert("NUMERIC_PRECISION", 10_i64);
        row.insert("NUMERIC_SCALE", 0_i64);
        row.insert("IS_NULLABLE", "NO");

        let col = column_from_row(&row, &ForeignKeyIndex::new(), &MysqlDialect::new()).unwrap();
        assert_eq!(col.semantic_type, SemanticType::Integer);
        assert!(!col.nullable);
        assert_eq!(col.default, None);
        assert_eq!(col.precision, Some(10));
        assert_eq!(col.scale, None);
        assert_eq!(col.comment, None);
        assert_eq!(col.length, None);
    }

    #[test]
    fn test_column_keeps_real_metadata() {
        let mut row = column_row("users", "email", "varchar", "varchar(255)");
        row.insert("CHARACTER_MAXIMUM_LENGTH", 255_i64);
        row.insert("COLUMN_DEFAULT", "nobody@example.com");
        row.insert("COLUMN_COMMENT", "login address");
        row.insert("COLUMN_KEY", "UNI");

        let col = column_from_row(&row, &ForeignKeyIndex::new(), &MysqlDialect::new()).unwrap();
        assert_eq!(col.semantic_type, SemanticType::Text);
        assert_eq!(col.length, Some(255));
        assert_eq!(col.default.as_deref(), Some("nobody@example.com"));
        assert_eq!(col.comment.as_deref(), Some("login address"));
        assert!(col.is_indexed);
        assert!(col.is_unique);
        assert!(!col.is_primary);
    }

    #[test]
    fn test_key_classification() {
        let dialect = MysqlDialect::new();
        let fks = ForeignKeyIndex::new();

        let mut pri = column_row("users", "id", "int", "int(11)");
        pri.insert("COLUMN_KEY", "PRI");
        let col = column_from_row(&pri, &fks, &dialect).unwrap();
        assert!(col.is_primary && col.is_indexed && !col.is_unique);

        let mut mul = column_row("orders", "customer_id", "int", "int(11)");
        mul.insert("COLUMN_KEY", "MUL");
        let col = column_from_row(&mul, &fks, &dialect).unwrap();
        assert!(col.is_indexed && !col.is_primary && !col.is_unique);

        let plain = column_row("orders", "note", "text", "text");
        let col = column_from_row(&plain, &fks, &dialect).unwrap();
        assert!(!col.is_indexed);
    }

    #[test]
    fn test_boolean_override() {
        let dialect = MysqlDialect::new();
        let fks = ForeignKeyIndex::new();

        let flag = column_row("users", "active", "tinyint", "tinyint(1)");
        let col = column_from_row(&flag, &fks, &dialect).unwrap();
        assert_eq!(col.semantic_type, SemanticType::Boolean);

        let small = column_row("users", "rank", "tinyint", "tinyint(4)");
        let col = column_from_row(&small, &fks, &dialect).unwrap();
        assert_eq!(col.semantic_type, SemanticType::Integer);
    }

    #[test]
    fn test_reference_attached() {
        let fks = build_foreign_keys(&[fk_row("orders", "customer_id", "customers", "id")]).unwrap();
        let row = column_row("orders", "customer_id", "int", "int(11)");
        let col = column_from_row(&row, &fks, &MysqlDialect::new()).unwrap();
        assert_eq!(col.reference, Some(ColumnRef::new("customers", "id")));
    }

    #[test]
    fn test_unsupported_type_fails_pass() {
        let rows = vec![
            column_row("places", "id", "int", "int(11)"),
            column_row("places", "shape", "geometry", "geometry"),
        ];
        let err = build_columns(&rows, &ForeignKeyIndex::new(), &MysqlDialect::new()).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedType(t) if t == "geometry"));
    }

    #[test]
    fn test_build_columns_preserves_order() {
        let rows = vec![
            column_row("users", "id", "int", "int(11)"),
            column_row("users", "username", "varchar", "varchar(40)"),
            column_row("users", "email", "varchar", "varchar(255)"),
            column_row("accounts", "id", "int", "int(11)"),
        ];
        let map = build_columns(&rows, &ForeignKeyIndex::new(), &MysqlDialect::new()).unwrap();
        let tables: Vec<_> = map.keys().cloned().collect();
        assert_eq!(tables, vec!["users", "accounts"]);
        let cols: Vec<_> = map["users"].keys().cloned().collect();
        assert_eq!(cols, vec!["id", "username", "email"]);
    }
}
