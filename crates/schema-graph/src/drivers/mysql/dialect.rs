//! MySQL/MariaDB SQL dialect (Strategy pattern).
//!
//! Provides MySQL-specific identifier quoting, `information_schema` catalog
//! queries and label expressions.

use crate::core::identifier::quote_mysql;
use crate::core::traits::Dialect;

/// MySQL/MariaDB dialect implementation.
///
/// Compatible with MySQL 5.7+, 8.0+, and MariaDB 10.2+.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn quote_ident(&self, name: &str) -> String {
        quote_mysql(name)
    }

    fn tables_query(&self) -> String {
        "SHOW TABLES".to_string()
    }

    fn key_column_usage_query(&self) -> String {
        // CAST to CHAR to handle collation and binary-string differences
        r#"
            SELECT
                CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(REFERENCED_TABLE_NAME AS CHAR(255)) AS REFERENCED_TABLE_NAME,
                CAST(REFERENCED_COLUMN_NAME AS CHAR(255)) AS REFERENCED_COLUMN_NAME
            FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE
            WHERE TABLE_SCHEMA = DATABASE() AND REFERENCED_TABLE_NAME IS NOT NULL
            ORDER BY TABLE_NAME, ORDINAL_POSITION
        "#
        .to_string()
    }

    fn columns_query(&self) -> String {
        r#"
            SELECT
                CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(DATA_TYPE AS CHAR(255)) AS DATA_TYPE,
                CAST(COLUMN_TYPE AS CHAR(1024)) AS COLUMN_TYPE,
                CAST(IS_NULLABLE AS CHAR(3)) AS IS_NULLABLE,
                CAST(COLUMN_DEFAULT AS CHAR) AS COLUMN_DEFAULT,
                CAST(CHARACTER_MAXIMUM_LENGTH AS SIGNED) AS CHARACTER_MAXIMUM_LENGTH,
                CAST(NUMERIC_PRECISION AS SIGNED) AS NUMERIC_PRECISION,
                CAST(NUMERIC_SCALE AS SIGNED) AS NUMERIC_SCALE,
                CAST(COLUMN_COMMENT AS CHAR) AS COLUMN_COMMENT,
                CAST(COLUMN_KEY AS CHAR(3)) AS COLUMN_KEY
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE()
            ORDER BY TABLE_NAME, ORDINAL_POSITION
        "#
        .to_string()
    }

    fn is_boolean_storage(&self, column_type: &str) -> bool {
        // BOOL/BOOLEAN are aliases for tinyint(1); bit(1) is the other common flag encoding
        let column_type = column_type.trim();
        column_type.eq_ignore_ascii_case("tinyint(1)") || column_type.eq_ignore_ascii_case("bit(1)")
    }

    fn label_expression(&self, columns: &[String], width: usize, separator: &str) -> String {
        if columns.is_empty() {
            return "NULL".to_string();
        }

        let parts = columns
            .iter()
            .map(|c| format!("SUBSTRING({}, 1, {})", c, width))
            .collect::<Vec<_>>()
            .join(", ");

        // CONCAT_WS skips NULL arguments, so a missing label part drops out
        format!("CONCAT_WS({}, {})", self.string_literal(separator), parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.quote_ident("name"), "`name`");
        assert_eq!(dialect.quote_ident("table`name"), "`table``name`");
        assert_eq!(dialect.quote_ident("Users"), "`Users`");
    }

    #[test]
    fn test_qualify() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.qualify("t1", "email"), "`t1`.`email`");
    }

    #[test]
    fn test_catalog_queries_filter_active_schema() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.tables_query(), "SHOW TABLES");

        let fk = dialect.key_column_usage_query();
        assert!(fk.contains("KEY_COLUMN_USAGE"));
        assert!(fk.contains("TABLE_SCHEMA = DATABASE()"));
        assert!(fk.contains("REFERENCED_TABLE_NAME IS NOT NULL"));
        assert!(fk.contains("ORDER BY TABLE_NAME, ORDINAL_POSITION"));

        let cols = dialect.columns_query();
        assert!(cols.contains("INFORMATION_SCHEMA.COLUMNS"));
        assert!(cols.contains("TABLE_SCHEMA = DATABASE()"));
        assert!(cols.contains("AS COLUMN_KEY"));
        assert!(cols.contains("ORDER BY TABLE_NAME, ORDINAL_POSITION"));
    }

    #[test]
    fn test_is_boolean_storage() {
        let dialect = MysqlDialect::new();
        assert!(dialect.is_boolean_storage("tinyint(1)"));
        assert!(dialect.is_boolean_storage("TINYINT(1)"));
        assert!(dialect.is_boolean_storage("bit(1)"));
        assert!(!dialect.is_boolean_storage("tinyint(4)"));
        assert!(!dialect.is_boolean_storage("tinyint(1) unsigned"));
        assert!(!dialect.is_boolean_storage("int(11)"));
    }

    #[test]
    fn test_label_expression() {
        let dialect = MysqlDialect::new();
        let sql = dialect.label_expression(
            &["`t1`.`firstname`".to_string(), "`t1`.`lastname`".to_string()],
            25,
            " - ",
        );
        assert_eq!(
            sql,
            "CONCAT_WS(' - ', SUBSTRING(`t1`.`firstname`, 1, 25), SUBSTRING(`t1`.`lastname`, 1, 25))"
        );
    }

    #[test]
    fn test_label_expression_escapes_separator() {
        let dialect = MysqlDialect::new();
        let sql = dialect.label_expression(&["`t1`.`name`".to_string()], 50, "'s ");
        assert!(sql.starts_with("CONCAT_WS('''s ', "));
    }

    #[test]
    fn test_label_expression_empty() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.label_expression(&[], 50, " - "), "NULL");
    }
}
