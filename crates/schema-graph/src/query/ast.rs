//! Minimal SELECT statement tree rendered through a [`Dialect`].
//!
//! Only the shapes display SQL needs are modeled: a star projection, label
//! projections and left joins on a single column pair.

use crate::core::traits::Dialect;

/// A projected expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `qualifier.*`
    AllColumns {
        /// Table or alias whose columns are selected.
        qualifier: String,
    },
    /// A truncated, separator-joined label.
    Label(LabelProjection),
}

/// Label built from the name columns of a joined table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelProjection {
    /// Already qualified and quoted column references.
    pub columns: Vec<String>,
    /// Characters kept from each column.
    pub width: usize,
    /// Text placed between columns.
    pub separator: String,
    /// Output column name.
    pub alias: String,
}

impl LabelProjection {
    /// Build a label that shares `total_width` characters evenly across columns.
    ///
    /// Each column keeps at least one character.
    pub fn new(
        columns: Vec<String>,
        total_width: usize,
        separator: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        let width = match columns.len() {
            0 => total_width,
            n => (total_width / n).max(1),
        };
        Self {
            columns,
            width,
            separator: separator.into(),
            alias: alias.into(),
        }
    }
}

/// `LEFT JOIN table alias ON alias.column = source.source_column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub alias: String,
    pub column: String,
    pub source: String,
    pub source_column: String,
}

/// A SELECT over one table with optional left joins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub from: String,
    pub projections: Vec<Projection>,
    pub joins: Vec<Join>,
}

impl SelectStatement {
    /// Start a statement over `from` with no projections.
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            projections: Vec::new(),
            joins: Vec::new(),
        }
    }

    /// Render the statement as one line of SQL.
    pub fn render(&self, dialect: &dyn Dialect) -> String {
        let projections = if self.projections.is_empty() {
            "*".to_string()
        } else {
            self.projections
                .iter()
                .map(|p| render_projection(p, dialect))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!(
            "SELECT {} FROM {}",
            projections,
            dialect.quote_ident(&self.from)
        );
        for join in &self.joins {
            sql.push_str(&format!(
                " LEFT JOIN {} {} ON {} = {}",
                dialect.quote_ident(&join.table),
                dialect.quote_ident(&join.alias),
                dialect.qualify(&join.alias, &join.column),
                dialect.qualify(&join.source, &join.source_column),
            ));
        }
        sql
    }
}

fn render_projection(projection: &Projection, dialect: &dyn Dialect) -> String {
    match projection {
        Projection::AllColumns { qualifier } => format!("{}.*", dialect.quote_ident(qualifier)),
        Projection::Label(label) => format!(
            "{} AS {}",
            dialect.label_expression(&label.columns, label.width, &label.separator),
            dialect.quote_ident(&label.alias)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::MysqlDialect;

    #[test]
    fn test_label_width_shared() {
        let label = LabelProjection::new(vec!["a".into(), "b".into(), "c".into()], 50, " - ", "x");
        assert_eq!(label.width, 16);
    }

    #[test]
    fn test_label_width_floor_of_one() {
        let cols = vec!["a".to_string(); 4];
        assert_eq!(LabelProjection::new(cols, 3, " - ", "x").width, 1);
    }

    #[test]
    fn test_render_bare_statement() {
        let stmt = SelectStatement::new("orders");
        assert_eq!(stmt.render(&MysqlDialect::new()), "SELECT * FROM `orders`");
    }

    #[test]
    fn test_render_join_and_label() {
        let dialect = MysqlDialect::new();
        let mut stmt = SelectStatement::new("orders");
        stmt.projections.push(Projection::AllColumns {
            qualifier: "orders".into(),
        });
        stmt.projections.push(Projection::Label(LabelProjection::new(
            vec![dialect.qualify("t1", "name")],
            50,
            " - ",
            "customer_id_TEXT",
        )));
        stmt.joins.push(Join {
            table: "customers".into(),
            alias: "t1".into(),
            column: "id".into(),
            source: "orders".into(),
            source_column: "customer_id".into(),
        });

        assert_eq!(
            stmt.render(&dialect),
            "SELECT `orders`.*, CONCAT_WS(' - ', SUBSTRING(`t1`.`name`, 1, 50)) AS `customer_id_TEXT` \
             FROM `orders` LEFT JOIN `customers` `t1` ON `t1`.`id` = `orders`.`customer_id`"
        );
    }

    #[test]
    fn test_render_empty_label() {
        let dialect = MysqlDialect::new();
        let mut stmt = SelectStatement::new("orders");
        stmt.projections.push(Projection::Label(LabelProjection::new(
            Vec::new(),
            50,
            " - ",
            "tag_id_TEXT",
        )));
        assert_eq!(
            stmt.render(&dialect),
            "SELECT NULL AS `tag_id_TEXT` FROM `orders`"
        );
    }
}
