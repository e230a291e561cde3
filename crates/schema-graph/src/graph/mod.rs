//! Relation graph over foreign keys.
//!
//! The foreign key index answers "what does this table point at"; the
//! relation index is its inverse and answers "who points at this table".
//! [`RelationGraph`] borrows both, plus the column map, and adds
//! many-to-many detection on top.

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::schema::{ColumnMap, ColumnRef, ForeignKeyIndex, RelationIndex, TableColumns};

/// Invert a foreign key index into a relation index.
///
/// Every entry `T.c → R.k` becomes `R → T → c → k`. Referenced tables appear
/// in the order they are first referenced; referencing tables and columns
/// keep foreign key order.
pub fn invert_foreign_keys(foreign_keys: &ForeignKeyIndex) -> RelationIndex {
    let mut relations = RelationIndex::new();
    for (table, columns) in foreign_keys {
        for (column, target) in columns {
            relations
                .entry(target.table.clone())
                .or_default()
                .entry(table.clone())
                .or_default()
                .insert(column.clone(), target.column.clone());
        }
    }
    relations
}

/// One side of a link table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViaColumn {
    /// Foreign key column on the link table.
    pub column: String,
    /// Column the foreign key points at.
    pub references: ColumnRef,
}

/// A many-to-many relation expressed through a link table.
///
/// A link table has exactly two foreign key columns pointing at two
/// different tables, and both columns make up its primary key (or the table
/// has no other columns at all). A table with its own surrogate key and two
/// foreign keys, such as `orders(id, customer_id, shipper_id)`, is an entity
/// and not a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThroughJoin {
    /// The table holding both foreign keys.
    pub link_table: String,
    /// The two foreign key columns, in foreign key order.
    pub via_columns: [ViaColumn; 2],
}

impl ThroughJoin {
    /// Check if `table` is one of the two ends.
    pub fn connects(&self, table: &str) -> bool {
        self.via_columns.iter().any(|v| v.references.table == table)
    }

    /// Get the end opposite `table`, if `table` is one of the ends.
    pub fn other_side(&self, table: &str) -> Option<&ViaColumn> {
        match &self.via_columns {
            [a, b] if a.references.table == table => Some(b),
            [a, b] if b.references.table == table => Some(a),
            _ => None,
        }
    }
}

/// Read-only view over the foreign key and relation indexes.
#[derive(Debug, Clone, Copy)]
pub struct RelationGraph<'a> {
    foreign_keys: &'a ForeignKeyIndex,
    relations: &'a RelationIndex,
    columns: &'a ColumnMap,
}

impl<'a> RelationGraph<'a> {
    /// Create a graph over already built indexes.
    pub fn new(
        foreign_keys: &'a ForeignKeyIndex,
        relations: &'a RelationIndex,
        columns: &'a ColumnMap,
    ) -> Self {
        Self {
            foreign_keys,
            relations,
            columns,
        }
    }

    /// Outgoing foreign keys of `table`: referencing column → referenced column.
    pub fn belongs_to(&self, table: &str) -> Option<&'a IndexMap<String, ColumnRef>> {
        self.foreign_keys.get(table)
    }

    /// Incoming foreign keys of `table`: referencing table → column → referenced column.
    pub fn has_many(&self, table: &str) -> Option<&'a IndexMap<String, IndexMap<String, String>>> {
        self.relations.get(table)
    }

    /// Every link table in the schema.
    pub fn through_joins(&self) -> Vec<ThroughJoin> {
        self.foreign_keys
            .iter()
            .filter_map(|(table, fks)| link_table(table, fks, self.columns.get(table)?))
            .collect()
    }

    /// Link tables with `table` at one end.
    pub fn through_joins_for(&self, table: &str) -> Vec<ThroughJoin> {
        self.through_joins()
            .into_iter()
            .filter(|j| j.connects(table))
            .collect()
    }
}

fn link_table(
    table: &str,
    fks: &IndexMap<String, ColumnRef>,
    columns: &TableColumns,
) -> Option<ThroughJoin> {
    if fks.len() != 2 {
        return None;
    }
    let keyed = fks
        .keys()
        .all(|c| columns.get(c).is_some_and(|col| col.is_primary));
    let bare = columns.keys().all(|c| fks.contains_key(c));
    if !keyed && !bare {
        return None;
    }
    let mut iter = fks.iter().map(|(column, target)| ViaColumn {
        column: column.clone(),
        references: target.clone(),
    });
    let first = iter.next()?;
    let second = iter.next()?;
    if first.references.table == second.references.table {
        return None;
    }
    Some(ThroughJoin {
        link_table: table.to_string(),
        via_columns: [first, second],
    })
}
