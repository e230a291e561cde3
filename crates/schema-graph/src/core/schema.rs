//! Schema metadata types for introspected tables, columns and foreign keys.
//!
//! All mappings are [`IndexMap`]s so catalog order survives: the name column
//! heuristics pick "the first N text columns" and must see columns in the
//! order the catalog declared them.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Whole numbers (int, bigint, bit, ...).
    Integer,
    /// Fractional numbers (decimal, float, double, ...).
    Decimal,
    /// Engine-specific boolean storage.
    Boolean,
    /// Dates, times and timestamps.
    Datetime,
    /// Character and blob data.
    Text,
}

impl SemanticType {
    /// Lowercase name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Integer => "integer",
            SemanticType::Decimal => "decimal",
            SemanticType::Boolean => "boolean",
            SemanticType::Datetime => "datetime",
            SemanticType::Text => "text",
        }
    }

    /// Check if the type is textual.
    pub fn is_text(&self) -> bool {
        matches!(self, SemanticType::Text)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a column in another table.
///
/// Used purely for lookup; it does not own or borrow the target column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Referenced table name.
    pub table: String,

    /// Referenced column name.
    pub column: String,
}

impl ColumnRef {
    /// Create a new column reference.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Owning table name.
    pub table: String,

    /// Column name.
    pub name: String,

    /// Canonical semantic type.
    pub semantic_type: SemanticType,

    /// Whether the column allows NULL.
    pub nullable: bool,

    /// Default value expression, if one is declared.
    pub default: Option<String>,

    /// Maximum character length for string types.
    pub length: Option<i64>,

    /// Numeric precision.
    pub precision: Option<i64>,

    /// Numeric scale.
    pub scale: Option<i64>,

    /// Column comment.
    pub comment: Option<String>,

    /// Whether the column takes part in any index.
    pub is_indexed: bool,

    /// Whether the column is (part of) the primary key.
    pub is_primary: bool,

    /// Whether the column carries a unique index.
    pub is_unique: bool,

    /// Referenced column when the column is part of a foreign key.
    pub reference: Option<ColumnRef>,
}

impl Column {
    /// Create a column with the given type and every optional field unset.
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        semantic_type: SemanticType,
    ) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            semantic_type,
            nullable: true,
            default: None,
            length: None,
            precision: None,
            scale: None,
            comment: None,
            is_indexed: false,
            is_primary: false,
            is_unique: false,
            reference: None,
        }
    }

    /// Set the declared character length.
    pub fn with_length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    /// Check if the column is text with a declared length of at most `max`.
    ///
    /// A text column with no declared length counts as short.
    pub fn is_short_text(&self, max: i64) -> bool {
        self.semantic_type.is_text() && self.length.map_or(true, |len| len <= max)
    }
}

/// Columns of one table, keyed by column name in catalog order.
pub type TableColumns = IndexMap<String, Column>;

/// Columns of every table, keyed by table name in catalog order.
pub type ColumnMap = IndexMap<String, TableColumns>;

/// Referencing table → referencing column → referenced column.
pub type ForeignKeyIndex = IndexMap<String, IndexMap<String, ColumnRef>>;

/// Referenced table → referencing table → referencing column → referenced column.
pub type RelationIndex = IndexMap<String, IndexMap<String, IndexMap<String, String>>>;
