//! Catalog row and value representation.
//!
//! A catalog source hands back metadata rows as ordered maps from column
//! name to a small dynamic value. Metadata views only ever carry strings,
//! integers and NULLs, so the value type stays deliberately narrow.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single value read from a catalog metadata view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogValue {
    /// SQL NULL.
    Null,
    /// Integer metadata (lengths, precisions, ordinal positions).
    Int(i64),
    /// Textual metadata (names, types, flags, comments).
    Text(String),
}

impl CatalogValue {
    /// Check if the value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, CatalogValue::Null)
    }

    /// Borrow the value as a string, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CatalogValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as an integer.
    ///
    /// Textual digits are accepted because some engines report numeric
    /// metadata columns as strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CatalogValue::Int(v) => Some(*v),
            CatalogValue::Text(s) => s.trim().parse().ok(),
            CatalogValue::Null => None,
        }
    }

    /// Render the value as display text (NULL renders as `None`).
    pub fn to_text(&self) -> Option<String> {
        match self {
            CatalogValue::Null => None,
            CatalogValue::Int(v) => Some(v.to_string()),
            CatalogValue::Text(s) => Some(s.clone()),
        }
    }

    /// Check if the value is empty or zero-equivalent.
    ///
    /// NULL, the empty string, `"0"` and `0` all count as empty; catalog
    /// metadata uses these interchangeably to mean "not set".
    pub fn is_blank(&self) -> bool {
        match self {
            CatalogValue::Null => true,
            CatalogValue::Int(v) => *v == 0,
            CatalogValue::Text(s) => s.is_empty() || s == "0",
        }
    }
}

impl From<&str> for CatalogValue {
    fn from(v: &str) -> Self {
        CatalogValue::Text(v.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(v: String) -> Self {
        CatalogValue::Text(v)
    }
}

impl From<i64> for CatalogValue {
    fn from(v: i64) -> Self {
        CatalogValue::Int(v)
    }
}

impl<T: Into<CatalogValue>> From<Option<T>> for CatalogValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CatalogValue::Null)
    }
}

/// One row of a catalog query, keyed by result column name in select order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRow {
    values: IndexMap<String, CatalogValue>,
}

impl CatalogRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from (column, value) pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<CatalogValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set a column value, keeping the original position on overwrite.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CatalogValue>) {
        self.values.insert(column.into(), value.into());
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&CatalogValue> {
        self.values.get(column)
    }

    /// Get a value by position.
    pub fn get_index(&self, index: usize) -> Option<&CatalogValue> {
        self.values.get_index(index).map(|(_, v)| v)
    }

    /// Get a column as a string, treating NULL and missing columns alike.
    pub fn str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(CatalogValue::as_str)
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
