//! Core abstractions for catalog introspection.
//!
//! - [`schema`]: Column, reference and index types produced by introspection
//! - [`value`]: Raw catalog rows as returned by a catalog source
//! - [`traits`]: [`CatalogSource`] and [`Dialect`] seams
//! - [`identifier`]: Identifier validation and quoting

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{
    Column, ColumnMap, ColumnRef, ForeignKeyIndex, RelationIndex, SemanticType, TableColumns,
};
pub use traits::{CatalogSource, Dialect};
pub use value::{CatalogRow, CatalogValue};
