//! # schema-graph
//!
//! Relational catalog introspection and display SQL synthesis.
//!
//! This library reads a MySQL/MariaDB catalog and provides:
//!
//! - **Table listing** straight from the catalog
//! - **Foreign key and relation indexes** (belongs-to and has-many views)
//! - **Column metadata** mapped to canonical semantic types
//! - **Name column heuristics** choosing human-readable columns per table
//! - **Display SQL** joining each foreign key's target and labeling it
//!
//! Catalog reads are memoized per [`SchemaSession`] and safe to share
//! between tasks.
//!
//! ## Example
//!
//! ```rust,no_run
//! use schema_graph::{Config, MysqlCatalog, SchemaSession, SynthesisOptions};
//!
//! #[tokio::main]
//! async fn main() -> schema_graph::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let catalog = MysqlCatalog::connect(&config.source).await?;
//!     let session = SchemaSession::new(catalog);
//!
//!     let options = SynthesisOptions::from(&config.synthesis);
//!     let query = session.load_record_with_belongs_sql("orders", &options).await?;
//!     println!("{}", query.sql().unwrap_or("Invalid Table"));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod graph;
pub mod introspect;
pub mod naming;
pub mod query;
pub mod session;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, SourceConfig, SslMode, SynthesisConfig};
pub use crate::core::{
    CatalogRow, CatalogSource, CatalogValue, Column, ColumnMap, ColumnRef, Dialect,
    ForeignKeyIndex, RelationIndex, SemanticType, TableColumns,
};
pub use drivers::{CapturedCatalog, ColumnDef, MemoryCatalog, MysqlDialect};
#[cfg(feature = "mysql")]
pub use drivers::MysqlCatalog;
pub use error::{CatalogError, Result};
pub use graph::{RelationGraph, ThroughJoin, ViaColumn};
pub use query::{RecordQuery, SynthesisOptions};
pub use session::{SchemaSession, SchemaSnapshot};
