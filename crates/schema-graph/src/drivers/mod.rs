//! Catalog driver implementations.
//!
//! - [`mysql`]: MySQL/MariaDB dialect and `information_schema` catalog source
//! - [`memory`]: In-memory catalog source answering registered queries
//!
//! # Adding New Databases
//!
//! 1. Create a new module under `drivers/`
//! 2. Implement [`Dialect`](crate::core::Dialect) with the engine's catalog
//!    queries, quoting and label expression
//! 3. Implement [`CatalogSource`](crate::core::CatalogSource) over the
//!    engine's client library, gated by a Cargo feature

pub mod memory;
pub mod mysql;

pub use memory::{CapturedCatalog, ColumnDef, MemoryCatalog};
#[cfg(feature = "mysql")]
pub use mysql::MysqlCatalog;
pub use mysql::MysqlDialect;
