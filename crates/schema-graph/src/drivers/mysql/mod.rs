//! MySQL/MariaDB database driver.
//!
//! This module provides MySQL-specific implementations for:
//! - [`MysqlDialect`]: SQL syntax strategy
//! - [`MysqlCatalog`]: `information_schema` catalog source
//!
//! # Feature Flag
//!
//! The dialect is always available. The connection-backed catalog source is
//! only compiled when the `mysql` feature is enabled (the default):
//!
//! ```toml
//! [dependencies]
//! schema-graph = { version = "0.3", features = ["mysql"] }
//! ```
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod dialect;
#[cfg(feature = "mysql")]
mod source;

pub use dialect::MysqlDialect;
#[cfg(feature = "mysql")]
pub use source::MysqlCatalog;
