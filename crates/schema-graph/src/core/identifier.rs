//! Identifier validation and quoting.
//!
//! SQL identifiers cannot be bound as statement parameters, so every table,
//! column and alias name that ends up in synthesized SQL goes through this
//! module: names are validated first, then quoted with embedded delimiter
//! characters doubled.

use crate::error::{CatalogError, Result};

/// Maximum identifier length accepted before quoting (MySQL itself stops at 64).
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes
/// - Identifiers exceeding maximum length
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CatalogError::InvalidIdentifier(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(CatalogError::InvalidIdentifier(format!(
            "identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(CatalogError::InvalidIdentifier(format!(
            "identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a MySQL identifier using backticks.
///
/// Backticks inside the name are doubled. Does not validate; run
/// [`validate_identifier`] first on names that did not come from the catalog.
pub fn quote_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
