//! Configuration validation.

use super::Config;
use crate::error::{CatalogError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Source validation
    if config.source.host.is_empty() {
        return Err(CatalogError::Config("source.host is required".into()));
    }
    if config.source.database.is_empty() {
        return Err(CatalogError::Config("source.database is required".into()));
    }
    if config.source.user.is_empty() {
        return Err(CatalogError::Config("source.user is required".into()));
    }
    match config.source.r#type.to_lowercase().as_str() {
        "mysql" | "mariadb" => {}
        other => {
            return Err(CatalogError::Config(format!(
                "source.type must be 'mysql' or 'mariadb', got '{}'",
                other
            )))
        }
    }
    if config.source.max_connections == 0 {
        return Err(CatalogError::Config(
            "source.max_connections must be at least 1".into(),
        ));
    }

    // Synthesis validation
    if config.synthesis.label_width == 0 {
        return Err(CatalogError::Config(
            "synthesis.label_width must be at least 1".into(),
        ));
    }
    if config.synthesis.exclude_tables.iter().any(|t| t.is_empty()) {
        return Err(CatalogError::Config(
            "synthesis.exclude_tables cannot contain empty names".into(),
        ));
    }

    Ok(())
}
