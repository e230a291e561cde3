//! Error types for catalog introspection and query synthesis.

use thiserror::Error;

/// Exit code for configuration and YAML errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for catalog source failures (connectivity, permissions).
pub const EXIT_CATALOG_ERROR: u8 = 2;
/// Exit code for native column types with no canonical mapping.
pub const EXIT_UNSUPPORTED_TYPE: u8 = 3;
/// Exit code for identifiers rejected before quoting.
pub const EXIT_INVALID_IDENTIFIER: u8 = 4;
/// Exit code for file operations.
pub const EXIT_IO_ERROR: u8 = 7;
/// Exit code for JSON serialization failures.
pub const EXIT_JSON_ERROR: u8 = 8;

/// Main error type for schema-graph operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Configuration error (invalid YAML values, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog query failed (connectivity, permissions, malformed rows)
    #[error("Catalog query failed: {message}\n  Context: {context}")]
    CatalogQuery { message: String, context: String },

    /// A native column type has no canonical mapping
    #[error("Column type {0} not supported")]
    UnsupportedType(String),

    /// Identifier rejected before it could be quoted into SQL
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Create a CatalogQuery error with context about where it occurred
    pub fn query(message: impl ToString, context: impl Into<String>) -> Self {
        CatalogError::CatalogQuery {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CatalogError::Config(_) | CatalogError::Yaml(_) => EXIT_CONFIG_ERROR,
            CatalogError::CatalogQuery { .. } => EXIT_CATALOG_ERROR,
            CatalogError::UnsupportedType(_) => EXIT_UNSUPPORTED_TYPE,
            CatalogError::InvalidIdentifier(_) => EXIT_INVALID_IDENTIFIER,
            CatalogError::Io(_) => EXIT_IO_ERROR,
            CatalogError::Json(_) => EXIT_JSON_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for schema-graph operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_carries_context() {
        let err = CatalogError::query("access denied", "loading foreign keys");
        let text = err.to_string();
        assert!(text.contains("access denied"));
        assert!(text.contains("loading foreign keys"));
        assert_eq!(err.exit_code(), EXIT_CATALOG_ERROR);
    }

    #[test]
    fn test_unsupported_type_message() {
        let err = CatalogError::UnsupportedType("geometry".into());
        assert_eq!(err.to_string(), "Column type geometry not supported");
        assert_eq!(err.exit_code(), EXIT_UNSUPPORTED_TYPE);
    }

    #[test]
    fn test_format_detailed_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.yaml");
        let err = CatalogError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error"));
        assert_eq!(err.exit_code(), EXIT_IO_ERROR);
    }
}
