//! Type mapping from native column types to canonical semantic types.

use crate::core::schema::SemanticType;
use crate::error::{CatalogError, Result};

/// Map a native column type name to its semantic type.
///
/// Matching is case-insensitive. Types outside the table (enum, json,
/// geometry, ...) fail with [`CatalogError::UnsupportedType`]; they are not
/// guessed.
///
/// Engine-specific boolean encodings such as MySQL's `tinyint(1)` are not
/// handled here; the introspection layer applies that override using the
/// full declared column type.
pub fn map_type(native_type: &str) -> Result<SemanticType> {
    let lowered = native_type.trim().to_lowercase();
    let mapped = match lowered.as_str() {
        // Integer types
        "int" | "tinyint" | "smallint" | "mediumint" | "bigint" | "bit" => SemanticType::Integer,

        // Fractional types
        "double" | "float" | "decimal" | "numeric" => SemanticType::Decimal,

        // Boolean
        "boolean" => SemanticType::Boolean,

        // Date/time types
        "date" | "time" | "datetime" | "timestamp" | "year" => SemanticType::Datetime,

        // String types
        "tinytext" | "text" | "longtext" | "mediumtext" | "blob" | "varchar" | "char" => {
            SemanticType::Text
        }

        _ => return Err(CatalogError::UnsupportedType(lowered)),
    };
    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_types() {
        for native in ["int", "tinyint", "smallint", "mediumint", "bigint", "bit"] {
            assert_eq!(map_type(native).unwrap(), SemanticType::Integer, "{}", native);
        }
    }

    #[test]
    fn test_decimal_types() {
        for native in ["double", "float", "decimal", "numeric"] {
            assert_eq!(map_type(native).unwrap(), SemanticType::Decimal, "{}", native);
        }
    }

    #[test]
    fn test_datetime_types() {
        for native in ["date", "time", "datetime", "timestamp", "year"] {
            assert_eq!(map_type(native).unwrap(), SemanticType::Datetime, "{}", native);
        }
    }

    #[test]
    fn test_string_types() {
        for native in ["tinytext", "text", "longtext", "mediumtext", "blob", "varchar", "char"] {
            assert_eq!(map_type(native).unwrap(), SemanticType::Text, "{}", native);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(map_type("VARCHAR").unwrap(), SemanticType::Text);
        assert_eq!(map_type("BigInt").unwrap(), SemanticType::Integer);
    }

    #[test]
    fn test_boolean_passthrough() {
        assert_eq!(map_type("boolean").unwrap(), SemanticType::Boolean);
    }

    #[test]
    fn test_unsupported_types() {
        for native in ["geometry", "enum", "json", "polygon", ""] {
            match map_type(native) {
                Err(CatalogError::UnsupportedType(t)) => assert_eq!(t, native),
                other => panic!("expected UnsupportedType for {:?}, got {:?}", native, other),
            }
        }
    }
}
