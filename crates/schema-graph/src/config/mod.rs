//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use crate::query::SynthesisOptions;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

impl From<&SynthesisConfig> for SynthesisOptions {
    fn from(config: &SynthesisConfig) -> Self {
        SynthesisOptions {
            excluded_tables: config.exclude_tables.clone(),
            label_width: config.label_width,
            separator: config.label_separator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::io::Write;

    const MINIMAL: &str = r#"
source:
  host: db.internal
  database: shop
  user: reader
  password: hunter2
"#;

    #[test]
    fn test_from_yaml_applies_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.source.r#type, "mysql");
        assert_eq!(config.source.port, 3306);
        assert_eq!(config.source.ssl_mode, SslMode::Preferred);
        assert_eq!(config.source.max_connections, 2);
        assert_eq!(config.synthesis.label_width, 50);
        assert_eq!(config.synthesis.label_separator, " - ");
        assert!(config.synthesis.exclude_tables.is_empty());
    }

    #[test]
    fn test_from_yaml_synthesis_section() {
        let yaml = format!(
            "{}synthesis:\n  label_width: 80\n  exclude_tables: [users, audit_log]\n",
            MINIMAL
        );
        let config = Config::from_yaml(&yaml).unwrap();
        let options = SynthesisOptions::from(&config.synthesis);
        assert_eq!(options.label_width, 80);
        assert_eq!(options.excluded_tables, vec!["users", "audit_log"]);
        assert_eq!(options.separator, " - ");
    }

    #[test]
    fn test_from_yaml_ssl_mode() {
        let yaml = format!("{}  ssl_mode: required\n", MINIMAL);
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.source.ssl_mode, SslMode::Required);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("source: [").unwrap_err();
        assert!(matches!(err, CatalogError::Yaml(_)));
    }

    #[test]
    fn test_missing_required_field() {
        let err = Config::from_yaml("source:\n  host: localhost\n").unwrap_err();
        assert!(matches!(err, CatalogError::Yaml(_)));
    }

    #[test]
    fn test_validation_runs_on_load() {
        let yaml = MINIMAL.replace("db.internal", "\"\"");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source.database, "shop");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/schema-graph.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
