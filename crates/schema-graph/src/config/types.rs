//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog source connection.
    pub source: SourceConfig,

    /// Display SQL synthesis behavior.
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

/// TLS mode for the catalog connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    /// Plain TCP.
    Disable,
    /// Use TLS when the server offers it.
    #[default]
    Preferred,
    /// Fail unless TLS can be negotiated.
    Required,
}

/// Catalog source (MySQL/MariaDB) configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Database type ("mysql" or "mariadb").
    #[serde(default = "default_mysql")]
    pub r#type: String,

    /// Database host.
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database (schema) to introspect.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// SSL mode (default: preferred).
    #[serde(default)]
    pub ssl_mode: SslMode,

    /// Maximum pooled connections (default: 2).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("type", &self.r#type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Display SQL synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Total characters shared by the label columns of one foreign key (default: 50).
    #[serde(default = "default_label_width")]
    pub label_width: usize,

    /// Referenced tables never joined when synthesizing display SQL.
    #[serde(default)]
    pub exclude_tables: Vec<String>,

    /// Separator placed between label columns (default: " - ").
    #[serde(default = "default_label_separator")]
    pub label_separator: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            label_width: default_label_width(),
            exclude_tables: Vec::new(),
            label_separator: default_label_separator(),
        }
    }
}

fn default_mysql() -> String {
    "mysql".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_max_connections() -> u32 {
    2
}

fn default_label_width() -> usize {
    50
}

fn default_label_separator() -> String {
    " - ".to_string()
}
