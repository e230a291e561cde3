//! MySQL/MariaDB catalog source.
//!
//! Implements [`CatalogSource`] over an SQLx connection pool. Rows are
//! converted column by column into [`CatalogValue`]s; metadata views only
//! produce integers, strings and NULLs.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode};
use sqlx::{Column as _, Row, ValueRef};
use tracing::{debug, info};

use crate::config::{SourceConfig, SslMode};
use crate::core::traits::CatalogSource;
use crate::core::value::{CatalogRow, CatalogValue};
use crate::error::{CatalogError, Result};

/// Connection pool timeout.
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// MySQL/MariaDB catalog source.
pub struct MysqlCatalog {
    pool: MySqlPool,
    database: String,
}

impl MysqlCatalog {
    /// Connect to MySQL using the source configuration.
    pub async fn connect(config: &SourceConfig) -> Result<Self> {
        let ssl_mode = match config.ssl_mode {
            SslMode::Disable => MySqlSslMode::Disabled,
            SslMode::Preferred => MySqlSslMode::Preferred,
            SslMode::Required => MySqlSslMode::Required,
        };

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(ssl_mode);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(POOL_CONNECTION_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| CatalogError::query(e, "creating MySQL catalog pool"))?;

        let catalog = Self {
            pool,
            database: config.database.clone(),
        };
        catalog.test_connection().await?;

        info!(
            "Connected to MySQL catalog: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(catalog)
    }

    /// Test the database connection.
    pub async fn test_connection(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CatalogError::query(e, "testing MySQL connection"))?;
        Ok(())
    }

    /// Name of the database this catalog introspects.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Convert a MySQL row to a catalog row.
    fn row_to_catalog(row: &MySqlRow) -> CatalogRow {
        let mut out = CatalogRow::new();
        for (idx, column) in row.columns().iter().enumerate() {
            out.insert(column.name(), Self::decode_value(row, idx));
        }
        out
    }

    /// Decode one column, trying integer, then string, then raw bytes.
    fn decode_value(row: &MySqlRow, idx: usize) -> CatalogValue {
        let is_null: bool = row.try_get_raw(idx).map(|r| r.is_null()).unwrap_or(true);
        if is_null {
            return CatalogValue::Null;
        }

        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return CatalogValue::Int(v);
        }
        if let Ok(v) = row.try_get::<u64, _>(idx) {
            return i64::try_from(v)
                .map(CatalogValue::Int)
                .unwrap_or_else(|_| CatalogValue::Text(v.to_string()));
        }
        if let Ok(v) = row.try_get::<String, _>(idx) {
            return CatalogValue::Text(v);
        }
        if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
            return CatalogValue::Text(String::from_utf8_lossy(&v).into_owned());
        }

        CatalogValue::Null
    }
}

#[async_trait]
impl CatalogSource for MysqlCatalog {
    async fn fetch(&self, sql: &str) -> Result<Vec<CatalogRow>> {
        debug!("Running catalog query: {}", sql.trim());

        let rows: Vec<MySqlRow> = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CatalogError::query(e, "running MySQL catalog query"))?;

        Ok(rows.iter().map(Self::row_to_catalog).collect())
    }

    fn db_type(&self) -> &str {
        "mysql"
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
