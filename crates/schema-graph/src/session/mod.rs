//! Introspection session with memoized catalog reads.
//!
//! A [`SchemaSession`] owns a catalog source and lazily builds the foreign
//! key index, the relation index and the column map. Each is built at most
//! once per session, even when several tasks ask for it at the same time;
//! a failed build leaves the cache empty so the next call retries.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::core::identifier::validate_identifier;
use crate::core::schema::{ColumnMap, ForeignKeyIndex, RelationIndex};
use crate::core::traits::{CatalogSource, Dialect};
use crate::drivers::MysqlDialect;
use crate::error::{CatalogError, Result};
use crate::graph::{invert_foreign_keys, RelationGraph, ThroughJoin};
use crate::introspect::{build_columns, build_foreign_keys};
use crate::naming;
use crate::query::{self, RecordQuery, SynthesisOptions};

/// Catalog introspection over one source.
pub struct SchemaSession<S> {
    source: S,
    dialect: Arc<dyn Dialect>,
    foreign_keys: OnceCell<ForeignKeyIndex>,
    relations: OnceCell<RelationIndex>,
    columns: OnceCell<ColumnMap>,
}

impl<S: CatalogSource> SchemaSession<S> {
    /// Create a session using the MySQL dialect.
    pub fn new(source: S) -> Self {
        Self::with_dialect(source, Arc::new(MysqlDialect::new()))
    }

    /// Create a session using the given dialect.
    pub fn with_dialect(source: S, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            source,
            dialect,
            foreign_keys: OnceCell::new(),
            relations: OnceCell::new(),
            columns: OnceCell::new(),
        }
    }

    /// Get the catalog source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the dialect used for catalog queries and rendering.
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Consume the session and return the source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// List the tables of the active schema.
    ///
    /// Not cached: every call queries the catalog.
    pub async fn get_tables(&self) -> Result<Vec<String>> {
        let values = self
            .source
            .fetch_column(&self.dialect.tables_query(), 0)
            .await?;
        let tables: Vec<String> = values.iter().filter_map(|v| v.to_text()).collect();
        debug!("Listed {} tables", tables.len());
        Ok(tables)
    }

    /// Get the foreign key index, building it on first use.
    pub async fn get_foreign_keys(&self) -> Result<&ForeignKeyIndex> {
        self.foreign_keys
            .get_or_try_init(|| async {
                let rows = self
                    .source
                    .fetch(&self.dialect.key_column_usage_query())
                    .await?;
                let index = build_foreign_keys(&rows)?;
                debug!(
                    "Built foreign key index: {} tables, {} columns",
                    index.len(),
                    index.values().map(|c| c.len()).sum::<usize>()
                );
                Ok::<_, CatalogError>(index)
            })
            .await
    }

    /// Get the relation index (inverse of the foreign key index), building
    /// it on first use.
    pub async fn get_relations(&self) -> Result<&RelationIndex> {
        self.relations
            .get_or_try_init(|| async {
                let foreign_keys = self.get_foreign_keys().await?;
                let relations = invert_foreign_keys(foreign_keys);
                debug!("Built relation index: {} referenced tables", relations.len());
                Ok::<_, CatalogError>(relations)
            })
            .await
    }

    /// Get the column map, building it on first use.
    ///
    /// Fails as a whole when any column has an unsupported native type.
    pub async fn get_columns(&self) -> Result<&ColumnMap> {
        self.columns
            .get_or_try_init(|| async {
                let foreign_keys = self.get_foreign_keys().await?;
                let rows = self.source.fetch(&self.dialect.columns_query()).await?;
                let columns = build_columns(&rows, foreign_keys, self.dialect.as_ref())?;
                debug!(
                    "Built column map: {} tables, {} columns",
                    columns.len(),
                    columns.values().map(|c| c.len()).sum::<usize>()
                );
                Ok::<_, CatalogError>(columns)
            })
            .await
    }

    /// Get a graph view over the foreign key and relation indexes.
    ///
    /// Builds the column map too, since link tables are told apart from
    /// entities by their primary key.
    pub async fn relation_graph(&self) -> Result<RelationGraph<'_>> {
        let foreign_keys = self.get_foreign_keys().await?;
        let relations = self.get_relations().await?;
        let columns = self.get_columns().await?;
        Ok(RelationGraph::new(foreign_keys, relations, columns))
    }

    /// Choose the name columns of `table`, qualified with `alias`.
    ///
    /// The alias defaults to the table name. An unknown table has no name
    /// columns.
    pub async fn name_columns_for_table(
        &self,
        table: &str,
        alias: Option<&str>,
    ) -> Result<IndexMap<String, String>> {
        if let Some(alias) = alias {
            validate_identifier(alias)?;
        }
        let columns = self.get_columns().await?;
        let Some(table_columns) = columns.get(table) else {
            debug!("No columns for table {}, no name columns", table);
            return Ok(IndexMap::new());
        };
        Ok(naming::name_columns(
            table_columns,
            alias.unwrap_or(table),
            self.dialect.as_ref(),
        ))
    }

    /// Synthesize display SQL for `table`, labeling each foreign key.
    pub async fn load_record_with_belongs_sql(
        &self,
        table: &str,
        options: &SynthesisOptions,
    ) -> Result<RecordQuery> {
        let columns = self.get_columns().await?;
        let foreign_keys = self.get_foreign_keys().await?;
        query::load_record_with_belongs(
            table,
            columns,
            foreign_keys,
            options,
            self.dialect.as_ref(),
        )
    }

    /// Capture everything introspected so far as one serializable value.
    pub async fn snapshot(&self) -> Result<SchemaSnapshot> {
        let tables = self.get_tables().await?;
        let columns = self.get_columns().await?;
        let foreign_keys = self.get_foreign_keys().await?;
        let relations = self.get_relations().await?;
        let through_joins = RelationGraph::new(foreign_keys, relations, columns).through_joins();

        info!(
            "Captured schema snapshot: {} tables, {} with foreign keys, {} link tables",
            tables.len(),
            foreign_keys.len(),
            through_joins.len()
        );

        Ok(SchemaSnapshot {
            source: self.source.db_type().to_string(),
            dialect: self.dialect.name().to_string(),
            tables,
            columns: columns.clone(),
            foreign_keys: foreign_keys.clone(),
            relations: relations.clone(),
            through_joins,
        })
    }
}

/// Serializable view of an introspected schema.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSnapshot {
    /// Catalog source type (e.g., "mysql").
    pub source: String,
    /// Dialect name.
    pub dialect: String,
    /// Tables in listing order.
    pub tables: Vec<String>,
    /// Column metadata by table.
    pub columns: ColumnMap,
    /// Outgoing foreign keys by table.
    pub foreign_keys: ForeignKeyIndex,
    /// Incoming foreign keys by referenced table.
    pub relations: RelationIndex,
    /// Detected link tables.
    pub through_joins: Vec<ThroughJoin>,
}
