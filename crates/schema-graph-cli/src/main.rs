//! schema-graph CLI - Explore relational catalogs and synthesize display SQL.

use clap::{Parser, Subcommand};
use schema_graph::{
    CapturedCatalog, CatalogError, CatalogSource, Config, MemoryCatalog, MysqlDialect,
    RecordQuery, SchemaSession, SynthesisConfig, SynthesisOptions,
};
use schema_graph::query::INVALID_TABLE;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

/// Exit code when a requested table is not in the catalog.
const EXIT_INVALID_TABLE: u8 = 5;

type Session = SchemaSession<Arc<dyn CatalogSource>>;

#[derive(Parser)]
#[command(name = "schema-graph")]
#[command(about = "Explore relational catalogs and synthesize display SQL")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Read the catalog from a capture file instead of connecting
    #[arg(long)]
    catalog_file: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test the catalog connection
    HealthCheck,

    /// List tables of the active schema
    Tables,

    /// Show column metadata
    Columns {
        /// Only show this table
        #[arg(long)]
        table: Option<String>,
    },

    /// Show foreign key relations
    Relations {
        /// Only show this table
        #[arg(long)]
        table: Option<String>,
    },

    /// Show the human-readable name columns of a table
    NameColumns {
        /// Table to inspect
        table: String,

        /// Alias used to qualify the columns [default: the table name]
        #[arg(long)]
        alias: Option<String>,
    },

    /// Synthesize a SELECT labeling each foreign key of a table
    BelongsSql {
        /// Table to select from
        table: String,

        /// Referenced table to leave unjoined (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Characters shared by each label's columns
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        label_width: Option<u64>,
    },

    /// Print the full introspected schema as JSON
    Snapshot,

    /// Capture raw catalog rows for later use with --catalog-file
    Capture {
        /// Write the capture here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CatalogError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let started = Instant::now();
    let (source, database, synthesis) = open_source(&cli).await?;
    let session: Session = SchemaSession::new(source);

    let result = run_command(&cli, &session, &database, &synthesis, started).await;
    session.source().close().await;
    result
}

/// Open the catalog source: a capture file when given, otherwise the
/// database named by the configuration.
async fn open_source(
    cli: &Cli,
) -> Result<(Arc<dyn CatalogSource>, String, SynthesisConfig), CatalogError> {
    if let Some(path) = &cli.catalog_file {
        let captured = CapturedCatalog::load(path)?;
        info!("Loaded catalog capture from {:?}", path);
        let database = captured.database.clone();
        let synthesis = if cli.config.exists() {
            Config::load(&cli.config)?.synthesis
        } else {
            SynthesisConfig::default()
        };
        let source: Arc<dyn CatalogSource> =
            Arc::new(MemoryCatalog::from_captured(MysqlDialect::new(), captured));
        return Ok((source, database, synthesis));
    }

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);
    let source = connect(&config).await?;
    Ok((source, config.source.database.clone(), config.synthesis))
}

#[cfg(feature = "mysql")]
async fn connect(config: &Config) -> Result<Arc<dyn CatalogSource>, CatalogError> {
    let catalog = schema_graph::MysqlCatalog::connect(&config.source).await?;
    Ok(Arc::new(catalog))
}

#[cfg(not(feature = "mysql"))]
async fn connect(_config: &Config) -> Result<Arc<dyn CatalogSource>, CatalogError> {
    Err(CatalogError::Config(
        "built without MySQL support; use --catalog-file".to_string(),
    ))
}

async fn run_command(
    cli: &Cli,
    session: &Session,
    database: &str,
    synthesis: &SynthesisConfig,
    started: Instant,
) -> Result<ExitCode, CatalogError> {
    match &cli.command {
        Commands::HealthCheck => {
            let tables = session.get_tables().await?;
            let latency_ms = started.elapsed().as_millis() as u64;
            let source = session.source().db_type();

            if cli.output_json {
                let result = json!({
                    "source": source,
                    "database": database,
                    "connected": true,
                    "latency_ms": latency_ms,
                    "tables": tables.len(),
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Health Check Results:");
                println!("  Source ({}): OK ({}ms)", source, latency_ms);
                println!("  Database: {}", database);
                println!("  Tables: {}", tables.len());
            }
        }

        Commands::Tables => {
            let tables = session.get_tables().await?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                for table in tables {
                    println!("{}", table);
                }
            }
        }

        Commands::Columns { table } => {
            let columns = session.get_columns().await?;
            let selected: Vec<_> = match table {
                Some(name) => match columns.get_key_value(name.as_str()) {
                    Some(entry) => vec![entry],
                    None => return invalid_table(cli, name),
                },
                None => columns.iter().collect(),
            };

            if cli.output_json {
                let map: serde_json::Map<String, serde_json::Value> = selected
                    .iter()
                    .map(|(name, cols)| Ok(((*name).clone(), serde_json::to_value(cols)?)))
                    .collect::<Result<_, serde_json::Error>>()?;
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                for (name, cols) in selected {
                    println!("{}", name);
                    for col in cols.values() {
                        let mut flags = Vec::new();
                        if col.is_primary {
                            flags.push("PK".to_string());
                        }
                        if col.is_unique {
                            flags.push("UNIQUE".to_string());
                        }
                        if !col.nullable {
                            flags.push("NOT NULL".to_string());
                        }
                        if let Some(reference) = &col.reference {
                            flags.push(format!("-> {}.{}", reference.table, reference.column));
                        }
                        let length = col.length.map(|l| format!("({})", l)).unwrap_or_default();
                        println!(
                            "  {:<24} {}{} {}",
                            col.name,
                            col.semantic_type,
                            length,
                            flags.join(" ")
                        );
                    }
                }
            }
        }

        Commands::Relations { table } => {
            let known = session.get_tables().await?;
            let tables = match table {
                Some(name) if known.contains(name) => vec![name.clone()],
                Some(name) => return invalid_table(cli, name),
                None => known,
            };
            let graph = session.relation_graph().await?;

            if cli.output_json {
                let result: serde_json::Map<String, serde_json::Value> = tables
                    .iter()
                    .map(|t| {
                        (
                            t.clone(),
                            json!({
                                "belongs_to": graph.belongs_to(t),
                                "has_many": graph.has_many(t),
                                "through": graph.through_joins_for(t),
                            }),
                        )
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for t in &tables {
                    println!("{}", t);
                    if let Some(outgoing) = graph.belongs_to(t) {
                        for (column, target) in outgoing {
                            println!("  belongs to: {} -> {}.{}", column, target.table, target.column);
                        }
                    }
                    if let Some(incoming) = graph.has_many(t) {
                        for (referencing, columns) in incoming {
                            for (column, key) in columns {
                                println!("  has many: {}.{} -> {}", referencing, column, key);
                            }
                        }
                    }
                    for join in graph.through_joins_for(t) {
                        if let Some(other) = join.other_side(t) {
                            println!(
                                "  through {}: {} ({})",
                                join.link_table, other.references.table, other.column
                            );
                        }
                    }
                }
            }
        }

        Commands::NameColumns { table, alias } => {
            let columns = session
                .name_columns_for_table(table, alias.as_deref())
                .await?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&columns)?);
            } else {
                for (name, reference) in &columns {
                    println!("{}\t{}", name, reference);
                }
            }
        }

        Commands::BelongsSql {
            table,
            exclude,
            label_width,
        } => {
            let mut options = SynthesisOptions::from(synthesis).excluding(exclude.iter().cloned());
            if let Some(width) = label_width {
                options.label_width = usize::try_from(*width).unwrap_or(usize::MAX);
            }

            match session.load_record_with_belongs_sql(table, &options).await? {
                RecordQuery::Statement(sql) => {
                    if cli.output_json {
                        let result = json!({ "table": table, "sql": sql });
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    } else {
                        println!("{}", sql);
                    }
                }
                RecordQuery::InvalidTable { table } => return invalid_table(cli, &table),
            }
        }

        Commands::Snapshot => {
            let snapshot = session.snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Commands::Capture { output } => {
            let captured =
                CapturedCatalog::capture(session.source(), session.dialect(), database).await?;
            let json = captured.to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(path, json)?;
                    info!(
                        "Captured {} tables and {} columns to {:?}",
                        captured.tables.len(),
                        captured.columns.len(),
                        path
                    );
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn invalid_table(cli: &Cli, table: &str) -> Result<ExitCode, CatalogError> {
    if cli.output_json {
        let result = json!({ "table": table, "error": INVALID_TABLE });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", INVALID_TABLE);
    }
    Ok(ExitCode::from(EXIT_INVALID_TABLE))
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries command output
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
