use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plantera_offline::application::ports::{ConnectivitySignal, OfflineStore};
use plantera_offline::application::services::OfflineService;
use plantera_offline::infrastructure::network::TcpConnectivityProbe;
use plantera_offline::infrastructure::offline::SqliteOfflineStore;
use plantera_offline::shared::config::AppConfig;
use plantera_offline::shared::logging::init_logging;
use plantera_offline::{CollectionName, OperationKind};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "plantera-offline")]
#[command(about = "Inspect and maintain the Plantera offline operation queue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database url (defaults to the local data directory)
    #[arg(long, env = "PLANTERA_DATABASE_URL")]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show connectivity, pending operations and cached collections
    Status,
    /// List unsynced operations in replay order
    List {
        #[arg(long)]
        json: bool,
    },
    /// Queue a mutation, e.g. `enqueue crops insert '{"name":"Tomato"}'`
    Enqueue {
        collection: String,
        kind: String,
        payload: String,
    },
    /// Remove operations already marked as synced
    Purge,
    /// Print the cached snapshot of a collection
    Cache { collection: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.json_logs)?;

    let mut config = AppConfig::from_env();
    config.database.url = match cli.database_url {
        Some(url) => url,
        None => default_database_url()?,
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    let store = Arc::new(SqliteOfflineStore::new(config.database.clone()));
    store
        .initialize()
        .await
        .with_context(|| format!("failed to open {}", config.database.url))?;
    let service = OfflineService::new(store.clone());

    match cli.command {
        Commands::Status => {
            let probe = TcpConnectivityProbe::from_config(&config.network);
            let online = probe.is_online().await;
            let pending = service.pending_count().await?;

            println!("online:  {}", if online { "yes" } else { "no" });
            println!("pending: {pending}");
            for status in service.cache_status().await? {
                println!(
                    "cache:   {} ({} records, refreshed {})",
                    status.collection,
                    status.record_count,
                    status.refreshed_at.to_rfc3339()
                );
            }
        }
        Commands::List { json } => {
            let operations = service.list_unsynced().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&operations)?);
            } else if operations.is_empty() {
                println!("queue is empty");
            } else {
                for op in &operations {
                    println!(
                        "{:>5}  {}  {:<6} {:<20} {}",
                        op.seq,
                        op.created_at.format("%Y-%m-%d %H:%M:%S"),
                        op.kind.as_str(),
                        op.collection.as_str(),
                        op.id
                    );
                }
            }
        }
        Commands::Enqueue {
            collection,
            kind,
            payload,
        } => {
            let kind: OperationKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let payload: serde_json::Value =
                serde_json::from_str(&payload).context("payload must be valid JSON")?;
            let operation = service.record_mutation(&collection, kind, payload).await?;
            info!(operation_id = %operation.id, "operation queued");
            println!("{}", operation.id);
        }
        Commands::Purge => {
            let removed = store.purge_synced().await?;
            println!("removed {removed} synced operations");
        }
        Commands::Cache { collection } => {
            let collection =
                CollectionName::try_from(collection.as_str()).map_err(|e| anyhow::anyhow!(e))?;
            let records = service.cached_records(&collection).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    store.close().await;
    Ok(())
}

fn default_database_url() -> Result<String> {
    let dir: PathBuf = dirs::data_local_dir()
        .context("no local data directory on this platform")?
        .join("plantera");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    Ok(format!("sqlite:{}", dir.join("offline.db").display()))
}
