//! fieldd — the FieldGrid daemon.
//!
//! Single binary that assembles the FieldGrid pieces:
//! - Record store (redb)
//! - Dispatcher + assignment engine
//! - REST API
//!
//! # Usage
//!
//! ```text
//! fieldd serve --port 5000 --data-dir /var/lib/fieldgrid
//! fieldd schedule --data-dir /var/lib/fieldgrid
//! ```

mod seed;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use fieldgrid_api::handlers::AssignedEntry;
use fieldgrid_core::FieldConfig;
use fieldgrid_dispatch::{DispatchSettings, Dispatcher};
use fieldgrid_state::{StateStore, SystemClock};

#[derive(Parser)]
#[command(name = "fieldd", about = "FieldGrid dispatch daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct StoreArgs {
    /// Path to a fieldgrid.toml configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory for persistent state (overrides the config file).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the REST API.
    Serve {
        #[command(flatten)]
        store: StoreArgs,

        /// Port to listen on (overrides the config file).
        #[arg(long)]
        port: Option<u16>,

        /// Do not create the default teams on first start.
        #[arg(long)]
        no_seed: bool,
    },
    /// Run one scheduling pass and print the assignments as JSON.
    Schedule {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Create the configured teams if the store has none.
    Seed {
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fieldd=debug,fieldgrid=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            store,
            port,
            no_seed,
        } => {
            let config = load_config(store.config.as_deref())?;
            let port = port.unwrap_or_else(|| config.port());
            let data_dir = store.data_dir.unwrap_or_else(|| config.data_dir());
            run_server(&config, port, &data_dir, !no_seed).await
        }
        Command::Schedule { store } => {
            let config = load_config(store.config.as_deref())?;
            let data_dir = store.data_dir.unwrap_or_else(|| config.data_dir());
            run_schedule_once(&config, &data_dir).await
        }
        Command::Seed { store } => {
            let config = load_config(store.config.as_deref())?;
            let data_dir = store.data_dir.unwrap_or_else(|| config.data_dir());
            let state = open_store(&data_dir)?;
            let added = seed::seed_if_empty(&state, &config.seed_resources())?;
            println!("{added} resources added");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<FieldConfig> {
    match path {
        Some(path) => {
            let config = FieldConfig::from_file(path)?;
            info!(?path, "configuration loaded");
            Ok(config)
        }
        None => Ok(FieldConfig::default()),
    }
}

fn open_store(data_dir: &Path) -> anyhow::Result<StateStore> {
    // Ensure data directory exists.
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("fieldgrid.redb");
    let state = StateStore::open(&db_path)?;
    info!(path = ?db_path, "state store opened");
    Ok(state)
}

fn build_dispatcher(config: &FieldConfig, store: StateStore) -> Arc<Dispatcher> {
    let settings = DispatchSettings::from(config);
    info!(
        speed_kmh = settings.travel.speed_kmh,
        overhead_minutes = settings.travel.dispatch_overhead_minutes,
        "dispatcher initialized"
    );
    Arc::new(Dispatcher::new(store, settings, Arc::new(SystemClock)))
}

async fn run_server(
    config: &FieldConfig,
    port: u16,
    data_dir: &Path,
    seed: bool,
) -> anyhow::Result<()> {
    info!("FieldGrid daemon starting");

    let state = open_store(data_dir)?;
    if seed {
        seed::seed_if_empty(&state, &config.seed_resources())?;
    }
    let dispatcher = build_dispatcher(config, state);

    let router = fieldgrid_api::build_router(dispatcher);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("FieldGrid daemon stopped");
    Ok(())
}

async fn run_schedule_once(config: &FieldConfig, data_dir: &Path) -> anyhow::Result<()> {
    let state = open_store(data_dir)?;
    let dispatcher = build_dispatcher(config, state);

    let assigned: Vec<AssignedEntry> = dispatcher
        .schedule()
        .await?
        .into_iter()
        .map(AssignedEntry::from)
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "count": assigned.len(),
            "assigned": assigned,
        }))?
    );
    Ok(())
}
