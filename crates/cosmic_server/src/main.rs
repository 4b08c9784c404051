//! Cosmic Lord - reconciliation server

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cosmic_core::catalog::Catalog;
use cosmic_core::world::World;
use cosmic_server::sweep::run_sweeper;
use cosmic_server::{load_world, unix_now, MemoryStore, Reconciler, ServerConfig};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cosmic_server", about = "Runs the idle-player sweep", version)]
struct Args {
    /// Server configuration (RON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial world snapshot (RON).
    #[arg(short, long)]
    world: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    tracing::info!("Starting Cosmic Lord reconciliation server");

    let config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let world = match &args.world {
        Some(path) => load_world(path)?,
        None => World::new(),
    };
    tracing::info!(
        players = world.players.len(),
        planets = world.planets.len(),
        "world loaded"
    );

    let store = Arc::new(MemoryStore::new(world));
    let reconciler = Arc::new(Reconciler::new(
        store,
        Arc::new(Catalog::standard()),
        config,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(run_sweeper(Arc::clone(&reconciler), unix_now, shutdown_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    shutdown_tx.send(true)?;
    sweeper.await?;
    Ok(())
}
