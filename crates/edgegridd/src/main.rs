//! edgegridd — the edgegrid controller daemon.
//!
//! Runs one controller replica:
//! - Object store (redb)
//! - Peer and downstream notification buses
//! - Entity caches, bulk-loaded at startup
//! - Peer notice listener
//! - REST API
//!
//! Both buses are in-process broadcast channels. The peer listener only
//! hears replicas running in the same process. Separate `edgegridd`
//! processes never receive each other's notices.
//!
//! # Usage
//!
//! ```text
//! edgegridd run --config /etc/edgegrid/edgegrid.toml --listen 0.0.0.0:8443
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use edgegrid_controller::{Controller, Notifiers};
use edgegrid_core::GridConfig;
use edgegrid_notify::{NotifyBus, spawn_listener};
use edgegrid_state::{ObjStore, RedbObjStore};
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[command(name = "edgegridd", about = "edgegrid controller daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a controller replica.
    Run {
        /// Path to edgegrid.toml. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Data directory for the object store; overrides `store.path`.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// API listen address; overrides `api.listen`.
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Replica identity; overrides `replica_id`.
        #[arg(long)]
        replica_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,edgegridd=debug,edgegrid=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            config,
            data_dir,
            listen,
            replica_id,
        } => {
            let mut config = match config {
                Some(path) => GridConfig::from_file(&path)?,
                None => GridConfig::default(),
            };
            if let Some(dir) = data_dir {
                config.store.path = dir.join("edgegrid.redb");
            }
            if let Some(addr) = listen {
                config.api.listen = addr;
            }
            if let Some(id) = replica_id {
                config.replica_id = id;
            }
            run(config).await
        }
    }
}

async fn run(config: GridConfig) -> anyhow::Result<()> {
    info!(replica = %config.replica_id, "edgegrid daemon starting");

    if let Some(dir) = config.store.path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let store: Arc<dyn ObjStore> = Arc::new(RedbObjStore::open(&config.store.path)?);
    info!(path = ?config.store.path, "object store opened");

    // ── Notification buses ─────────────────────────────────────

    let peers = NotifyBus::new(config.notify.capacity);
    let downstream = NotifyBus::new(config.notify.capacity);
    let notify = Notifiers {
        peers: peers.publisher(config.replica_id.clone()),
        downstream: downstream.publisher(config.replica_id.clone()),
    };

    // ── Controllers ────────────────────────────────────────────

    // Subscribe before loading so notices published during init are kept.
    let peer_rx = peers.subscribe();
    let ctrl = Arc::new(Controller::init(store, &config.store, notify).await?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener_handle = spawn_listener(
        peer_rx,
        config.replica_id.clone(),
        Arc::clone(&ctrl),
        shutdown_rx,
    );

    // ── Start API server ───────────────────────────────────────

    let router = edgegrid_api::build_router(ctrl);
    let addr = config.api.listen;

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    let _ = listener_handle.await;

    info!("edgegrid daemon stopped");
    Ok(())
}
