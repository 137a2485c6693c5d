//! kjd: the kj daemon.
//!
//! Opens the queue store and serves the remote-control API until Ctrl-C.
//!
//! # Usage
//!
//! ```text
//! kjd serve --config kj.toml --port 5000 --data-dir ~/kjdata
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use kj_core::KjConfig;
use kj_store::{EntryStore, QueueStore};

#[derive(Parser)]
#[command(name = "kjd", about = "kj daemon — karaoke singer rotation", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the queue API.
    Serve {
        /// Path to kj.toml (defaults apply when the file is absent).
        #[arg(short, long, default_value = "kj.toml")]
        config: PathBuf,

        /// Port to listen on (overrides [server].port).
        #[arg(long)]
        port: Option<u16>,

        /// Directory for the queue database (overrides [store].data_dir).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kjd=debug,kj_rotation=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            port,
            data_dir,
        } => {
            let mut config = KjConfig::load_or_default(&config)
                .with_context(|| format!("reading {}", config.display()))?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.store.data_dir = data_dir;
            }
            serve(config).await
        }
    }
}

async fn serve(config: KjConfig) -> anyhow::Result<()> {
    info!(show = %config.show.name, "kj daemon starting");

    // Ensure data directory exists.
    std::fs::create_dir_all(&config.store.data_dir)?;
    let db_path = config.db_path();

    let store = QueueStore::open(&db_path)?;
    info!(path = ?db_path, singers = store.read_all()?.len(), "queue store opened");

    let router = kj_api::build_router(store);
    let ip: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid [server].host {:?}", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => {
                    warn!(error = %e, "failed to install Ctrl-C handler, running until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    info!("kj daemon stopped");
    Ok(())
}
