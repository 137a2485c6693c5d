use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kj_core::KjConfig;

mod commands;

/// Log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn,kj=info,kj_rotation=info";

#[derive(Parser)]
#[command(
    name = "kj",
    about = "kj: karaoke singer rotation",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to kj.toml (defaults apply when the file is absent)
    #[arg(short, long, global = true, default_value = "kj.toml")]
    config: PathBuf,
    /// Override the queue database directory ([store].data_dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a kj.toml scaffold
    Init {
        /// Directory to write kj.toml into
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Name of the show
        #[arg(short, long, default_value = "karaoke night")]
        name: String,
    },
    /// Sign a singer up for the next free round
    Register {
        name: String,
    },
    /// Sort the queue and put the first two singers on deck.
    ///
    /// Refuses to run while someone is already on stage unless --force is
    /// given; a forced start reseats the first two rows and sends anyone
    /// else on deck back to waiting.
    Start {
        #[arg(long)]
        force: bool,
    },
    /// The current singer is done; move everyone up
    Advance,
    /// Swap the current singer with the one up next
    Skip,
    /// Show who would be called up next
    Next,
    /// Print the queue
    Queue {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = KjConfig::load_or_default(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.store.data_dir = data_dir;
    }

    match cli.command {
        Commands::Init { path, name } => commands::init::init(&path, &name),
        Commands::Register { name } => commands::show::register(&config, &name),
        Commands::Start { force } => commands::show::start(&config, force),
        Commands::Advance => commands::show::advance(&config),
        Commands::Skip => commands::show::skip(&config),
        Commands::Next => commands::queue::next(&config),
        Commands::Queue { format } => commands::queue::queue(&config, &format),
    }
}
