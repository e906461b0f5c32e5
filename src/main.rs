mod cli;
mod cluster;
mod config;
mod dataset;
mod embedding;
mod error;
mod pipeline;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "corral", version, about = "Semantic email clustering")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample emails from the message vault into the dataset file
    Extract,
    /// Embed the sampled emails and write cluster assignments
    Cluster {
        /// Override the configured cluster count
        #[arg(short = 'k', long)]
        clusters: Option<usize>,
        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding model to ~/.corral/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::CorralConfig::load()?;

    // Initialize tracing with the configured log level, on stderr so stdout
    // stays clean for the run summary.
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Extract => {
            cli::extract::extract(&config)?;
        }
        Command::Cluster { clusters, seed } => {
            if let Some(k) = clusters {
                config.clustering.clusters = k;
            }
            if let Some(seed) = seed {
                config.clustering.seed = seed;
            }
            cli::cluster::cluster(&config)?;
        }
        Command::Model { action } => match action {
            ModelAction::Download => {
                cli::model_download(&config.embedding).await?;
            }
        },
    }

    Ok(())
}
