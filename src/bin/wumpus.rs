//! Wumpus CLI - train and run tabular Q-learning agents for the Wumpus World
//!
//! This CLI provides a unified interface for:
//! - Training an agent on premade, random or file-based maps
//! - Playing greedy games with a saved agent
//! - Inspecting the learned values of a single state

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wumpus")]
#[command(version, about = "Q-learning toolkit for the Wumpus World", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent
    Train(Box<wumpus::cli::commands::train::TrainArgs>),

    /// Play greedy games with a trained agent
    Play(wumpus::cli::commands::play::PlayArgs),

    /// Inspect learned values for a state
    Inspect(wumpus::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Train(args) => wumpus::cli::commands::train::execute(*args),
        Commands::Play(args) => wumpus::cli::commands::play::execute(args),
        Commands::Inspect(args) => wumpus::cli::commands::inspect::execute(args),
    }
}
