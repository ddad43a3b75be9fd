//! Sweeper CLI - Command-line interface
//!
//! Commands:
//! - play: run a single game, printing the board each turn
//! - batch: run many games and aggregate win/loss statistics

use clap::{Parser, Subcommand};

mod batch;
mod play;

#[derive(Parser)]
#[command(name = "sweeper")]
#[command(about = "Minesweeper deduction solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play::PlayArgs),
    /// Run many games and report statistics
    Batch(batch::BatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Batch(args) => batch::run(args),
    }
}
