//! Play command - run one game, showing the board after every turn

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sweeper_core::{DeductionAI, GameConfig, GameState, GroupPolicy, Probe};

#[derive(Args)]
pub struct PlayArgs {
    /// Board width
    #[arg(long, default_value = "8")]
    pub width: i32,

    /// Board height
    #[arg(long, default_value = "8")]
    pub height: i32,

    /// Number of mines
    #[arg(long, default_value = "10")]
    pub mines: i32,

    /// Game configuration JSON file (overrides width/height/mines)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use the permissive group-building policy
    #[arg(long)]
    pub permissive: bool,

    /// Random seed for mine placement and the solver (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let config = load_config(&args)?;
    let policy = if args.permissive {
        GroupPolicy::Permissive
    } else {
        GroupPolicy::Strict
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(
        "Playing {}x{} with {} mines, seed {}",
        config.width,
        config.height,
        config.mines,
        seed
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut game = GameState::random(config, &mut rng)?;
    let mut solver = DeductionAI::with_seed(config, policy, seed)?;

    let mut turns = 0;
    loop {
        let target = solver.decide().context("solver ran out of probe candidates")?;
        turns += 1;
        println!("turn {}: probe ({}, {})", turns, target.x, target.y);
        match game.probe(target)? {
            Probe::Exploded => {
                println!("{}", game.render(solver.flags(), true));
                println!("Boom. Lost after {} turns.", turns);
                return Ok(());
            }
            Probe::Revealed(update) => {
                solver.apply_update(&update)?;
                println!("{}", game.render(solver.flags(), false));
                if game.is_won() {
                    println!(
                        "Cleared in {} turns, {} mines flagged.",
                        turns,
                        solver.flags().len()
                    );
                    return Ok(());
                }
            }
        }
    }
}

fn load_config(args: &PlayArgs) -> Result<GameConfig> {
    let config = match &args.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::new(args.width, args.height, args.mines),
    };
    config.validate()?;
    Ok(config)
}
