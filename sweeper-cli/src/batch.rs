//! Batch command - run many games and aggregate statistics
//!
//! Each game gets its own derived seed so a batch is reproducible from
//! the base seed alone.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::ProgressBar;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use sweeper_core::{run_game, DeductionAI, GameConfig, GameState, GroupPolicy};

#[derive(Args)]
pub struct BatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

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

    /// Base random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregated batch results
#[derive(Clone, Debug, Serialize)]
struct BatchReport {
    timestamp: String,
    width: i32,
    height: i32,
    mines: i32,
    policy: String,
    games: usize,
    wins: usize,
    losses: usize,
    /// Games abandoned because the solver flagged away every candidate
    stalled: usize,
    win_rate: f64,
    avg_turns: f64,
    avg_duration_ms: f64,
}

/// Run batch command
pub fn run(args: BatchArgs) -> Result<()> {
    let config = load_config(&args)?;
    let policy = if args.permissive {
        GroupPolicy::Permissive
    } else {
        GroupPolicy::Strict
    };
    tracing::info!(
        "Batch: {} games on {}x{} with {} mines",
        args.games,
        config.width,
        config.height,
        config.mines
    );

    let progress = ProgressBar::new(args.games as u64);
    let mut wins = 0;
    let mut losses = 0;
    let mut stalled = 0;
    let mut total_turns = 0u64;
    let mut total_time = Duration::ZERO;

    for game_number in 0..args.games {
        let seed = args.seed.wrapping_add(game_number as u64);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = GameState::random(config, &mut rng)?;
        let mut solver = DeductionAI::with_seed(config, policy, seed)?;

        let start = Instant::now();
        match run_game(&mut game, &mut solver) {
            Ok(outcome) => {
                total_turns += outcome.turns as u64;
                if outcome.won {
                    wins += 1;
                } else {
                    losses += 1;
                }
            }
            Err(e) => {
                tracing::warn!("game {} stalled: {}", game_number, e);
                stalled += 1;
            }
        }
        total_time += start.elapsed();
        progress.inc(1);
    }
    progress.finish_and_clear();

    let report = BatchReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        width: config.width,
        height: config.height,
        mines: config.mines,
        policy: format!("{:?}", policy),
        games: args.games,
        wins,
        losses,
        stalled,
        win_rate: wins as f64 / args.games.max(1) as f64,
        avg_turns: total_turns as f64 / args.games.max(1) as f64,
        avg_duration_ms: total_time.as_secs_f64() * 1000.0 / args.games.max(1) as f64,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report_text(&report);
    }
    Ok(())
}

fn report_text(report: &BatchReport) {
    println!(
        "{} games on {}x{} with {} mines ({} policy)",
        report.games, report.width, report.height, report.mines, report.policy
    );
    println!(
        "  wins: {} ({:.1}%), losses: {}, stalled: {}",
        report.wins,
        report.win_rate * 100.0,
        report.losses,
        report.stalled
    );
    println!(
        "  avg turns: {:.1}, avg duration: {:.2} ms",
        report.avg_turns, report.avg_duration_ms
    );
}

fn load_config(args: &BatchArgs) -> Result<GameConfig> {
    let config = match &args.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::new(args.width, args.height, args.mines),
    };
    config.validate()?;
    Ok(config)
}
