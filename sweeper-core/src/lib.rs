//! Sweeper Core - Minesweeper deduction engine
//!
//! This crate provides the solver and a reference game engine:
//! - Board geometry (rectangular grid, 8-neighborhoods)
//! - Board knowledge store with residual neighbor-mine counts
//! - Constraint groups and pairwise subtraction
//! - Fixed-point deduction with probability-estimation fallback
//! - Ground-truth game state and turn sequencing

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod groups;
pub mod knowledge;

// Re-exports for convenient access
pub use ai::DeductionAI;
pub use board::{Grid, Pos, NEIGHBOR_OFFSETS};
pub use config::GameConfig;
pub use error::{Result, SweeperError};
pub use game::{run_game, GameOutcome, GameState, Probe};
pub use groups::{build_groups, ConstraintGroup, GroupPolicy};
pub use knowledge::{BoardKnowledge, Cell, TurnUpdate};
