//! Crate error type: caller-contract violations surface here

use crate::board::Pos;

#[derive(Debug, thiserror::Error)]
pub enum SweeperError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("position ({}, {}) is outside the board", .0.x, .0.y)]
    OutOfBounds(Pos),

    #[error("cell ({}, {}) is already exposed", .0.x, .0.y)]
    AlreadyExposed(Pos),

    #[error("no unexposed, unflagged cell remains to probe")]
    NoProbeCandidate,
}

pub type Result<T> = std::result::Result<T, SweeperError>;
