//! Board knowledge store: what the solver has learned so far
//!
//! Exclusive owner of per-cell state. Mutated only in response to engine
//! updates (`apply_exposure`) and the solver's own deductions (`mark_as_mine`).

use serde::{Deserialize, Serialize};

use crate::board::{Grid, Pos};
use crate::config::GameConfig;
use crate::error::{Result, SweeperError};

// ============================================================================
// CELL
// ============================================================================

/// Per-cell solver knowledge
///
/// `neighbor_mines` is signed: flags placed around a still-unexposed cell
/// decrement it below zero, and the additive exposure update brings the
/// residual back to its true value once the cell's own count arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub exposed: bool,
    pub flagged: bool,
    pub neighbor_mines: i32,
}

impl Cell {
    /// A cell that is neither exposed nor flagged
    pub fn is_unresolved(&self) -> bool {
        !self.exposed && !self.flagged
    }
}

// ============================================================================
// TURN UPDATE
// ============================================================================

/// Newly exposed cells since the last decision, with their revealed counts
///
/// The engine delivers each cell at most once per game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnUpdate {
    pub cells: Vec<(Pos, i32)>,
}

// ============================================================================
// BOARD KNOWLEDGE
// ============================================================================

/// The solver's view of one game in progress
#[derive(Clone, Debug)]
pub struct BoardKnowledge {
    grid: Grid,
    cells: Vec<Cell>,
    /// Append-only record of cells deduced to be mines
    flags: Vec<Pos>,
    mines_remaining: i32,
    unresolved_cells: i32,
}

impl BoardKnowledge {
    /// Fresh knowledge for a new game: all cells unresolved, counters from config
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        Ok(Self {
            grid,
            cells: vec![Cell::default(); grid.cell_count() as usize],
            flags: Vec::new(),
            mines_remaining: config.mines,
            unresolved_cells: grid.cell_count(),
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[self.grid.index(pos)]
    }

    /// Cells deduced to be mines, in deduction order
    pub fn flags(&self) -> &[Pos] {
        &self.flags
    }

    pub fn mines_remaining(&self) -> i32 {
        self.mines_remaining
    }

    pub fn unresolved_cells(&self) -> i32 {
        self.unresolved_cells
    }

    /// Neighbors of `pos` that are neither exposed nor flagged
    ///
    /// Recomputed fresh on every call: state mutates between calls within
    /// one decision cycle.
    pub fn unresolved_neighbors(&self, pos: Pos) -> Vec<Pos> {
        self.grid
            .neighbors(pos)
            .into_iter()
            .filter(|p| self.cell(*p).is_unresolved())
            .collect()
    }

    /// Mark `pos` exposed with its revealed neighbor-mine count
    ///
    /// The count is added, not overwritten: mines already deduced around
    /// `pos` have pre-decremented the stored value, and the sum is the
    /// residual the deduction rules need.
    pub fn apply_exposure(&mut self, pos: Pos, revealed: i32) -> Result<()> {
        if !self.grid.contains(pos) {
            return Err(SweeperError::OutOfBounds(pos));
        }
        if self.cells[self.grid.index(pos)].exposed {
            return Err(SweeperError::AlreadyExposed(pos));
        }
        let idx = self.grid.index(pos);
        self.cells[idx].exposed = true;
        self.cells[idx].neighbor_mines += revealed;
        self.unresolved_cells -= 1;
        Ok(())
    }

    /// Record that `pos` is a mine
    ///
    /// No-op when the mine budget is exhausted or the cell is already
    /// flagged. Otherwise flags the cell, updates both counters, and
    /// decrements every in-board neighbor's count so future deductions
    /// work with residual counts. Returns whether a change occurred.
    pub fn mark_as_mine(&mut self, pos: Pos) -> Result<bool> {
        if !self.grid.contains(pos) {
            return Err(SweeperError::OutOfBounds(pos));
        }
        let idx = self.grid.index(pos);
        if self.mines_remaining == 0 || self.cells[idx].flagged {
            return Ok(false);
        }
        self.cells[idx].flagged = true;
        self.flags.push(pos);
        self.mines_remaining -= 1;
        self.unresolved_cells -= 1;
        for neighbor in self.grid.neighbors(pos) {
            let n = self.grid.index(neighbor);
            self.cells[n].neighbor_mines -= 1;
        }
        tracing::debug!(x = pos.x, y = pos.y, remaining = self.mines_remaining, "flagged mine");
        Ok(true)
    }

    /// All unexposed, unflagged positions in row-major order
    pub fn candidates(&self) -> Vec<Pos> {
        self.grid
            .positions()
            .filter(|p| self.cell(*p).is_unresolved())
            .collect()
    }
}
