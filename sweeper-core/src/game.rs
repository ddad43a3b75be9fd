//! Ground-truth game engine and turn sequencing
//!
//! Holds the actual mine placement and exposes cells in response to
//! probes. The solver never sees this state directly; it only receives
//! `TurnUpdate`s, and each cell is delivered at most once per game.

use rand::prelude::*;

use crate::ai::DeductionAI;
use crate::board::{Grid, Pos};
use crate::config::GameConfig;
use crate::error::{Result, SweeperError};
use crate::knowledge::TurnUpdate;

// ============================================================================
// GAME STATE
// ============================================================================

/// Result of probing one cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Probe {
    /// The probed cell was a mine; the game is lost
    Exploded,
    /// Newly exposed cells and their neighbor-mine counts
    Revealed(TurnUpdate),
}

/// One game's ground truth
#[derive(Clone, Debug)]
pub struct GameState {
    grid: Grid,
    mines: Vec<bool>,
    counts: Vec<i32>,
    exposed: Vec<bool>,
    mine_count: i32,
    exposed_count: i32,
    lost: bool,
}

impl GameState {
    /// Place mines uniformly at random. Mines are placed up front; there
    /// is no first-probe safety zone, so the opening probe can lose.
    pub fn random<R: Rng>(config: GameConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        let mut mines = vec![false; grid.cell_count() as usize];
        for idx in rand::seq::index::sample(rng, mines.len(), config.mines as usize) {
            mines[idx] = true;
        }
        Ok(Self::from_mine_field(grid, mines, config.mines))
    }

    /// Place mines at explicit positions, for deterministic games
    pub fn with_mines(width: i32, height: i32, mine_positions: &[Pos]) -> Result<Self> {
        let grid = Grid::new(width, height);
        GameConfig::new(width, height, mine_positions.len() as i32).validate()?;
        let mut mines = vec![false; grid.cell_count() as usize];
        for &pos in mine_positions {
            if !grid.contains(pos) {
                return Err(SweeperError::OutOfBounds(pos));
            }
            mines[grid.index(pos)] = true;
        }
        let mine_count = mines.iter().filter(|m| **m).count() as i32;
        Ok(Self::from_mine_field(grid, mines, mine_count))
    }

    fn from_mine_field(grid: Grid, mines: Vec<bool>, mine_count: i32) -> Self {
        let counts = grid
            .positions()
            .map(|pos| {
                grid.neighbors(pos)
                    .into_iter()
                    .filter(|n| mines[grid.index(*n)])
                    .count() as i32
            })
            .collect();
        Self {
            grid,
            mines,
            counts,
            exposed: vec![false; grid.cell_count() as usize],
            mine_count,
            exposed_count: 0,
            lost: false,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new(self.grid.width, self.grid.height, self.mine_count)
    }

    pub fn is_mine(&self, pos: Pos) -> bool {
        self.mines[self.grid.index(pos)]
    }

    pub fn is_exposed(&self, pos: Pos) -> bool {
        self.exposed[self.grid.index(pos)]
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Won when every non-mine cell is exposed
    pub fn is_won(&self) -> bool {
        !self.lost && self.exposed_count == self.grid.cell_count() - self.mine_count
    }

    /// Probe one cell. A mine loses the game; a safe cell is exposed, and
    /// a zero-count cell flood-exposes its connected zero region plus the
    /// numbered boundary. Every cell appears in at most one update.
    pub fn probe(&mut self, pos: Pos) -> Result<Probe> {
        if !self.grid.contains(pos) {
            return Err(SweeperError::OutOfBounds(pos));
        }
        if self.exposed[self.grid.index(pos)] {
            return Err(SweeperError::AlreadyExposed(pos));
        }
        if self.mines[self.grid.index(pos)] {
            self.lost = true;
            return Ok(Probe::Exploded);
        }

        let mut update = TurnUpdate::default();
        let mut frontier = vec![pos];
        while let Some(cell) = frontier.pop() {
            let idx = self.grid.index(cell);
            if self.exposed[idx] {
                continue;
            }
            self.exposed[idx] = true;
            self.exposed_count += 1;
            update.cells.push((cell, self.counts[idx]));
            if self.counts[idx] == 0 {
                for neighbor in self.grid.neighbors(cell) {
                    let n = self.grid.index(neighbor);
                    if !self.exposed[n] && !self.mines[n] {
                        frontier.push(neighbor);
                    }
                }
            }
        }
        Ok(Probe::Revealed(update))
    }

    /// Plain-text view of the visible board: `.` unexposed, `F` flagged,
    /// a space for exposed zero, the count otherwise, `*` for mines when
    /// revealing after a loss.
    pub fn render(&self, flags: &[Pos], reveal_mines: bool) -> String {
        let mut out = String::new();
        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                let pos = Pos::new(x, y);
                let idx = self.grid.index(pos);
                let ch = if reveal_mines && self.mines[idx] {
                    '*'
                } else if flags.contains(&pos) {
                    'F'
                } else if self.exposed[idx] {
                    match self.counts[idx] {
                        0 => ' ',
                        c => char::from_digit(c as u32, 10).unwrap_or('?'),
                    }
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// TURN SEQUENCING
// ============================================================================

/// Outcome of one completed game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub won: bool,
    pub turns: u32,
}

/// Run decide/probe/update to completion
///
/// Strictly serialized: each decision runs against the knowledge produced
/// by all prior updates. Errors only on contract violations (the solver
/// flagging itself into a corner with no probe candidate left).
pub fn run_game(game: &mut GameState, solver: &mut DeductionAI) -> Result<GameOutcome> {
    let mut turns = 0;
    loop {
        let target = solver.decide()?;
        turns += 1;
        match game.probe(target)? {
            Probe::Exploded => return Ok(GameOutcome { won: false, turns }),
            Probe::Revealed(update) => {
                solver.apply_update(&update)?;
                if game.is_won() {
                    return Ok(GameOutcome { won: true, turns });
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_placement_matches_config() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let game = GameState::random(GameConfig::beginner(), &mut rng).unwrap();
        let mines = game.grid().positions().filter(|p| game.is_mine(*p)).count();
        assert_eq!(mines, 10);
    }

    #[test]
    fn test_probe_mine_loses() {
        let mut game = GameState::with_mines(3, 3, &[Pos::new(1, 1)]).unwrap();
        assert_eq!(game.probe(Pos::new(1, 1)).unwrap(), Probe::Exploded);
        assert!(game.is_lost());
        assert!(!game.is_won());
    }

    #[test]
    fn test_probe_numbered_cell_exposes_one() {
        let mut game = GameState::with_mines(3, 3, &[Pos::new(1, 1)]).unwrap();
        match game.probe(Pos::new(0, 0)).unwrap() {
            Probe::Revealed(update) => {
                assert_eq!(update.cells, vec![(Pos::new(0, 0), 1)]);
            }
            Probe::Exploded => panic!("probed a safe cell"),
        }
    }

    #[test]
    fn test_zero_probe_floods_region() {
        // Single mine in the far corner: one probe exposes everything else.
        let mut game = GameState::with_mines(4, 4, &[Pos::new(3, 3)]).unwrap();
        match game.probe(Pos::new(0, 0)).unwrap() {
            Probe::Revealed(update) => {
                assert_eq!(update.cells.len(), 15);
                assert!(update.cells.iter().all(|(p, _)| *p != Pos::new(3, 3)));
            }
            Probe::Exploded => panic!("probed a safe cell"),
        }
        assert!(game.is_won());
    }

    #[test]
    fn test_cells_delivered_at_most_once() {
        // A full mine wall at x=2 splits the board; the flood from (0,0)
        // stops at the numbered column x=1.
        let wall: Vec<Pos> = (0..5).map(|y| Pos::new(2, y)).collect();
        let mut game = GameState::with_mines(5, 5, &wall).unwrap();
        let mut seen = std::collections::HashSet::new();
        for probe in [Pos::new(0, 0), Pos::new(3, 0), Pos::new(4, 0)] {
            if let Probe::Revealed(update) = game.probe(probe).unwrap() {
                assert!(!update.cells.is_empty());
                for (pos, _) in update.cells {
                    assert!(seen.insert(pos), "cell delivered twice: {:?}", pos);
                }
            }
        }
        // Every non-mine cell exactly once across the three updates.
        assert_eq!(seen.len(), 20);
        assert!(game.is_won());
    }

    #[test]
    fn test_probe_exposed_cell_rejected() {
        let mut game = GameState::with_mines(3, 3, &[Pos::new(2, 2)]).unwrap();
        game.probe(Pos::new(0, 0)).unwrap();
        assert!(game.probe(Pos::new(0, 0)).is_err());
    }

    #[test]
    fn test_run_game_flood_win_in_one_turn() {
        let mut game = GameState::with_mines(4, 4, &[Pos::new(3, 3)]).unwrap();
        let mut solver = DeductionAI::new(game.config()).unwrap();
        let outcome = run_game(&mut game, &mut solver).unwrap();
        assert!(outcome.won);
        assert_eq!(outcome.turns, 1);
    }

    #[test]
    fn test_render_visible_state() {
        let mut game = GameState::with_mines(3, 3, &[Pos::new(2, 0)]).unwrap();
        game.probe(Pos::new(0, 2)).unwrap();
        let view = game.render(&[Pos::new(2, 0)], false);
        // The flood from (0,2) exposes everything but the mine's own cell.
        assert_eq!(view, " 1F\n 11\n   \n");
        let revealed = game.render(&[], true);
        assert!(revealed.contains('*'));
    }
}
