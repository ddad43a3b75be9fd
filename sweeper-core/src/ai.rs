//! Deduction-and-decision engine
//!
//! Runs the two direct inference rules to a fixed point, then pairwise
//! group subtraction, and falls back to local probability estimation when
//! no certain deduction exists.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::board::Pos;
use crate::config::GameConfig;
use crate::error::{Result, SweeperError};
use crate::groups::{build_groups, GroupPolicy};
use crate::knowledge::{BoardKnowledge, TurnUpdate};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default RNG seed for the uniform-random probe fallback
const DEFAULT_SEED: u64 = 42;

// ============================================================================
// DEDUCTION AI
// ============================================================================

/// Outcome of one group-subtraction sweep
enum Subtraction {
    /// A cell proven safe; probe it now
    SafeProbe(Pos),
    /// At least one new mine was flagged; re-run the direct rules
    Marked,
    NoProgress,
}

/// The solver: owns the board knowledge for one game
pub struct DeductionAI {
    knowledge: BoardKnowledge,
    policy: GroupPolicy,
    rng: ChaCha8Rng,
    /// True until the first decision or update; the opening probe is the
    /// fixed top-left corner, no deduction needed on an empty board.
    opening: bool,
}

impl DeductionAI {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, GroupPolicy::default(), DEFAULT_SEED)
    }

    pub fn with_policy(config: GameConfig, policy: GroupPolicy) -> Result<Self> {
        Self::with_seed(config, policy, DEFAULT_SEED)
    }

    pub fn with_seed(config: GameConfig, policy: GroupPolicy, seed: u64) -> Result<Self> {
        Ok(Self {
            knowledge: BoardKnowledge::new(config)?,
            policy,
            rng: ChaCha8Rng::seed_from_u64(seed),
            opening: true,
        })
    }

    pub fn knowledge(&self) -> &BoardKnowledge {
        &self.knowledge
    }

    /// Cells currently believed to be mines, in deduction order
    pub fn flags(&self) -> &[Pos] {
        self.knowledge.flags()
    }

    /// Ingest newly exposed cells from the engine
    pub fn apply_update(&mut self, update: &TurnUpdate) -> Result<()> {
        self.opening = false;
        for &(pos, revealed) in &update.cells {
            self.knowledge.apply_exposure(pos, revealed)?;
        }
        Ok(())
    }

    /// Choose the next probe target
    ///
    /// Flags any mines that became certain along the way; errors if no
    /// unexposed, unflagged cell remains (the engine must not call in
    /// that state).
    pub fn decide(&mut self) -> Result<Pos> {
        if self.opening {
            self.opening = false;
            let corner = Pos::new(0, 0);
            if self.knowledge.cell(corner).is_unresolved() {
                debug!("opening probe at top-left corner");
                return Ok(corner);
            }
        }

        loop {
            self.direct_mine_fixed_point()?;
            if let Some(pos) = self.find_direct_safe() {
                debug!(x = pos.x, y = pos.y, "direct-safe probe");
                return Ok(pos);
            }
            match self.group_subtraction()? {
                Subtraction::SafeProbe(pos) => {
                    debug!(x = pos.x, y = pos.y, "subtraction-safe probe");
                    return Ok(pos);
                }
                // New flags change residual counts elsewhere.
                Subtraction::Marked => continue,
                Subtraction::NoProgress => break,
            }
        }

        self.estimate_probe()
    }

    // ------------------------------------------------------------------------
    // Deduction rules
    // ------------------------------------------------------------------------

    /// Direct-mine rule: when an exposed cell's residual count equals its
    /// unresolved neighbor count, every one of those neighbors is a mine.
    /// Rescans the whole board until a pass produces no new flags.
    fn direct_mine_fixed_point(&mut self) -> Result<()> {
        let grid = self.knowledge.grid();
        loop {
            let mut marked = false;
            for pos in grid.positions() {
                let cell = *self.knowledge.cell(pos);
                if !cell.exposed {
                    continue;
                }
                let unresolved = self.knowledge.unresolved_neighbors(pos);
                if unresolved.is_empty() || unresolved.len() as i32 != cell.neighbor_mines {
                    continue;
                }
                for neighbor in unresolved {
                    marked |= self.knowledge.mark_as_mine(neighbor)?;
                }
            }
            if !marked {
                return Ok(());
            }
        }
    }

    /// Direct-safe rule: an exposed cell with residual count zero has only
    /// safe unresolved neighbors; return one of them.
    fn find_direct_safe(&self) -> Option<Pos> {
        let grid = self.knowledge.grid();
        for pos in grid.positions() {
            let cell = self.knowledge.cell(pos);
            if !cell.exposed || cell.neighbor_mines != 0 {
                continue;
            }
            if let Some(probe) = self.knowledge.unresolved_neighbors(pos).pop() {
                return Some(probe);
            }
        }
        None
    }

    /// Group-subtraction rule: subtract every adjacent group's cells and
    /// mine count from an anchor's residual constraint. A zero residual
    /// over remaining cells proves them safe; under the permissive policy
    /// a residual equal to the remaining cell count proves them mines.
    fn group_subtraction(&mut self) -> Result<Subtraction> {
        let groups = build_groups(&self.knowledge, self.policy);
        let grid = self.knowledge.grid();
        let mut marked = false;

        for pos in grid.positions() {
            let cell = *self.knowledge.cell(pos);
            if !cell.exposed {
                continue;
            }
            let mut remaining = self.knowledge.unresolved_neighbors(pos);
            if remaining.is_empty() && self.policy == GroupPolicy::Strict {
                continue;
            }
            let mut bombs = cell.neighbor_mines;
            for group in groups.iter().filter(|g| g.is_adjacent_to(pos)) {
                remaining.retain(|p| !group.members.contains(p));
                bombs -= group.mines;
            }
            // Sequential subtraction can drive bombs negative, in which
            // case neither branch applies.
            if bombs == 0 {
                if let Some(probe) = remaining.pop() {
                    return Ok(Subtraction::SafeProbe(probe));
                }
            } else if self.policy == GroupPolicy::Permissive
                && bombs > 0
                && bombs == remaining.len() as i32
            {
                for p in remaining {
                    marked |= self.knowledge.mark_as_mine(p)?;
                }
            }
        }

        Ok(if marked {
            Subtraction::Marked
        } else {
            Subtraction::NoProgress
        })
    }

    // ------------------------------------------------------------------------
    // Probability estimation
    // ------------------------------------------------------------------------

    /// No certain deduction: pick the locally least risky neighbor if it
    /// beats the global baseline, else an untouched corner, else a
    /// uniform-random candidate.
    fn estimate_probe(&mut self) -> Result<Pos> {
        let grid = self.knowledge.grid();
        let candidates = self.knowledge.candidates();
        if candidates.is_empty() {
            return Err(SweeperError::NoProbeCandidate);
        }

        let mut min_chance = f64::INFINITY;
        let mut best: Option<Pos> = None;
        for pos in grid.positions() {
            let cell = self.knowledge.cell(pos);
            if !cell.exposed {
                continue;
            }
            let unresolved = self.knowledge.unresolved_neighbors(pos);
            if unresolved.is_empty() {
                continue;
            }
            let chance = cell.neighbor_mines as f64 / unresolved.len() as f64;
            if chance < min_chance {
                min_chance = chance;
                best = Some(unresolved[0]);
            }
        }

        // candidates is non-empty, so unresolved_cells > 0 here.
        let baseline =
            self.knowledge.mines_remaining() as f64 / self.knowledge.unresolved_cells() as f64;

        if let Some(pos) = best {
            if min_chance <= baseline {
                debug!(chance = min_chance, baseline, "informed probe");
                return Ok(pos);
            }
        }

        for corner in grid.corners() {
            if self.knowledge.cell(corner).is_unresolved() {
                debug!(x = corner.x, y = corner.y, "corner probe");
                return Ok(corner);
            }
        }

        let pick = candidates[self.rng.gen_range(0..candidates.len())];
        debug!(x = pick.x, y = pick.y, "random probe");
        Ok(pick)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ai(width: i32, height: i32, mines: i32) -> DeductionAI {
        DeductionAI::new(GameConfig::new(width, height, mines)).unwrap()
    }

    fn update(cells: &[(Pos, i32)]) -> TurnUpdate {
        TurnUpdate { cells: cells.to_vec() }
    }

    #[test]
    fn test_opening_probe_is_top_left() {
        let mut solver = ai(8, 8, 10);
        assert_eq!(solver.decide().unwrap(), Pos::new(0, 0));
    }

    #[test]
    fn test_direct_mine_marks_all_neighbors() {
        // Center of a 3x3 sees 8 mines: every neighbor is certain.
        let mut solver = ai(3, 3, 8);
        solver.apply_update(&update(&[(Pos::new(1, 1), 8)])).unwrap();
        let result = solver.decide();
        assert!(matches!(result, Err(SweeperError::NoProbeCandidate)));
        assert_eq!(solver.flags().len(), 8);
        assert!(!solver.flags().contains(&Pos::new(1, 1)));
    }

    #[test]
    fn test_direct_mine_fixed_point_is_idempotent() {
        let mut solver = ai(3, 3, 8);
        solver.apply_update(&update(&[(Pos::new(1, 1), 8)])).unwrap();
        assert!(solver.decide().is_err());
        let flags_after_first = solver.flags().len();
        assert!(solver.decide().is_err());
        assert_eq!(solver.flags().len(), flags_after_first);
    }

    #[test]
    fn test_direct_mine_cascade() {
        // Flagging (1,0) from the count at (0,0) drops (2,0)'s residual to
        // 1 over {(2,1)}, so the second pass flags (2,1) as well.
        let mut solver = ai(3, 3, 2);
        solver
            .apply_update(&update(&[
                (Pos::new(0, 0), 1),
                (Pos::new(2, 0), 2),
                (Pos::new(0, 1), 1),
                (Pos::new(1, 1), 2),
                (Pos::new(0, 2), 0),
                (Pos::new(1, 2), 1),
                (Pos::new(2, 2), 1),
            ]))
            .unwrap();
        let result = solver.decide();
        assert!(matches!(result, Err(SweeperError::NoProbeCandidate)));
        assert_eq!(solver.flags(), &[Pos::new(1, 0), Pos::new(2, 1)]);
    }

    #[test]
    fn test_direct_safe_returns_unresolved_neighbor() {
        let mut solver = ai(3, 3, 1);
        solver.apply_update(&update(&[(Pos::new(0, 0), 0)])).unwrap();
        let probe = solver.decide().unwrap();
        let neighbors = [Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)];
        assert!(neighbors.contains(&probe));
    }

    /// Bottom rows exposed against an unresolved top row, the flat 1-2-1-1
    /// wall. Subtracting the (0,1) group from the (2,1) anchor leaves zero
    /// bombs over {(1,0)}, a proven-safe probe.
    fn wall_update() -> TurnUpdate {
        update(&[
            (Pos::new(0, 1), 1),
            (Pos::new(1, 1), 2),
            (Pos::new(2, 1), 1),
            (Pos::new(3, 1), 1),
            (Pos::new(0, 2), 0),
            (Pos::new(1, 2), 0),
            (Pos::new(2, 2), 0),
            (Pos::new(3, 2), 0),
        ])
    }

    #[test]
    fn test_subtraction_finds_safe_probe() {
        let mut solver = ai(4, 3, 2);
        solver.apply_update(&wall_update()).unwrap();
        assert_eq!(solver.decide().unwrap(), Pos::new(1, 0));
        assert!(solver.flags().is_empty());
    }

    #[test]
    fn test_permissive_subtraction_marks_mines() {
        // Same wall: the (1,1) anchor minus the (0,1) group leaves one bomb
        // over {(2,0)}, which the permissive policy flags.
        let mut solver =
            DeductionAI::with_policy(GameConfig::new(4, 3, 2), GroupPolicy::Permissive).unwrap();
        solver.apply_update(&wall_update()).unwrap();
        let probe = solver.decide().unwrap();
        assert_eq!(solver.flags(), &[Pos::new(2, 0)]);
        // The flag resolves (3,1) to zero bombs over {(3,0)}.
        assert_eq!(probe, Pos::new(3, 0));
    }

    #[test]
    fn test_informed_probe_beats_baseline() {
        // Local chance 1/8 ties the baseline 3/24; the informed pick wins
        // ties and takes the first unresolved neighbor.
        let mut solver = ai(5, 5, 3);
        solver.apply_update(&update(&[(Pos::new(2, 2), 1)])).unwrap();
        assert_eq!(solver.decide().unwrap(), Pos::new(1, 1));
    }

    #[test]
    fn test_corner_heuristic() {
        // Local chance 5/8 exceeds the baseline 8/15: fall back to the
        // first untouched corner in priority order.
        let mut solver = ai(4, 4, 8);
        solver.apply_update(&update(&[(Pos::new(2, 2), 5)])).unwrap();
        assert_eq!(solver.decide().unwrap(), Pos::new(0, 0));
    }

    #[test]
    fn test_corner_priority_order() {
        // Top-left is exposed, so the bottom-left corner is next in line.
        let mut solver = ai(4, 4, 8);
        solver
            .apply_update(&update(&[(Pos::new(0, 0), 2), (Pos::new(2, 2), 5)]))
            .unwrap();
        assert_eq!(solver.decide().unwrap(), Pos::new(0, 3));
    }

    #[test]
    fn test_random_fallback_when_corners_taken() {
        // All four corners exposed, every local chance above the baseline.
        let mut solver = ai(3, 3, 1);
        solver
            .apply_update(&update(&[
                (Pos::new(0, 0), 1),
                (Pos::new(2, 0), 1),
                (Pos::new(0, 2), 1),
                (Pos::new(2, 2), 1),
            ]))
            .unwrap();
        let probe = solver.decide().unwrap();
        assert!(solver.knowledge().cell(probe).is_unresolved());
    }

    #[test]
    fn test_decide_fails_on_resolved_board() {
        let mut solver = ai(1, 1, 0);
        solver.apply_update(&update(&[(Pos::new(0, 0), 0)])).unwrap();
        assert!(matches!(solver.decide(), Err(SweeperError::NoProbeCandidate)));
    }
}
