//! Constraint groups: one exposed cell's residual count over its
//! unresolved neighborhood
//!
//! Groups are ephemeral. They are rebuilt every decision cycle because
//! flags and exposures change between cycles.

use serde::{Deserialize, Serialize};

use crate::board::Pos;
use crate::knowledge::BoardKnowledge;

/// Which exposed cells get a constraint group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupPolicy {
    /// Only exposed cells with at least one unresolved neighbor.
    /// The subtraction rule's mark sub-case never fires under this policy
    /// (it would require zero bombs over zero cells, a no-op).
    #[default]
    Strict,
    /// Every exposed cell, including degenerate empty groups. The
    /// subtraction rule may also mark mines whenever the residual bomb
    /// count equals the number of remaining cells.
    Permissive,
}

/// Anchor cell, residual mine count, and unresolved neighbor set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintGroup {
    pub anchor: Pos,
    pub mines: i32,
    pub members: Vec<Pos>,
}

impl ConstraintGroup {
    /// Adjacency test for pairwise subtraction: true iff the anchor differs
    /// from `pos` and every member cell is within Chebyshev distance 1 of
    /// `pos`. Deliberately asymmetric (it never looks at the anchor's own
    /// distance) and vacuously true for empty member sets; a heuristic
    /// proxy for shared local context rather than true overlap detection.
    pub fn is_adjacent_to(&self, pos: Pos) -> bool {
        self.anchor != pos && self.members.iter().all(|m| m.chebyshev(pos) <= 1)
    }
}

/// Build the groups for the current knowledge snapshot
pub fn build_groups(knowledge: &BoardKnowledge, policy: GroupPolicy) -> Vec<ConstraintGroup> {
    let mut groups = Vec::new();
    for pos in knowledge.grid().positions() {
        if !knowledge.cell(pos).exposed {
            continue;
        }
        let members = knowledge.unresolved_neighbors(pos);
        if members.is_empty() && policy == GroupPolicy::Strict {
            continue;
        }
        groups.push(ConstraintGroup {
            anchor: pos,
            mines: knowledge.cell(pos).neighbor_mines,
            members,
        });
    }
    groups
}
