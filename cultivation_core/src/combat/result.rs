//! BattleOutcome - the result of resolving one battle

use serde::{Deserialize, Serialize};

use super::stats::CombatStats;

/// Outcome of a battle: winner/loser ids (both `None` on a draw), the final
/// snapshots for both sides, a human-readable round-by-round log, and the
/// round count the battle actually ran for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub attacker_final: CombatStats,
    pub defender_final: CombatStats,
    pub log: Vec<String>,
    pub rounds: u32,
}

impl BattleOutcome {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none() && self.loser.is_none()
    }
}
