//! The shared world boss resource: at most one active at a
//! time, contested by concurrent challengers via compare-and-swap on hp.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossStatus {
    Alive,
    Defeated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldBoss {
    pub id: String,
    pub name: String,
    pub realm_tag: String,
    pub hp: i64,
    pub max_hp: i64,
    pub atk: i64,
    pub defense_percent: u8,
    pub stone_reward: u64,
    pub spawned_at: i64,
    pub status: BossStatus,
}

impl WorldBoss {
    pub fn new(id: impl Into<String>, name: impl Into<String>, realm_tag: impl Into<String>, max_hp: i64, atk: i64, defense_percent: u8, stone_reward: u64, spawned_at: i64) -> Self {
        WorldBoss {
            id: id.into(),
            name: name.into(),
            realm_tag: realm_tag.into(),
            hp: max_hp,
            max_hp,
            atk,
            defense_percent: defense_percent.min(100),
            stone_reward,
            spawned_at,
            status: BossStatus::Alive,
        }
    }
}

/// The outcome of one challenger's contest against the current boss.
#[derive(Debug, Clone, PartialEq)]
pub enum BossChallengeOutcome {
    /// This challenger's hit was the one that flipped `alive -> defeated`.
    KillingBlow { stone_reward: u64 },
    /// The boss survived this hit.
    DamageDealt { remaining_hp: i64 },
    /// The boss was already defeated by someone else before this
    /// challenger's transaction committed; consolation reward proportional
    /// to damage dealt, capped at 30% of the full reward.
    Consolation { stone_reward: u64 },
    NoBossActive,
}

/// Guards the single active `WorldBoss` and the per-user damage tally
/// (`world_boss_participants`). A plain `std::sync::Mutex` serializes
/// concurrent challengers without pulling in an async runtime the rest of
/// the crate doesn't use.
#[derive(Debug, Default)]
pub struct WorldBossArena {
    boss: Mutex<Option<WorldBoss>>,
    participants: Mutex<HashMap<String, i64>>,
}

const CONSOLATION_RATIO: f64 = 0.3;

impl WorldBossArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&self, boss: WorldBoss) {
        *self.boss.lock().unwrap() = Some(boss);
        self.participants.lock().unwrap().clear();
    }

    pub fn snapshot(&self) -> Option<WorldBoss> {
        self.boss.lock().unwrap().clone()
    }

    pub fn damage_dealt_by(&self, user_id: &str) -> i64 {
        self.participants.lock().unwrap().get(user_id).copied().unwrap_or(0)
    }

    /// Resolve one challenger's contest: reads the current boss hp inside
    /// the lock, resolves the compare-and-swap, and applies the killing-blow
    /// vs. consolation reward rule.
    pub fn resolve_challenge(&self, user_id: &str, damage_dealt: i64) -> BossChallengeOutcome {
        let mut guard = self.boss.lock().unwrap();
        let Some(boss) = guard.as_mut() else {
            return BossChallengeOutcome::NoBossActive;
        };

        *self.participants.lock().unwrap().entry(user_id.to_string()).or_insert(0) += damage_dealt;

        if boss.status == BossStatus::Defeated {
            let consolation = (boss.stone_reward as f64 * (damage_dealt as f64 / boss.max_hp as f64) * CONSOLATION_RATIO)
                .min(boss.stone_reward as f64 * CONSOLATION_RATIO)
                .max(0.0) as u64;
            return BossChallengeOutcome::Consolation { stone_reward: consolation };
        }

        boss.hp = (boss.hp - damage_dealt).max(0);
        if boss.hp == 0 {
            boss.status = BossStatus::Defeated;
            BossChallengeOutcome::KillingBlow {
                stone_reward: boss.stone_reward,
            }
        } else {
            BossChallengeOutcome::DamageDealt { remaining_hp: boss.hp }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_to_zero_hp_gets_the_killing_blow() {
        let arena = WorldBossArena::new();
        arena.spawn(WorldBoss::new("b1", "Ashen Tyrant", "golden_core", 100, 50, 20, 1000, 0));

        let first = arena.resolve_challenge("alice", 100);
        assert_eq!(first, BossChallengeOutcome::KillingBlow { stone_reward: 1000 });

        let second = arena.resolve_challenge("bob", 100);
        assert_eq!(second, BossChallengeOutcome::Consolation { stone_reward: 300 });
    }

    #[test]
    fn partial_damage_does_not_defeat_the_boss() {
        let arena = WorldBossArena::new();
        arena.spawn(WorldBoss::new("b1", "Ashen Tyrant", "golden_core", 100, 50, 20, 1000, 0));
        let outcome = arena.resolve_challenge("alice", 40);
        assert_eq!(outcome, BossChallengeOutcome::DamageDealt { remaining_hp: 60 });
    }

    #[test]
    fn no_boss_active_is_reported() {
        let arena = WorldBossArena::new();
        assert_eq!(arena.resolve_challenge("alice", 10), BossChallengeOutcome::NoBossActive);
    }
}
