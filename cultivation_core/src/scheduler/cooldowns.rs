//! Combat cooldowns. Modeled as a small side
//! table rather than fields on `Player`, since they are command-layer
//! concerns rather than part of the authoritative progression record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::types::BattleKind;

pub const DUEL_COOLDOWN_SECS: i64 = 300;
pub const SPAR_COOLDOWN_SECS: i64 = 60;

fn cooldown_secs(kind: BattleKind) -> Option<i64> {
    match kind {
        BattleKind::Duel => Some(DUEL_COOLDOWN_SECS),
        BattleKind::Spar => Some(SPAR_COOLDOWN_SECS),
        BattleKind::Boss | BattleKind::ImpartPk => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatCooldowns {
    last_used: HashMap<(String, BattleKindKey), i64>,
}

/// `BattleKind` isn't `Hash`-friendly as a map key alongside a `String`
/// tuple without an extra derive on the shared type, so cooldowns key on
/// this private mirror instead of reaching into `types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum BattleKindKey {
    Spar,
    Duel,
}

fn key_for(kind: BattleKind) -> Option<BattleKindKey> {
    match kind {
        BattleKind::Spar => Some(BattleKindKey::Spar),
        BattleKind::Duel => Some(BattleKindKey::Duel),
        BattleKind::Boss | BattleKind::ImpartPk => None,
    }
}

impl CombatCooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and, on success, record `now` as the new last-used time.
    pub fn use_if_ready(&mut self, user_id: &str, kind: BattleKind, now: i64) -> Result<(), DispatchError> {
        let Some(key) = key_for(kind) else { return Ok(()) };
        let cooldown = cooldown_secs(kind).unwrap_or(0);
        let map_key = (user_id.to_string(), key);

        if let Some(&last) = self.last_used.get(&map_key) {
            let elapsed = now - last;
            if elapsed < cooldown {
                return Err(DispatchError::Cooldown {
                    kind: format!("{kind:?}"),
                    remaining: cooldown - elapsed,
                });
            }
        }
        self.last_used.insert(map_key, now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spar_cooldown_blocks_and_then_releases() {
        let mut cd = CombatCooldowns::new();
        cd.use_if_ready("alice", BattleKind::Spar, 0).unwrap();
        assert!(matches!(
            cd.use_if_ready("alice", BattleKind::Spar, 10),
            Err(DispatchError::Cooldown { .. })
        ));
        assert!(cd.use_if_ready("alice", BattleKind::Spar, 61).is_ok());
    }

    #[test]
    fn boss_and_impart_have_no_cooldown() {
        let mut cd = CombatCooldowns::new();
        cd.use_if_ready("alice", BattleKind::Boss, 0).unwrap();
        assert!(cd.use_if_ready("alice", BattleKind::Boss, 1).is_ok());
    }

    #[test]
    fn cooldowns_are_independent_per_user() {
        let mut cd = CombatCooldowns::new();
        cd.use_if_ready("alice", BattleKind::Duel, 0).unwrap();
        assert!(cd.use_if_ready("bob", BattleKind::Duel, 1).is_ok());
    }
}
