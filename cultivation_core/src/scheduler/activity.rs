//! `ActivityState` and the scheduler operations that enforce mutual
//! exclusion among time-deadlined activities.

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::player::Player;
use crate::types::ActivityKind;

/// Per-user mutually exclusive activity state. A player is in at most one
/// `Busy` state at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivityState {
    Idle,
    Busy {
        kind: ActivityKind,
        started_at: i64,
        deadline: i64,
        payload: Option<String>,
    },
}

impl Default for ActivityState {
    fn default() -> Self {
        ActivityState::Idle
    }
}

/// Start a new timed activity. Fails `Busy` if the user is not `Idle`.
pub fn start(player: &mut Player, kind: ActivityKind, duration_secs: i64, payload: Option<String>, now: i64) -> Result<(), DispatchError> {
    match player.activity_state {
        ActivityState::Idle => {
            player.activity_state = ActivityState::Busy {
                kind,
                started_at: now,
                deadline: now + duration_secs,
                payload,
            };
            player.last_start_time.insert(kind, now);
            Ok(())
        }
        ActivityState::Busy { kind: current, .. } => Err(DispatchError::Busy { kind: current }),
    }
}

/// Return the deadline for `required_kind`, or an error if idle / busy with
/// a different kind.
pub fn check(player: &Player, required_kind: ActivityKind) -> Result<i64, DispatchError> {
    match &player.activity_state {
        ActivityState::Busy { kind, deadline, .. } if *kind == required_kind => Ok(*deadline),
        ActivityState::Busy { kind, .. } => Err(DispatchError::WrongActivity {
            expected: required_kind,
            actual: *kind,
        }),
        ActivityState::Idle => Err(DispatchError::PreconditionNotMet {
            reason: "not currently engaged in any activity".to_string(),
        }),
    }
}

/// Outcome of a successful `finish`: the elapsed time, clamped to the
/// scheduled duration by the caller's settlement function, plus the
/// original payload for settlement to consume.
pub struct FinishedActivity {
    pub started_at: i64,
    pub elapsed_secs: i64,
    pub payload: Option<String>,
}

/// Requires `Busy(required_kind, ...)` and `now >= deadline`. On premature
/// finish, returns `NotReady` with remaining time and does not clear state.
pub fn finish(player: &mut Player, required_kind: ActivityKind, now: i64) -> Result<FinishedActivity, DispatchError> {
    let (kind, started_at, deadline, payload) = match &player.activity_state {
        ActivityState::Busy {
            kind,
            started_at,
            deadline,
            payload,
        } => (*kind, *started_at, *deadline, payload.clone()),
        ActivityState::Idle => {
            return Err(DispatchError::PreconditionNotMet {
                reason: "not currently engaged in any activity".to_string(),
            })
        }
    };

    if kind != required_kind {
        return Err(DispatchError::WrongActivity {
            expected: required_kind,
            actual: kind,
        });
    }

    if now < deadline {
        return Err(DispatchError::NotReady { remaining: deadline - now });
    }

    player.activity_state = ActivityState::Idle;
    Ok(FinishedActivity {
        started_at,
        elapsed_secs: now - started_at,
        payload,
    })
}

/// Force-clear to `Idle`, used by system actions such as breakthrough-death
/// cleanup.
pub fn abort(player: &mut Player) {
    player.activity_state = ActivityState::Idle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn test_player() -> Player {
        Player {
            user_id: "u1".into(),
            display_name: None,
            realm_index: 0,
            cultivation_path: crate::types::CultivationPath::Spirit,
            spiritual_root: crate::types::SpiritualRoot::Mortal,
            experience: 0,
            lifespan: 100,
            gold: 0,
            hp: 100,
            max_hp: 100,
            mp: 50,
            max_mp: 50,
            physical_attack: 10,
            magic_attack: 10,
            physical_defense: 5,
            magic_defense: 5,
            mental_power: 5,
            speed: 10,
            critical_rate: 0.05,
            critical_damage: 1.5,
            hit_rate: 0.95,
            dodge_rate: 0.05,
            equipment: Default::default(),
            learned_skills: HashSet::new(),
            equipped_skills: Vec::new(),
            active_temporary_effects: Vec::new(),
            permanent_pill_gains: Default::default(),
            has_resurrection_token: false,
            has_debuff_shield: false,
            pill_inventory: HashMap::new(),
            storage_ring: crate::inventory::StorageRing::new(10),
            activity_state: ActivityState::Idle,
            last_check_in_date: 0,
            cultivation_start_time: 0,
            last_start_time: HashMap::new(),
            last_abandon_time: None,
        }
    }

    #[test]
    fn start_while_busy_fails() {
        let mut p = test_player();
        start(&mut p, ActivityKind::Cultivating, 60, None, 0).unwrap();
        assert!(matches!(
            start(&mut p, ActivityKind::Adventuring, 60, None, 10),
            Err(DispatchError::Busy { .. })
        ));
    }

    #[test]
    fn finish_before_deadline_is_not_ready() {
        let mut p = test_player();
        start(&mut p, ActivityKind::Cultivating, 3600, None, 0).unwrap();
        let err = finish(&mut p, ActivityKind::Cultivating, 10).unwrap_err();
        assert!(matches!(err, DispatchError::NotReady { remaining: 3590 }));
    }

    #[test]
    fn finish_wrong_kind_fails_and_preserves_state() {
        let mut p = test_player();
        start(&mut p, ActivityKind::Cultivating, 60, None, 0).unwrap();
        assert!(finish(&mut p, ActivityKind::Adventuring, 1000).is_err());
        assert!(matches!(p.activity_state, ActivityState::Busy { .. }));
    }

    #[test]
    fn finish_after_deadline_clears_to_idle() {
        let mut p = test_player();
        start(&mut p, ActivityKind::Cultivating, 60, Some("route".into()), 0).unwrap();
        let finished = finish(&mut p, ActivityKind::Cultivating, 100).unwrap();
        assert_eq!(finished.elapsed_secs, 100);
        assert_eq!(finished.payload.as_deref(), Some("route"));
        assert_eq!(p.activity_state, ActivityState::Idle);
    }

    #[test]
    fn abort_always_clears() {
        let mut p = test_player();
        start(&mut p, ActivityKind::BossCombat, 60, None, 0).unwrap();
        abort(&mut p);
        assert_eq!(p.activity_state, ActivityState::Idle);
    }
}
