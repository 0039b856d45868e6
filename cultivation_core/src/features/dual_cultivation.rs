//! Dual cultivation: the `dual_pending` /
//! `dual_confirmed` activity kinds, offered and accepted with the same
//! two-step shape as a storage-ring gift.

use crate::error::DispatchError;
use crate::player::Player;
use crate::scheduler::ActivityState;
use crate::types::ActivityKind;

const DUAL_CULTIVATION_DURATION_SECS: i64 = 1800;

/// Step 1: `initiator` offers dual cultivation to `target`. Both must be
/// idle.
pub fn offer(initiator: &mut Player, target: &Player, now: i64) -> Result<(), DispatchError> {
    if initiator.user_id == target.user_id {
        return Err(DispatchError::Conflict {
            reason: "cannot dual cultivate with yourself".to_string(),
        });
    }
    if !matches!(initiator.activity_state, ActivityState::Idle) {
        return Err(DispatchError::Busy {
            kind: busy_kind(&initiator.activity_state),
        });
    }
    if !matches!(target.activity_state, ActivityState::Idle) {
        return Err(DispatchError::TargetBusy {
            user_id: target.user_id.clone(),
            kind: busy_kind(&target.activity_state),
        });
    }
    initiator.activity_state = ActivityState::Busy {
        kind: ActivityKind::DualPending,
        started_at: now,
        deadline: now + DUAL_CULTIVATION_DURATION_SECS,
        payload: Some(target.user_id.clone()),
    };
    Ok(())
}

fn busy_kind(state: &ActivityState) -> ActivityKind {
    match state {
        ActivityState::Busy { kind, .. } => *kind,
        ActivityState::Idle => ActivityKind::Cultivating,
    }
}

fn pending_target(initiator: &Player) -> Option<&str> {
    match &initiator.activity_state {
        ActivityState::Busy {
            kind: ActivityKind::DualPending,
            payload: Some(target_id),
            ..
        } => Some(target_id.as_str()),
        _ => None,
    }
}

/// Step 2a: `target` accepts. Both sides move to `DualConfirmed` for the
/// remainder of the original window.
pub fn accept(initiator: &mut Player, target: &mut Player, now: i64) -> Result<(), DispatchError> {
    let deadline = match &initiator.activity_state {
        ActivityState::Busy {
            kind: ActivityKind::DualPending,
            deadline,
            payload: Some(target_id),
            ..
        } if target_id == &target.user_id => *deadline,
        _ => {
            return Err(DispatchError::Conflict {
                reason: "no pending dual cultivation offer from this user".to_string(),
            })
        }
    };

    initiator.activity_state = ActivityState::Busy {
        kind: ActivityKind::DualConfirmed,
        started_at: now,
        deadline,
        payload: Some(target.user_id.clone()),
    };
    target.activity_state = ActivityState::Busy {
        kind: ActivityKind::DualConfirmed,
        started_at: now,
        deadline,
        payload: Some(initiator.user_id.clone()),
    };
    Ok(())
}

/// Step 2b: `target` rejects; `initiator` returns to idle.
pub fn reject(initiator: &mut Player, target: &Player) -> Result<(), DispatchError> {
    match pending_target(initiator) {
        Some(id) if id == target.user_id => {
            initiator.activity_state = ActivityState::Idle;
            Ok(())
        }
        _ => Err(DispatchError::Conflict {
            reason: "no pending dual cultivation offer from this user".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_catalogs;
    use crate::player::create_player;
    use crate::types::CultivationPath;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_player(id: &str) -> Player {
        let catalogs = default_catalogs();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        create_player(id, None, CultivationPath::Spirit, catalogs.realm(0).unwrap(), 0, &mut rng)
    }

    #[test]
    fn offer_accept_moves_both_to_confirmed() {
        let mut alice = sample_player("alice");
        let mut bob = sample_player("bob");
        offer(&mut alice, &bob, 0).unwrap();
        accept(&mut alice, &mut bob, 10).unwrap();
        assert!(matches!(
            alice.activity_state,
            ActivityState::Busy { kind: ActivityKind::DualConfirmed, .. }
        ));
        assert!(matches!(
            bob.activity_state,
            ActivityState::Busy { kind: ActivityKind::DualConfirmed, .. }
        ));
    }

    #[test]
    fn reject_returns_initiator_to_idle() {
        let mut alice = sample_player("alice");
        let bob = sample_player("bob");
        offer(&mut alice, &bob, 0).unwrap();
        reject(&mut alice, &bob).unwrap();
        assert_eq!(alice.activity_state, ActivityState::Idle);
    }

    #[test]
    fn offer_to_busy_target_fails() {
        let mut alice = sample_player("alice");
        let mut bob = sample_player("bob");
        bob.activity_state = ActivityState::Busy {
            kind: ActivityKind::Cultivating,
            started_at: 0,
            deadline: 100,
            payload: None,
        };
        assert!(matches!(offer(&mut alice, &bob, 0), Err(DispatchError::TargetBusy { .. })));
    }
}
