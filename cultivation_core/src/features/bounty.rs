//! Bounty tasks: an ordinary timed activity
//! backed by `ActivityKind::Bounty`, settled through the same lazy
//! timed-activity machinery as adventure routes and rift exploration.

use crate::config::{Catalogs, TimedActivityTemplate};
use crate::economy::{settle_timed_activity, SettlementResult};
use crate::error::DispatchError;
use crate::player::Player;
use crate::scheduler::activity;
use crate::types::ActivityKind;

/// Accept a bounty by id, starting the backing activity timer.
pub fn accept_bounty(player: &mut Player, catalogs: &Catalogs, bounty_id: &str, now: i64) -> Result<(), DispatchError> {
    let template = catalogs
        .bounty(bounty_id)
        .ok_or_else(|| DispatchError::NotFound {
            kind: "bounty".to_string(),
            name: bounty_id.to_string(),
        })?;
    if player.realm_index < template.min_realm {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("bounty {} requires realm {}", bounty_id, template.min_realm),
        });
    }
    activity::start(player, ActivityKind::Bounty, template.duration_secs, Some(bounty_id.to_string()), now)
}

/// Turn in a completed bounty, applying the lazily-settled reward.
pub fn turn_in_bounty(player: &mut Player, catalogs: &Catalogs, now: i64) -> Result<SettlementResult, DispatchError> {
    let finished = activity::finish(player, ActivityKind::Bounty, now)?;
    let bounty_id = finished.payload.ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "bounty activity missing its task id".to_string(),
    })?;
    let template: &TimedActivityTemplate = catalogs.bounty(&bounty_id).ok_or_else(|| DispatchError::NotFound {
        kind: "bounty".to_string(),
        name: bounty_id.clone(),
    })?;

    let result = settle_timed_activity(template, finished.elapsed_secs);
    player.experience += result.experience_gained;
    player.gold += result.gold_gained;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_catalogs;
    use crate::player::create_player;
    use crate::types::CultivationPath;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_player() -> Player {
        let catalogs = default_catalogs();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        create_player("u1", None, CultivationPath::Spirit, catalogs.realm(0).unwrap(), 0, &mut rng)
    }

    fn first_bounty_id(catalogs: &Catalogs) -> String {
        let template = catalogs.bounty("bandit_cleanup").expect("default bounty must exist");
        template.id.clone()
    }

    #[test]
    fn accept_then_turn_in_grants_reward() {
        let catalogs = default_catalogs();
        let mut player = sample_player();
        let id = first_bounty_id(&catalogs);
        accept_bounty(&mut player, &catalogs, &id, 0).unwrap();
        let template = catalogs.bounty(&id).unwrap();
        let result = turn_in_bounty(&mut player, &catalogs, template.duration_secs + 10).unwrap();
        assert!(result.experience_gained > 0);
        assert_eq!(player.experience, result.experience_gained);
    }

    #[test]
    fn turn_in_before_deadline_fails() {
        let catalogs = default_catalogs();
        let mut player = sample_player();
        let id = first_bounty_id(&catalogs);
        accept_bounty(&mut player, &catalogs, &id, 0).unwrap();
        assert!(matches!(turn_in_bounty(&mut player, &catalogs, 1), Err(DispatchError::NotReady { .. })));
    }

    #[test]
    fn accept_unknown_bounty_fails() {
        let catalogs = default_catalogs();
        let mut player = sample_player();
        assert!(matches!(
            accept_bounty(&mut player, &catalogs, "nonexistent", 0),
            Err(DispatchError::NotFound { .. })
        ));
    }
}
