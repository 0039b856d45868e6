//! Breakthrough commands: the realm-advancement state machine,
//! wired to `Player` records and the `Died` cleanup contract.

use rand::Rng;

use crate::breakthrough::{attempt_breakthrough, BreakthroughOutcome};
use crate::error::DispatchError;
use crate::scheduler::activity;

use super::Dispatcher;

pub fn breakthrough_info(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    let next_index = player.realm_index + 1;
    let Some(next_realm) = dispatcher.catalogs.realm(next_index) else {
        return Ok("already at the final realm".to_string());
    };
    Ok(format!(
        "next: {} (requires {} exp, have {}; base success {:.0}%)",
        next_realm.name,
        next_realm.required_exp,
        player.experience,
        next_realm.base_success_rate * 100.0
    ))
}

/// `breakthrough [pill_name]`: `pill_name`, if present, must be a
/// breakthrough-assist pill already in the player's inventory.
pub fn breakthrough(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64, rng: &mut impl Rng) -> Result<String, DispatchError> {
    // Cultivating (or any other timed activity) must be finished first;
    // a breakthrough attempt is not itself scheduled through the
    // activity state machine.
    let player = dispatcher.player(user_id)?;
    if !matches!(player.activity_state, crate::scheduler::ActivityState::Idle) {
        return Err(DispatchError::Busy {
            kind: match player.activity_state {
                crate::scheduler::ActivityState::Busy { kind, .. } => kind,
                crate::scheduler::ActivityState::Idle => unreachable!(),
            },
        });
    }

    let pill_name = args.first().copied();
    let player = dispatcher.world.players.get_mut(user_id).ok_or_else(|| DispatchError::NotRegistered { user_id: user_id.to_string() })?;
    let temp_bonus: f64 = player
        .active_temporary_effects
        .iter()
        .filter(|e| e.expiry > now)
        .map(|e| e.breakthrough_bonus)
        .sum();
    let outcome = attempt_breakthrough(player, &dispatcher.catalogs, &dispatcher.constants, pill_name, temp_bonus, 1.0, rng)?;

    match outcome {
        BreakthroughOutcome::Success { new_realm_index } => {
            let realm_name = dispatcher.catalogs.realm(new_realm_index).map(|r| r.name.clone()).unwrap_or_default();
            Ok(format!("breakthrough succeeded: you have reached {realm_name}"))
        }
        BreakthroughOutcome::Survived { experience_deducted } => Ok(format!(
            "breakthrough failed but you survived; lost {experience_deducted} experience"
        )),
        BreakthroughOutcome::ResurrectedAndHalved => {
            Ok("the resurrection token saved your life; your combat attributes are halved".to_string())
        }
        BreakthroughOutcome::Died => {
            if let Some(mut player) = dispatcher.world.players.remove(user_id) {
                activity::abort(&mut player);
            }
            Err(DispatchError::DeathOccurred { user_id: user_id.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dispatcher_with_player() -> Dispatcher {
        let mut d = Dispatcher::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        super::super::identity::enter_cultivation(&mut d, "u1", "Alice", &[], 0, &mut rng).unwrap();
        d
    }

    #[test]
    fn breakthrough_without_experience_fails() {
        let mut d = dispatcher_with_player();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(matches!(
            breakthrough(&mut d, "u1", &[], 0, &mut rng),
            Err(DispatchError::PreconditionNotMet { .. })
        ));
    }

    #[test]
    fn active_temporary_effect_raises_breakthrough_success_odds() {
        use crate::player::ActiveTemporaryEffect;

        let mut d = dispatcher_with_player();
        d.catalogs.realms[1].base_success_rate = 0.0;
        {
            let player = d.player_mut("u1").unwrap();
            player.experience = 10_000;
            player.has_resurrection_token = true;
        }

        let mut baseline_rng = ChaCha8Rng::seed_from_u64(7);
        let outcome = breakthrough(&mut d, "u1", &[], 0, &mut baseline_rng).unwrap();
        assert!(!matches!(outcome, BreakthroughOutcome::Success { .. }));

        d.player_mut("u1").unwrap().active_temporary_effects.push(ActiveTemporaryEffect {
            hp_multiplier: 0.0,
            mp_multiplier: 0.0,
            atk_multiplier: 0.0,
            def_multiplier: 0.0,
            speed_multiplier: 0.0,
            critical_rate_bonus: 0.0,
            dodge_rate_bonus: 0.0,
            cultivation_multiplier_bonus: 0.0,
            breakthrough_bonus: 1.0,
            expiry: 1000,
            pill_name: "heart_steeling_tea".to_string(),
        });
        let mut boosted_rng = ChaCha8Rng::seed_from_u64(7);
        let outcome = breakthrough(&mut d, "u1", &[], 0, &mut boosted_rng).unwrap();
        assert!(matches!(outcome, BreakthroughOutcome::Success { .. }));
    }

    #[test]
    fn breakthrough_info_reports_next_realm() {
        let d = dispatcher_with_player();
        let msg = breakthrough_info(&d, "u1").unwrap();
        assert!(msg.contains("requires"));
    }
}
