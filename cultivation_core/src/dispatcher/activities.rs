//! Timed-activity commands: cultivation, adventure
//! routes, rift exploration, and bounty tasks, all routed through the
//! activity scheduler plus the matching lazy-settlement function.

use crate::economy::{settle_adventure, settle_cultivation, settle_exploration};
use crate::error::DispatchError;
use crate::features::{accept_bounty, turn_in_bounty};
use crate::scheduler::activity;
use crate::types::ActivityKind;

use super::Dispatcher;

/// Gate duration for cultivation: the caller may not `end_cultivation`
/// before an hour has passed, after which the reward itself is computed
/// from real elapsed time, independently clamped by `settle_cultivation`.
const CULTIVATION_MIN_DURATION_SECS: i64 = 3600;
const DEFAULT_ADVENTURE_ROUTE: &str = "verdant_trail";

pub fn start_cultivation(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let player = dispatcher.player_mut(user_id)?;
    activity::start(player, ActivityKind::Cultivating, CULTIVATION_MIN_DURATION_SECS, None, now)?;
    Ok("cultivation begins".to_string())
}

pub fn finish_cultivation(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let catalogs = &dispatcher.catalogs;
    let constants = &dispatcher.constants;
    let player = dispatcher.world.players.get_mut(user_id).ok_or_else(|| DispatchError::NotRegistered { user_id: user_id.to_string() })?;
    let finished = activity::finish(player, ActivityKind::Cultivating, now)?;

    let technique_exp_multiplier = player
        .equipment
        .main_technique
        .as_ref()
        .and_then(|name| catalogs.technique(name))
        .and_then(|technique| technique.growth_modifiers.get("exp_percent"))
        .copied()
        .unwrap_or(0.0);
    let temporary_cultivation_multiplier = 1.0
        + player
            .active_temporary_effects
            .iter()
            .filter(|e| e.expiry > now)
            .map(|e| e.cultivation_multiplier_bonus)
            .sum::<f64>();

    let result = settle_cultivation(player, constants, finished.elapsed_secs, technique_exp_multiplier, temporary_cultivation_multiplier);
    player.experience += result.experience_gained;
    player.hp = (player.hp + result.hp_recovered).min(player.max_hp);
    player.mp = (player.mp + result.mp_recovered).min(player.max_mp);
    Ok(format!(
        "cultivation complete: +{} exp, +{} hp, +{} mp over {}s",
        result.experience_gained, result.hp_recovered, result.mp_recovered, result.elapsed_secs
    ))
}

pub fn start_adventure(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let route_id = args.first().copied().unwrap_or(DEFAULT_ADVENTURE_ROUTE);
    let template = dispatcher.catalogs.adventure_route(route_id).ok_or_else(|| DispatchError::NotFound {
        kind: "adventure_route".to_string(),
        name: route_id.to_string(),
    })?;
    let min_realm = template.min_realm;
    let duration_secs = template.duration_secs;
    let player = dispatcher.player_mut(user_id)?;
    if player.realm_index < min_realm as usize {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("{route_id} requires realm {min_realm}"),
        });
    }
    activity::start(player, ActivityKind::Adventuring, duration_secs, Some(route_id.to_string()), now)?;
    Ok(format!("adventure on {route_id} begins"))
}

pub fn adventure_status(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    let deadline = activity::check(player, ActivityKind::Adventuring)?;
    Ok(format!("adventuring, ready at t={deadline}"))
}

pub fn finish_adventure(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let player = dispatcher.player_mut(user_id)?;
    let finished = activity::finish(player, ActivityKind::Adventuring, now)?;
    let route_id = finished.payload.ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "adventure activity missing its route id".to_string(),
    })?;
    let template = dispatcher.catalogs.adventure_route(&route_id).ok_or_else(|| DispatchError::NotFound {
        kind: "adventure_route".to_string(),
        name: route_id.clone(),
    })?;
    let result = settle_adventure(template, finished.elapsed_secs);
    let player = dispatcher.player_mut(user_id)?;
    player.experience += result.experience_gained;
    player.gold += result.gold_gained;
    Ok(format!("adventure complete: +{} exp, +{} gold", result.experience_gained, result.gold_gained))
}

pub fn rift_list(dispatcher: &Dispatcher) -> Result<String, DispatchError> {
    let mut names: Vec<&str> = dispatcher.catalogs.rifts.keys().map(String::as_str).collect();
    names.sort_unstable();
    Ok(names.join(", "))
}

pub fn enter_rift(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let rift_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "enter_rift requires a rift id".to_string(),
    })?;
    let template = dispatcher.catalogs.rift(rift_id).ok_or_else(|| DispatchError::NotFound {
        kind: "rift".to_string(),
        name: rift_id.to_string(),
    })?;
    let min_realm = template.min_realm;
    let duration_secs = template.duration_secs;
    let player = dispatcher.player_mut(user_id)?;
    if player.realm_index < min_realm as usize {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("{rift_id} requires realm {min_realm}"),
        });
    }
    activity::start(player, ActivityKind::Exploring, duration_secs, Some(rift_id.to_string()), now)?;
    Ok(format!("entering rift {rift_id}"))
}

pub fn finish_exploration(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let player = dispatcher.player_mut(user_id)?;
    let finished = activity::finish(player, ActivityKind::Exploring, now)?;
    let rift_id = finished.payload.ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "exploration activity missing its rift id".to_string(),
    })?;
    let template = dispatcher.catalogs.rift(&rift_id).ok_or_else(|| DispatchError::NotFound {
        kind: "rift".to_string(),
        name: rift_id.clone(),
    })?;
    let result = settle_exploration(template, finished.elapsed_secs);
    let player = dispatcher.player_mut(user_id)?;
    player.experience += result.experience_gained;
    player.gold += result.gold_gained;
    Ok(format!("exploration complete: +{} exp, +{} gold", result.experience_gained, result.gold_gained))
}

pub fn exit_rift(dispatcher: &mut Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player_mut(user_id)?;
    activity::check(player, ActivityKind::Exploring)?;
    activity::abort(player);
    Ok("left the rift early; no reward claimed".to_string())
}

pub fn bounty_list(dispatcher: &Dispatcher) -> Result<String, DispatchError> {
    let mut names: Vec<&str> = dispatcher.catalogs.bounties.keys().map(String::as_str).collect();
    names.sort_unstable();
    Ok(names.join(", "))
}

pub fn accept_bounty_cmd(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let bounty_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "accept_bounty requires a bounty id".to_string(),
    })?;
    let player = dispatcher.player_mut(user_id)?;
    accept_bounty(player, &dispatcher.catalogs, bounty_id, now)?;
    Ok(format!("accepted bounty {bounty_id}"))
}

pub fn bounty_status(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    let deadline = activity::check(player, ActivityKind::Bounty)?;
    Ok(format!("on bounty duty, ready at t={deadline}"))
}

pub fn complete_bounty_cmd(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let catalogs = &dispatcher.catalogs;
    let player = dispatcher.world.players.get_mut(user_id).ok_or_else(|| DispatchError::NotRegistered { user_id: user_id.to_string() })?;
    let result = turn_in_bounty(player, catalogs, now)?;
    Ok(format!("bounty complete: +{} exp, +{} gold", result.experience_gained, result.gold_gained))
}

pub fn abandon_bounty(dispatcher: &mut Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player_mut(user_id)?;
    activity::check(player, ActivityKind::Bounty)?;
    activity::abort(player);
    Ok("bounty abandoned; no reward claimed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dispatcher_with_player(user_id: &str) -> Dispatcher {
        let mut d = Dispatcher::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        super::identity::enter_cultivation(&mut d, user_id, "Alice", &[], 0, &mut rng).unwrap();
        d
    }

    #[test]
    fn cultivation_round_trip_grants_reward() {
        let mut d = dispatcher_with_player("u1");
        start_cultivation(&mut d, "u1", 0).unwrap();
        assert!(matches!(finish_cultivation(&mut d, "u1", 10), Err(DispatchError::NotReady { .. })));
        let msg = finish_cultivation(&mut d, "u1", CULTIVATION_MIN_DURATION_SECS + 1).unwrap();
        assert!(msg.contains("exp"));
    }

    #[test]
    fn technique_exp_percent_and_temporary_multiplier_boost_cultivation_reward() {
        use crate::player::ActiveTemporaryEffect;

        let mut baseline = dispatcher_with_player("u1");
        start_cultivation(&mut baseline, "u1", 0).unwrap();
        let baseline_msg = finish_cultivation(&mut baseline, "u1", CULTIVATION_MIN_DURATION_SECS + 1).unwrap();
        let baseline_exp = baseline.player("u1").unwrap().experience;
        assert!(baseline_msg.contains("exp"));

        let mut boosted = dispatcher_with_player("u1");
        {
            let player = boosted.player_mut("u1").unwrap();
            player.equipment.main_technique = Some("nine_heavens_scripture".to_string());
            player.active_temporary_effects.push(ActiveTemporaryEffect {
                hp_multiplier: 0.0,
                mp_multiplier: 0.0,
                atk_multiplier: 0.0,
                def_multiplier: 0.0,
                speed_multiplier: 0.0,
                critical_rate_bonus: 0.0,
                dodge_rate_bonus: 0.0,
                cultivation_multiplier_bonus: 0.2,
                breakthrough_bonus: 0.0,
                expiry: CULTIVATION_MIN_DURATION_SECS + 100,
                pill_name: "meditation_incense".to_string(),
            });
        }
        start_cultivation(&mut boosted, "u1", 0).unwrap();
        finish_cultivation(&mut boosted, "u1", CULTIVATION_MIN_DURATION_SECS + 1).unwrap();
        let boosted_exp = boosted.player("u1").unwrap().experience;

        assert!(boosted_exp > baseline_exp);
    }

    #[test]
    fn adventure_defaults_to_verdant_trail() {
        let mut d = dispatcher_with_player("u1");
        start_adventure(&mut d, "u1", &[], 0).unwrap();
        let template = d.catalogs.adventure_route(DEFAULT_ADVENTURE_ROUTE).unwrap();
        let msg = finish_adventure(&mut d, "u1", template.duration_secs + 1).unwrap();
        assert!(msg.contains("gold"));
    }

    #[test]
    fn exit_rift_claims_no_reward() {
        let mut d = dispatcher_with_player("u1");
        let rift_id = d.catalogs.rifts.keys().next().cloned().unwrap();
        enter_rift(&mut d, "u1", &[rift_id.as_str()], 0).unwrap();
        exit_rift(&mut d, "u1").unwrap();
        let player = d.player("u1").unwrap();
        assert_eq!(player.gold, 0);
    }
}
