//! Combat commands: spar, duel, the impart
//! percentage-boost PvP mode, and world boss challenges.

use rand::Rng;

use crate::combat::{resolve_battle, BattleOutcome, CombatStats};
use crate::error::DispatchError;
use crate::player::{Player, PermanentPillGains};
use crate::stats_pipeline::compose_stats;
use crate::types::BattleKind;
use crate::world::{BossChallengeOutcome, WorldBoss};

use super::Dispatcher;

/// The percentage-boost granted to the winner of an impart challenge
///): resolved by placing it in the general
/// attack-percent accumulator, i.e. `permanent_pill_gains.atk_percent`,
/// the same channel permanent pills use, rather than a dedicated field.
const IMPART_WIN_ATK_PERCENT: f64 = 0.05;

fn persist_summary(player: &mut Player, kind: BattleKind, own_final: &CombatStats) {
    if kind.persists_hp() {
        player.hp = own_final.hp;
    } else {
        player.mp = own_final.mp;
    }
}

fn format_outcome(self_id: &str, outcome: &BattleOutcome) -> String {
    let verdict = match (&outcome.winner, &outcome.loser) {
        (Some(winner), _) if winner == self_id => "you win".to_string(),
        (Some(_), Some(loser)) if loser == self_id => "you lose".to_string(),
        (Some(winner), _) => format!("{winner} wins"),
        (None, None) => "draw".to_string(),
        _ => "inconclusive".to_string(),
    };
    format!("{verdict} after {} rounds\n{}", outcome.rounds, outcome.log.join("\n"))
}

fn compose_snapshot(dispatcher: &Dispatcher, user_id: &str, now: i64) -> Result<CombatStats, DispatchError> {
    let player = dispatcher.player(user_id)?;
    Ok(compose_stats(player, &dispatcher.catalogs, now).stats)
}

pub fn duel(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64, rng: &mut impl Rng) -> Result<String, DispatchError> {
    run_pvp(dispatcher, user_id, args, BattleKind::Duel, now, rng)
}

pub fn spar(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64, rng: &mut impl Rng) -> Result<String, DispatchError> {
    run_pvp(dispatcher, user_id, args, BattleKind::Spar, now, rng)
}

fn run_pvp(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], kind: BattleKind, now: i64, rng: &mut impl Rng) -> Result<String, DispatchError> {
    let target_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: format!("{kind:?} requires a target user id"),
    })?;
    if *target_id == user_id {
        return Err(DispatchError::Conflict {
            reason: "cannot fight yourself".to_string(),
        });
    }

    dispatcher.world.combat_cooldowns.use_if_ready(user_id, kind, now)?;

    let attacker_stats = compose_snapshot(dispatcher, user_id, now)?;
    let defender_stats = compose_snapshot(dispatcher, target_id, now)?;

    let outcome = resolve_battle(attacker_stats, defender_stats, kind, rng);

    let (mut attacker, mut defender) = dispatcher.take_pair(user_id, target_id)?;
    persist_summary(&mut attacker, kind, &outcome.attacker_final);
    persist_summary(&mut defender, kind, &outcome.defender_final);
    let response = format_outcome(user_id, &outcome);
    dispatcher.return_pair(attacker, defender);
    Ok(response)
}

/// Preview a battle without mutating any state or consuming a cooldown
///.
pub fn battle_log(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64, rng: &mut impl Rng) -> Result<String, DispatchError> {
    let target_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "battle_log requires a target user id".to_string(),
    })?;
    let attacker_stats = compose_snapshot(dispatcher, user_id, now)?;
    let defender_stats = compose_snapshot(dispatcher, target_id, now)?;
    let outcome = resolve_battle(attacker_stats, defender_stats, BattleKind::Spar, rng);
    Ok(format_outcome(user_id, &outcome))
}

pub fn combat_stats(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let composed = {
        let player = dispatcher.player(user_id)?;
        compose_stats(player, &dispatcher.catalogs, now)
    };
    let player = dispatcher.player_mut(user_id)?;
    player.active_temporary_effects = composed.remaining_temporary_effects;
    let s = &composed.stats;
    Ok(format!(
        "hp {}/{} mp {}/{} patk {} matk {} pdef {} mdef {} spd {} crit {:.0}% critdmg {:.2}x hit {:.0}% dodge {:.0}%",
        s.hp,
        s.max_hp,
        s.mp,
        s.max_mp,
        s.physical_attack,
        s.magic_attack,
        s.physical_defense,
        s.magic_defense,
        s.speed,
        s.critical_rate * 100.0,
        s.critical_damage,
        s.hit_rate * 100.0,
        s.dodge_rate * 100.0,
    ))
}

fn defense_from_percent(armour_constant: f64, percent: u8) -> i64 {
    let ratio = (percent as f64 / 100.0).min(0.74);
    ((armour_constant * ratio) / (1.0 - ratio)).round() as i64
}

fn boss_combat_stats(boss: &WorldBoss, armour_constant: f64) -> CombatStats {
    let defense = defense_from_percent(armour_constant, boss.defense_percent);
    CombatStats {
        id: boss.id.clone(),
        name: boss.name.clone(),
        hp: boss.hp,
        max_hp: boss.max_hp,
        mp: 0,
        max_mp: 0,
        physical_attack: boss.atk,
        magic_attack: boss.atk,
        physical_defense: defense,
        magic_defense: defense,
        speed: 15,
        critical_rate: 0.05,
        critical_damage: 1.5,
        hit_rate: 0.9,
        dodge_rate: 0.05,
        skills: Vec::new(),
        skill_cooldowns: std::collections::HashMap::new(),
        shield: 0,
        buffs: Vec::new(),
        debuffs: Vec::new(),
    }
}

/// Spawn a new boss sized off the average realm index of every registered
/// player, when none is currently alive. The source's sweep is an external
/// housekeeping job; triggering it lazily on
/// first access avoids introducing a background scheduler this crate
/// otherwise has no use for.
fn ensure_boss_spawned(dispatcher: &mut Dispatcher, now: i64) {
    if dispatcher.world.boss_arena.snapshot().is_some() {
        return;
    }
    let players = &dispatcher.world.players;
    let avg_realm = if players.is_empty() {
        0.0
    } else {
        players.values().map(|p| p.realm_index as f64).sum::<f64>() / players.len() as f64
    };
    let scale = 1.0 + avg_realm;
    let boss = WorldBoss::new(
        "world_boss",
        "Ashen Tyrant",
        "contested",
        (500.0 * scale) as i64,
        (20.0 * scale) as i64,
        20,
        (1000.0 * scale) as u64,
        now,
    );
    dispatcher.world.boss_arena.spawn(boss);
}

pub fn boss_info(dispatcher: &mut Dispatcher, now: i64) -> Result<String, DispatchError> {
    ensure_boss_spawned(dispatcher, now);
    let boss = dispatcher.world.boss_arena.snapshot().expect("just spawned");
    Ok(format!(
        "{} ({:?}) hp {}/{} atk {} reward {}",
        boss.name, boss.status, boss.hp, boss.max_hp, boss.atk, boss.stone_reward
    ))
}

pub fn challenge_boss(dispatcher: &mut Dispatcher, user_id: &str, now: i64, rng: &mut impl Rng) -> Result<String, DispatchError> {
    ensure_boss_spawned(dispatcher, now);
    let boss = dispatcher.world.boss_arena.snapshot().expect("just spawned");
    let armour_constant = dispatcher.constants.combat.armour_constant;

    let player_stats = compose_snapshot(dispatcher, user_id, now)?;
    let boss_stats = boss_combat_stats(&boss, armour_constant);
    let pre_hp = boss_stats.hp;

    let outcome = resolve_battle(player_stats, boss_stats, BattleKind::Boss, rng);
    let damage_dealt = (pre_hp - outcome.defender_final.hp).max(0);
    let challenge = dispatcher.world.boss_arena.resolve_challenge(user_id, damage_dealt);

    let player = dispatcher.player_mut(user_id)?;
    persist_summary(player, BattleKind::Boss, &outcome.attacker_final);

    let reward_line = match challenge {
        BossChallengeOutcome::KillingBlow { stone_reward } => {
            player.gold += stone_reward;
            format!("killing blow! +{stone_reward} spirit stones")
        }
        BossChallengeOutcome::DamageDealt { remaining_hp } => {
            format!("dealt {damage_dealt} damage, boss at {remaining_hp} hp")
        }
        BossChallengeOutcome::Consolation { stone_reward } => {
            player.gold += stone_reward;
            format!("the boss had already fallen; consolation +{stone_reward} spirit stones")
        }
        BossChallengeOutcome::NoBossActive => "no boss is active".to_string(),
    };

    Ok(format!("{}\n{reward_line}", format_outcome(user_id, &outcome)))
}

/// Impart (传承) challenge: a spar-shaped PvP bout where the winner's
/// attack-percent accumulator receives a permanent boost; see DESIGN.md).
pub fn impart_challenge(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64, rng: &mut impl Rng) -> Result<String, DispatchError> {
    let target_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "impart_challenge requires a target user id".to_string(),
    })?;
    if *target_id == user_id {
        return Err(DispatchError::Conflict {
            reason: "cannot fight yourself".to_string(),
        });
    }

    let attacker_stats = compose_snapshot(dispatcher, user_id, now)?;
    let defender_stats = compose_snapshot(dispatcher, target_id, now)?;
    let outcome = resolve_battle(attacker_stats, defender_stats, BattleKind::ImpartPk, rng);

    let (mut attacker, mut defender) = dispatcher.take_pair(user_id, target_id)?;
    persist_summary(&mut attacker, BattleKind::ImpartPk, &outcome.attacker_final);
    persist_summary(&mut defender, BattleKind::ImpartPk, &outcome.defender_final);

    let mut boost_line = String::new();
    if let Some(winner) = &outcome.winner {
        let winner_player = if winner == &attacker.user_id { &mut attacker } else { &mut defender };
        winner_player.permanent_pill_gains.atk_percent =
            PermanentPillGains::add_percent(winner_player.permanent_pill_gains.atk_percent, IMPART_WIN_ATK_PERCENT);
        boost_line = format!("\n{winner} gains a permanent {:.0}% attack boost from the exchange", IMPART_WIN_ATK_PERCENT * 100.0);
    }

    let response = format!("{}{boost_line}", format_outcome(user_id, &outcome));
    dispatcher.return_pair(attacker, defender);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dispatcher_with_two() -> Dispatcher {
        let mut d = Dispatcher::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        super::super::identity::enter_cultivation(&mut d, "alice", "Alice", &[], 0, &mut rng).unwrap();
        super::super::identity::enter_cultivation(&mut d, "bob", "Bob", &[], 0, &mut rng).unwrap();
        d
    }

    #[test]
    fn duel_cannot_target_self() {
        let mut d = dispatcher_with_two();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(matches!(duel(&mut d, "alice", &["alice"], 0, &mut rng), Err(DispatchError::Conflict { .. })));
    }

    #[test]
    fn duel_enforces_cooldown() {
        let mut d = dispatcher_with_two();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        duel(&mut d, "alice", &["bob"], 0, &mut rng).unwrap();
        assert!(matches!(duel(&mut d, "alice", &["bob"], 1, &mut rng), Err(DispatchError::Cooldown { .. })));
    }

    #[test]
    fn battle_log_does_not_consume_cooldown_or_mutate_hp() {
        let mut d = dispatcher_with_two();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let before = d.player("alice").unwrap().hp;
        battle_log(&mut d, "alice", &["bob"], 0, &mut rng).unwrap();
        assert_eq!(d.player("alice").unwrap().hp, before);
        duel(&mut d, "alice", &["bob"], 0, &mut rng).unwrap();
    }

    #[test]
    fn challenge_boss_spawns_one_automatically() {
        let mut d = dispatcher_with_two();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let info = boss_info(&mut d, 0).unwrap();
        assert!(info.contains("hp"));
        challenge_boss(&mut d, "alice", 0, &mut rng).unwrap();
    }

    #[test]
    fn impart_winner_gains_attack_percent() {
        let mut d = dispatcher_with_two();
        d.player_mut("alice").unwrap().physical_attack = 10_000;
        d.player_mut("alice").unwrap().speed = 10_000;
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        impart_challenge(&mut d, "alice", &["bob"], 0, &mut rng).unwrap();
        assert!(d.player("alice").unwrap().permanent_pill_gains.atk_percent > 0.0);
    }
}
