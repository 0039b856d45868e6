//! The round loop: a bounded, deterministic-given-seed turn-based battle
//! simulator.

use rand::Rng;

use super::action::{apply_effect, dot_tick_damage, hit_check, normal_attack_damage, skill_damage};
use super::effects::EffectKind;
use super::result::BattleOutcome;
use super::stats::CombatStats;
use crate::types::BattleKind;

const MAX_ROUNDS: u32 = 50;
const SPAR_SURRENDER_THRESHOLD: f64 = 0.2;
const CONFUSION_SELF_STRIKE_CHANCE: f64 = 0.5;
const CONFUSION_SELF_STRIKE_RATIO: f64 = 0.3;
const SKILL_SELECT_WEIGHT: f64 = 0.8;

/// Resolve a battle between `attacker` and `defender` to completion.
pub fn resolve_battle(
    mut attacker: CombatStats,
    mut defender: CombatStats,
    kind: BattleKind,
    rng: &mut impl Rng,
) -> BattleOutcome {
    let mut log = Vec::new();
    let mut rounds_run = 0u32;
    let mut ended_early: Option<(Option<String>, Option<String>)> = None;

    'rounds: for round in 1..=MAX_ROUNDS {
        rounds_run = round;
        log.push(format!("-- round {round} --"));

        // 1. Damage-over-time tick for both sides.
        if let Some(outcome) = tick_dots(&mut attacker, &mut defender, &mut log) {
            ended_early = Some(outcome);
            break 'rounds;
        }

        // 2. Effect duration decrement for both sides.
        decrement_effects(&mut attacker);
        decrement_effects(&mut defender);

        // 3. Turn order: higher effective speed first; ties broken by a coin flip.
        let attacker_first = match attacker.effective_speed().cmp(&defender.effective_speed()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => rng.gen_bool(0.5),
        };

        let order: [bool; 2] = if attacker_first { [true, false] } else { [false, true] };

        for &is_attacker_turn in &order {
            if !attacker.is_alive() || !defender.is_alive() {
                break;
            }
            let (actor, target) = if is_attacker_turn {
                (&mut attacker, &mut defender)
            } else {
                (&mut defender, &mut attacker)
            };
            act(actor, target, rng, &mut log);

            if !attacker.is_alive() || !defender.is_alive() {
                break;
            }

            // 5. Spar early surrender, checked after each action completes.
            if kind.allows_surrender() {
                if let Some(outcome) = check_surrender(&mut attacker, &mut defender, &mut log) {
                    ended_early = Some(outcome);
                    break 'rounds;
                }
            }
        }

        if !attacker.is_alive() || !defender.is_alive() {
            ended_early = Some(conclude_on_death(&attacker, &defender));
            break 'rounds;
        }

        // 6. Cooldown tick for both sides.
        tick_cooldowns(&mut attacker);
        tick_cooldowns(&mut defender);
    }

    let (winner, loser) = ended_early.unwrap_or_else(|| conclude_on_round_cap(&attacker, &defender, &mut log));

    propagate(kind, &mut attacker, &mut defender);

    BattleOutcome {
        winner,
        loser,
        attacker_final: attacker,
        defender_final: defender,
        log,
        rounds: rounds_run,
    }
}

fn tick_dots(
    attacker: &mut CombatStats,
    defender: &mut CombatStats,
    log: &mut Vec<String>,
) -> Option<(Option<String>, Option<String>)> {
    for side in [&mut *attacker, &mut *defender] {
        let dots: Vec<_> = side.debuffs.iter().filter(|e| e.kind.is_dot()).cloned().collect();
        for dot in dots {
            let dmg = dot_tick_damage(side, &dot);
            side.apply_damage(dmg);
            log.push(format!("{} takes {} {:?} damage", side.name, dmg, dot.kind));
        }
    }

    if !attacker.is_alive() && !defender.is_alive() {
        log.push("both combatants killed by damage over time".to_string());
        return Some((None, None));
    }
    if !attacker.is_alive() {
        log.push(format!("{} killed by DoT", attacker.name));
        return Some((Some(defender.id.clone()), Some(attacker.id.clone())));
    }
    if !defender.is_alive() {
        log.push(format!("{} killed by DoT", defender.name));
        return Some((Some(attacker.id.clone()), Some(defender.id.clone())));
    }
    None
}

fn decrement_effects(stats: &mut CombatStats) {
    stats.buffs.retain_mut(|e| e.tick());
    stats.debuffs.retain_mut(|e| e.tick());
}

fn tick_cooldowns(stats: &mut CombatStats) {
    stats.skill_cooldowns.retain(|_, remaining| {
        *remaining = remaining.saturating_sub(1);
        *remaining > 0
    });
}

enum Action {
    NormalAttack,
    Skill(usize),
    SelfStrike,
    Immobilized,
}

fn select_action(actor: &CombatStats, rng: &mut impl Rng) -> Action {
    if actor.is_immobilized() {
        return Action::Immobilized;
    }
    if actor.has_debuff(EffectKind::Confusion) {
        if rng.gen::<f64>() < CONFUSION_SELF_STRIKE_CHANCE {
            return Action::SelfStrike;
        }
    }

    let matching_attack = |kind: crate::types::DamageKind, stats: &CombatStats| match kind {
        crate::types::DamageKind::Physical => stats.effective_physical_attack() as f64,
        crate::types::DamageKind::Magic => stats.effective_magic_attack() as f64,
    };

    let available: Vec<usize> = actor
        .skills
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            actor.skill_cooldowns.get(&s.id).copied().unwrap_or(0) == 0 && s.mp_cost <= actor.mp
        })
        .map(|(i, _)| i)
        .collect();

    if available.is_empty() {
        return Action::NormalAttack;
    }

    if rng.gen::<f64>() < SKILL_SELECT_WEIGHT {
        let best = available
            .iter()
            .copied()
            .max_by(|&a, &b| {
                let sa = actor.skills[a].score(matching_attack(actor.skills[a].damage_kind, actor));
                let sb = actor.skills[b].score(matching_attack(actor.skills[b].damage_kind, actor));
                sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap();
        Action::Skill(best)
    } else {
        let idx = available[rng.gen_range(0..available.len())];
        Action::Skill(idx)
    }
}

fn act(actor: &mut CombatStats, target: &mut CombatStats, rng: &mut impl Rng, log: &mut Vec<String>) {
    match select_action(actor, rng) {
        Action::Immobilized => {
            log.push(format!("{} is immobilized and cannot act", actor.name));
        }
        Action::SelfStrike => {
            let amount = (actor.effective_physical_attack() as f64 * CONFUSION_SELF_STRIKE_RATIO).floor() as i64;
            actor.apply_damage(amount.max(1));
            log.push(format!("{} is confused and strikes themselves for {}", actor.name, amount));
        }
        Action::NormalAttack => {
            if !hit_check(actor.hit_rate, target.effective_dodge_rate(), rng) {
                log.push(format!("{} attacks {} and misses", actor.name, target.name));
                return;
            }
            let (amount, crit, kind) = normal_attack_damage(actor, target, rng);
            let applied = target.apply_damage(amount);
            let crit_tag = if crit { " (critical!)" } else { "" };
            log.push(format!(
                "{} hits {} for {} {:?} damage{}",
                actor.name, target.name, amount, kind, crit_tag
            ));
            let _ = applied;
        }
        Action::Skill(idx) => {
            let skill = actor.skills[idx].clone();
            actor.mp -= skill.mp_cost;
            actor.skill_cooldowns.insert(skill.id.clone(), skill.cooldown);

            if !hit_check(actor.hit_rate, target.effective_dodge_rate(), rng) {
                log.push(format!("{} casts {} at {} and misses", actor.name, skill.name, target.name));
            } else {
                let (amount, crit) = skill_damage(&skill, actor, target, rng);
                let applied = target.apply_damage(amount);
                let crit_tag = if crit { " (critical!)" } else { "" };
                log.push(format!(
                    "{} casts {} at {} for {} damage{}",
                    actor.name, skill.name, target.name, amount, crit_tag
                ));

                if skill.lifesteal > 0.0 {
                    let healed = (skill.lifesteal * applied as f64).floor() as i64;
                    actor.heal(healed);
                }

                for descriptor in &skill.effects {
                    let applied_effect = apply_effect(descriptor, actor, target, Some(skill.id.clone()), rng);
                    if let Some(effect) = applied_effect {
                        log.push(format!("{} applies {:?} to {}", skill.name, effect.kind, target.name));
                    }
                }
            }

            if actor.mp <= 0 {
                if let Some(penalty) = skill.mp_exhausted_penalty {
                    let amount = (penalty * actor.max_hp as f64 * 0.1).floor() as i64;
                    actor.apply_damage(amount.max(0));
                    log.push(format!("{} is mp-exhausted and takes {} self-damage", actor.name, amount));
                }
            }
        }
    }
}

fn check_surrender(
    attacker: &mut CombatStats,
    defender: &mut CombatStats,
    log: &mut Vec<String>,
) -> Option<(Option<String>, Option<String>)> {
    for (surrendering, other) in [(&mut *attacker, &defender.id), (&mut *defender, &attacker.id)] {
        if surrendering.hp_ratio() < SPAR_SURRENDER_THRESHOLD && surrendering.hp > 0 {
            surrendering.hp = 0;
            log.push(format!("{} surrenders", surrendering.name));
            return Some((Some(other.clone()), Some(surrendering.id.clone())));
        }
    }
    None
}

fn conclude_on_death(attacker: &CombatStats, defender: &CombatStats) -> (Option<String>, Option<String>) {
    match (attacker.is_alive(), defender.is_alive()) {
        (false, false) => (None, None),
        (true, false) => (Some(attacker.id.clone()), Some(defender.id.clone())),
        (false, true) => (Some(defender.id.clone()), Some(attacker.id.clone())),
        (true, true) => (None, None),
    }
}

fn conclude_on_round_cap(
    attacker: &CombatStats,
    defender: &CombatStats,
    log: &mut Vec<String>,
) -> (Option<String>, Option<String>) {
    log.push("round cap reached".to_string());
    let a = attacker.hp_ratio();
    let d = defender.hp_ratio();
    if (a - d).abs() < f64::EPSILON {
        (None, None)
    } else if a > d {
        (Some(attacker.id.clone()), Some(defender.id.clone()))
    } else {
        (Some(defender.id.clone()), Some(attacker.id.clone()))
    }
}

/// Propagate hp/mp back to persistent state: duel and boss fights
/// write hp as `max(1, round(max_hp * final_hp_ratio))`; spar and
/// impart_pk only refill mp. Callers read `attacker_final`/`defender_final`
/// off the returned outcome; this function only normalizes the snapshot
/// hp so that convention is visible on the struct itself.
fn propagate(kind: BattleKind, attacker: &mut CombatStats, defender: &mut CombatStats) {
    if kind.persists_hp() {
        for side in [&mut *attacker, &mut *defender] {
            if side.hp > 0 {
                let ratio = side.hp_ratio();
                side.hp = (side.max_hp as f64 * ratio).round().max(1.0) as i64;
            }
        }
    } else {
        for side in [&mut *attacker, &mut *defender] {
            side.mp = side.max_mp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::effects::EffectDescriptor;
    use crate::combat::stats::ResolvedSkill;
    use crate::types::DamageKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn fighter(id: &str, speed: i64, hp: i64, phys_atk: i64, phys_def: i64, hit_rate: f64, dodge: f64) -> CombatStats {
        CombatStats {
            id: id.into(),
            name: id.into(),
            hp,
            max_hp: hp,
            mp: 50,
            max_mp: 50,
            physical_attack: phys_atk,
            magic_attack: 0,
            physical_defense: phys_def,
            magic_defense: 0,
            speed,
            critical_rate: 0.0,
            critical_damage: 1.5,
            hit_rate,
            dodge_rate: dodge,
            skills: Vec::new(),
            skill_cooldowns: HashMap::new(),
            shield: 0,
            buffs: Vec::new(),
            debuffs: Vec::new(),
        }
    }

    #[test]
    fn spar_with_immobilizer_misses_several_turns() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let p1 = fighter("p1", 30, 1000, 100, 0, 1.0, 0.0);
        let mut p2 = fighter("p2", 20, 1000, 0, 0, 1.0, 0.0);
        p2.skills.push(ResolvedSkill {
            id: "freeze".into(),
            name: "Freeze".into(),
            damage_kind: DamageKind::Physical,
            base_damage: 0.0,
            attack_ratio: 0.0,
            mp_cost: 10,
            cooldown: 0,
            lifesteal: 0.0,
            mp_exhausted_penalty: None,
            effects: vec![EffectDescriptor::new(EffectKind::Freeze, 0.0, 2).with_chance(1.0)],
        });

        let outcome = resolve_battle(p1, p2, BattleKind::Spar, &mut rng);
        let immobilized_lines = outcome
            .log
            .iter()
            .filter(|l| l.contains("immobilized"))
            .count();
        assert!(immobilized_lines >= 2, "log: {:?}", outcome.log);
    }

    #[test]
    fn duel_ignores_surrender_threshold() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let p1 = fighter("p1", 30, 1000, 200, 0, 1.0, 0.0);
        let p2 = fighter("p2", 20, 1000, 0, 0, 1.0, 0.0);
        let outcome = resolve_battle(p1, p2, BattleKind::Duel, &mut rng);
        assert!(!outcome.log.iter().any(|l| l.contains("surrenders")));
    }

    #[test]
    fn spar_triggers_surrender_below_20_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let p1 = fighter("p1", 30, 1000, 500, 0, 1.0, 0.0);
        let p2 = fighter("p2", 20, 1000, 0, 0, 1.0, 0.0);
        let outcome = resolve_battle(p1, p2, BattleKind::Spar, &mut rng);
        assert!(outcome.log.iter().any(|l| l.contains("surrenders")));
    }

    #[test]
    fn round_cap_breaks_tie_on_hp_ratio() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let p1 = fighter("p1", 10, 1_000_000, 1, 1_000_000, 0.01, 0.0);
        let p2 = fighter("p2", 10, 1_000_000, 1, 1_000_000, 0.01, 0.0);
        let outcome = resolve_battle(p1, p2, BattleKind::Duel, &mut rng);
        assert_eq!(outcome.rounds, 50);
    }

    #[test]
    fn deterministic_given_same_seed() {
        let p1 = fighter("p1", 30, 500, 80, 10, 0.9, 0.1);
        let p2 = fighter("p2", 20, 500, 60, 10, 0.9, 0.1);

        let mut rng_a = ChaCha8Rng::seed_from_u64(123);
        let outcome_a = resolve_battle(p1.clone(), p2.clone(), BattleKind::Duel, &mut rng_a);

        let mut rng_b = ChaCha8Rng::seed_from_u64(123);
        let outcome_b = resolve_battle(p1, p2, BattleKind::Duel, &mut rng_b);

        assert_eq!(outcome_a.winner, outcome_b.winner);
        assert_eq!(outcome_a.rounds, outcome_b.rounds);
        assert_eq!(outcome_a.log, outcome_b.log);
    }
}
