//! Action resolution: hit checks, damage formulas, and effect application.
//! Pure functions over `CombatStats`, driven by the round loop in `engine`.

use rand::Rng;

use super::effects::{EffectDescriptor, EffectInstance, EffectKind};
use super::stats::{CombatStats, ResolvedSkill};
use crate::types::DamageKind;

pub const ARMOUR_CONSTANT: f64 = 100.0;
pub const DAMAGE_VARIANCE: f64 = 0.1;
pub const HIT_CHECK_FLOOR: f64 = 0.3;
pub const HIT_CHECK_CEILING: f64 = 0.95;

/// `p = clamp(attacker.hit_rate - defender.effective_dodge_rate, 0.3, 0.95)`.
/// Draw uniform; miss if draw > p.
pub fn hit_check(attacker_hit_rate: f64, defender_dodge_rate: f64, rng: &mut impl Rng) -> bool {
    let p = (attacker_hit_rate - defender_dodge_rate).clamp(HIT_CHECK_FLOOR, HIT_CHECK_CEILING);
    rng.gen::<f64>() <= p
}

/// Mitigation ratio: `r = min(0.75, def / (def + 100))`.
pub fn mitigation_ratio(defense: i64) -> f64 {
    let def = defense.max(0) as f64;
    (def / (def + ARMOUR_CONSTANT)).min(0.75)
}

/// Apply mitigation, crit, variance, and the damage floor common to both
/// normal attacks and skills.
pub fn finalize_damage(raw: f64, defense: i64, crit_rate: f64, crit_damage: f64, rng: &mut impl Rng) -> (i64, bool) {
    let mitigated = raw * (1.0 - mitigation_ratio(defense));
    let is_crit = rng.gen::<f64>() < crit_rate;
    let after_crit = if is_crit { mitigated * crit_damage } else { mitigated };
    let variance = 1.0 + rng.gen_range(-DAMAGE_VARIANCE..=DAMAGE_VARIANCE);
    let final_amount = (after_crit * variance).floor().max(1.0) as i64;
    (final_amount, is_crit)
}

/// Choose the damage kind and attack/defense pair for a normal attack:
/// physical if the attacker's effective physical attack is at least their
/// effective magic attack, else magic.
pub fn normal_attack_kind(attacker: &CombatStats) -> DamageKind {
    if attacker.effective_physical_attack() >= attacker.effective_magic_attack() {
        DamageKind::Physical
    } else {
        DamageKind::Magic
    }
}

pub fn attack_and_defense(kind: DamageKind, attacker: &CombatStats, defender: &CombatStats) -> (i64, i64) {
    match kind {
        DamageKind::Physical => (attacker.effective_physical_attack(), defender.effective_physical_defense()),
        DamageKind::Magic => (attacker.effective_magic_attack(), defender.effective_magic_defense()),
    }
}

/// Normal attack damage: `raw = atk`, then the shared mitigation/crit/
/// variance/floor pipeline.
pub fn normal_attack_damage(attacker: &CombatStats, defender: &CombatStats, rng: &mut impl Rng) -> (i64, bool, DamageKind) {
    let kind = normal_attack_kind(attacker);
    let (atk, def) = attack_and_defense(kind, attacker, defender);
    let (amount, crit) = finalize_damage(atk as f64, def, attacker.effective_critical_rate(), attacker.effective_critical_damage(), rng);
    (amount, crit, kind)
}

/// Skill damage: `raw = base + int(atk * attack_ratio)` using the skill's
/// declared damage kind, then the shared mitigation/crit/variance/floor.
pub fn skill_damage(skill: &ResolvedSkill, attacker: &CombatStats, defender: &CombatStats, rng: &mut impl Rng) -> (i64, bool) {
    let (atk, def) = attack_and_defense(skill.damage_kind, attacker, defender);
    let raw = skill.base_damage + (atk as f64 * skill.attack_ratio).floor();
    finalize_damage(raw, def, attacker.effective_critical_rate(), attacker.effective_critical_damage(), rng)
}

/// Resolve a single effect descriptor against caster/defender, rolling its
/// `chance` and doing nothing on failure. Returns the concrete instance
/// applied, if any, for logging.
pub fn apply_effect(
    descriptor: &EffectDescriptor,
    caster: &mut CombatStats,
    defender: &mut CombatStats,
    source: Option<String>,
    rng: &mut impl Rng,
) -> Option<EffectInstance> {
    if rng.gen::<f64>() > descriptor.chance {
        return None;
    }

    let resolve_magnitude = |stats: &CombatStats, value: f64| -> f64 {
        if value < 1.0 {
            value * stats.max_hp as f64
        } else {
            value
        }
    };

    match descriptor.kind {
        EffectKind::Stun | EffectKind::Freeze | EffectKind::Paralysis | EffectKind::Confusion | EffectKind::Slow
        | EffectKind::ArmorBreak | EffectKind::MagicBreak | EffectKind::MpBurn
        | EffectKind::Bleed | EffectKind::Burn | EffectKind::Poison => {
            let instance = EffectInstance::new(descriptor.kind, descriptor.value, descriptor.duration, source);
            if descriptor.kind == EffectKind::MpBurn {
                let burn = resolve_magnitude(defender, descriptor.value) as i64;
                defender.mp = (defender.mp - burn).max(0);
            } else {
                defender.debuffs.push(instance.clone());
            }
            Some(instance)
        }
        EffectKind::AttackBoost
        | EffectKind::DefenseBoost
        | EffectKind::SpeedBoost
        | EffectKind::DodgeBoost
        | EffectKind::CriticalBoost => {
            let instance = EffectInstance::new(descriptor.kind, descriptor.value, descriptor.duration, source);
            caster.buffs.push(instance.clone());
            Some(instance)
        }
        EffectKind::Shield => {
            let amount = resolve_magnitude(caster, descriptor.value) as i64;
            caster.shield += amount;
            None
        }
        EffectKind::Heal => {
            let amount = resolve_magnitude(caster, descriptor.value) as i64;
            caster.heal(amount);
            None
        }
        EffectKind::SelfDamage => {
            let amount = resolve_magnitude(caster, descriptor.value) as i64;
            caster.apply_damage(amount);
            None
        }
        EffectKind::Purify => {
            if !caster.debuffs.is_empty() {
                caster.debuffs.remove(0);
            }
            None
        }
    }
}

/// DoT tick damage for one debuff: `value * max_hp` if `value < 1`, else the
/// integer `value`.
pub fn dot_tick_damage(stats: &CombatStats, effect: &EffectInstance) -> i64 {
    if effect.value < 1.0 {
        (effect.value * stats.max_hp as f64).floor() as i64
    } else {
        effect.value as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn hit_check_clamps_both_ends() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // hit_rate - dodge = -5 clamps to 0.3 floor; draws below 0.3 land.
        let mut hits = 0;
        for _ in 0..1000 {
            if hit_check(0.0, 5.0, &mut rng) {
                hits += 1;
            }
        }
        let rate = hits as f64 / 1000.0;
        assert!((rate - 0.3).abs() < 0.05);
    }

    #[test]
    fn mitigation_caps_at_75_percent() {
        let r = mitigation_ratio(1_000_000);
        assert!((r - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn damage_floor_is_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (amount, _) = finalize_damage(1.0, 1_000_000, 0.0, 1.5, &mut rng);
        assert!(amount >= 1);
    }

    #[test]
    fn dot_tick_uses_fraction_convention() {
        let stats = {
            let mut s = crate::combat::stats::CombatStats {
                id: "a".into(),
                name: "A".into(),
                hp: 100,
                max_hp: 200,
                mp: 10,
                max_mp: 10,
                physical_attack: 0,
                magic_attack: 0,
                physical_defense: 0,
                magic_defense: 0,
                speed: 1,
                critical_rate: 0.0,
                critical_damage: 1.0,
                hit_rate: 1.0,
                dodge_rate: 0.0,
                skills: Vec::new(),
                skill_cooldowns: Default::default(),
                shield: 0,
                buffs: Vec::new(),
                debuffs: Vec::new(),
            };
            s.hp = 100;
            s
        };
        let fractional = EffectInstance::new(EffectKind::Poison, 0.1, 3, None);
        assert_eq!(dot_tick_damage(&stats, &fractional), 20);

        let flat = EffectInstance::new(EffectKind::Burn, 15.0, 3, None);
        assert_eq!(dot_tick_damage(&stats, &flat), 15);
    }
}
