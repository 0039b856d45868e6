//! CombatStats - the flattened per-battle snapshot

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::effects::EffectInstance;
use crate::types::DamageKind;

/// A skill resolved for combat use: the catalog definition flattened into
/// the fields the engine's action selection and damage formulas need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSkill {
    pub id: String,
    pub name: String,
    pub damage_kind: DamageKind,
    pub base_damage: f64,
    pub attack_ratio: f64,
    pub mp_cost: i64,
    pub cooldown: u32,
    pub lifesteal: f64,
    pub mp_exhausted_penalty: Option<f64>,
    pub effects: Vec<super::effects::EffectDescriptor>,
}

impl ResolvedSkill {
    /// The selection score used by action selection: `base_damage +
    /// effective_attack_of_matching_kind * attack_ratio`, multiplied by 1.2
    /// if the skill carries any effects.
    pub fn score(&self, matching_attack: f64) -> f64 {
        let raw = self.base_damage + matching_attack * self.attack_ratio;
        if self.effects.is_empty() {
            raw
        } else {
            raw * 1.2
        }
    }
}

/// A single combatant's effective stats for one battle. Never persisted;
/// discarded at battle end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatStats {
    pub id: String,
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
    pub mp: i64,
    pub max_mp: i64,
    pub physical_attack: i64,
    pub magic_attack: i64,
    pub physical_defense: i64,
    pub magic_defense: i64,
    pub speed: i64,
    pub critical_rate: f64,
    pub critical_damage: f64,
    pub hit_rate: f64,
    pub dodge_rate: f64,
    pub skills: Vec<ResolvedSkill>,
    pub skill_cooldowns: HashMap<String, u32>,
    pub shield: i64,
    pub buffs: Vec<EffectInstance>,
    pub debuffs: Vec<EffectInstance>,
}

impl CombatStats {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            0.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }

    fn boost_sum(&self, kind: super::effects::EffectKind) -> f64 {
        self.buffs
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.value)
            .sum()
    }

    fn debuff_sum(&self, kind: super::effects::EffectKind) -> f64 {
        self.debuffs
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.value)
            .sum()
    }

    /// `effective = max(floor, int(base * (1 + boosts - breaks) + flats))`
    fn effective_attr(&self, base: i64, boost: super::effects::EffectKind, brk: super::effects::EffectKind, floor: i64) -> i64 {
        let boosts: f64 = self.boost_sum(boost);
        let breaks: f64 = self.debuff_sum(brk);
        let value = (base as f64 * (1.0 + boosts - breaks)).floor() as i64;
        value.max(floor)
    }

    pub fn effective_physical_attack(&self) -> i64 {
        use super::effects::EffectKind::*;
        self.effective_attr(self.physical_attack, AttackBoost, ArmorBreak, 1)
    }

    pub fn effective_magic_attack(&self) -> i64 {
        use super::effects::EffectKind::*;
        self.effective_attr(self.magic_attack, AttackBoost, MagicBreak, 1)
    }

    pub fn effective_physical_defense(&self) -> i64 {
        use super::effects::EffectKind::*;
        self.effective_attr(self.physical_defense, DefenseBoost, ArmorBreak, 0)
    }

    pub fn effective_magic_defense(&self) -> i64 {
        use super::effects::EffectKind::*;
        self.effective_attr(self.magic_defense, DefenseBoost, MagicBreak, 0)
    }

    pub fn effective_speed(&self) -> i64 {
        use super::effects::EffectKind::*;
        let boosts: f64 = self.boost_sum(SpeedBoost);
        let slows: f64 = self.debuff_sum(Slow);
        let value = (self.speed as f64 * (1.0 + boosts - slows)).floor() as i64;
        value.max(1)
    }

    pub fn effective_critical_rate(&self) -> f64 {
        use super::effects::EffectKind::CriticalBoost;
        (self.critical_rate + self.boost_sum(CriticalBoost)).clamp(0.0, 1.0)
    }

    pub fn effective_critical_damage(&self) -> f64 {
        self.critical_damage.max(1.0)
    }

    pub fn effective_dodge_rate(&self) -> f64 {
        use super::effects::EffectKind::{DodgeBoost, Slow};
        let boosts: f64 = self.boost_sum(DodgeBoost);
        let slows: f64 = self.debuff_sum(Slow);
        (self.dodge_rate + boosts - 0.5 * slows).clamp(0.0, 0.8)
    }

    pub fn has_debuff(&self, kind: super::effects::EffectKind) -> bool {
        self.debuffs.iter().any(|e| e.kind == kind)
    }

    pub fn is_immobilized(&self) -> bool {
        self.debuffs.iter().any(|e| e.kind.immobilizes())
    }

    /// Apply damage: shield absorbs first (fully, until exhausted), residual
    /// reduces hp, floored at 0. Returns the amount that actually reduced hp
    /// (used for lifesteal accounting).
    pub fn apply_damage(&mut self, amount: i64) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let from_shield = amount.min(self.shield);
        self.shield -= from_shield;
        let remainder = amount - from_shield;
        let applied = remainder.min(self.hp.max(0));
        self.hp = (self.hp - remainder).max(0);
        applied
    }

    pub fn heal(&mut self, amount: i64) {
        self.hp = (self.hp + amount).min(self.max_hp).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::effects::{EffectInstance, EffectKind};

    fn base_stats() -> CombatStats {
        CombatStats {
            id: "a".into(),
            name: "A".into(),
            hp: 100,
            max_hp: 100,
            mp: 50,
            max_mp: 50,
            physical_attack: 100,
            magic_attack: 50,
            physical_defense: 20,
            magic_defense: 20,
            speed: 10,
            critical_rate: 0.05,
            critical_damage: 1.5,
            hit_rate: 0.95,
            dodge_rate: 0.05,
            skills: Vec::new(),
            skill_cooldowns: HashMap::new(),
            shield: 0,
            buffs: Vec::new(),
            debuffs: Vec::new(),
        }
    }

    #[test]
    fn shield_absorbs_before_hp() {
        let mut s = base_stats();
        s.shield = 30;
        let applied = s.apply_damage(50);
        assert_eq!(s.shield, 0);
        assert_eq!(s.hp, 80);
        assert_eq!(applied, 20);
    }

    #[test]
    fn damage_floors_hp_at_zero() {
        let mut s = base_stats();
        s.apply_damage(1000);
        assert_eq!(s.hp, 0);
        assert!(!s.is_alive());
    }

    #[test]
    fn armor_break_reduces_attack_and_defense() {
        let mut s = base_stats();
        s.debuffs.push(EffectInstance::new(EffectKind::ArmorBreak, 0.5, 3, None));
        assert_eq!(s.effective_physical_attack(), 50);
        assert_eq!(s.effective_physical_defense(), 10);
    }

    #[test]
    fn speed_floors_at_one() {
        let mut s = base_stats();
        s.speed = 2;
        s.debuffs.push(EffectInstance::new(EffectKind::Slow, 0.9, 3, None));
        assert_eq!(s.effective_speed(), 1);
    }

    #[test]
    fn dodge_rate_clamped_to_spec_range() {
        let mut s = base_stats();
        s.buffs.push(EffectInstance::new(EffectKind::DodgeBoost, 5.0, 3, None));
        assert!((s.effective_dodge_rate() - 0.8).abs() < f64::EPSILON);
    }

}
