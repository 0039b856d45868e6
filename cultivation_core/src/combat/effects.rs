//! The effect system: a tagged union of concrete effect variants rather
//! than a bag of loosely-typed dictionaries. Round
//! processing becomes a pattern match instead of string-keyed lookups.

use serde::{Deserialize, Serialize};

/// The kind of an effect a skill or pill can apply in combat. Each
/// variant that needs a magnitude carries it directly instead of a shared
/// `value` field, so illegal combinations (e.g. a `Stun` with a `magnitude`
/// meant for `Slow`) cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Stun,
    Freeze,
    Paralysis,
    Confusion,
    Bleed,
    Burn,
    Poison,
    Slow,
    ArmorBreak,
    MagicBreak,
    AttackBoost,
    DefenseBoost,
    SpeedBoost,
    DodgeBoost,
    CriticalBoost,
    Shield,
    Heal,
    SelfDamage,
    MpBurn,
    Purify,
}

impl EffectKind {
    /// Immobilizing effects that cause an actor to skip their turn.
    pub fn immobilizes(self) -> bool {
        matches!(self, EffectKind::Stun | EffectKind::Freeze | EffectKind::Paralysis)
    }

    /// Damage-over-time kinds processed at round start.
    pub fn is_dot(self) -> bool {
        matches!(self, EffectKind::Bleed | EffectKind::Burn | EffectKind::Poison)
    }

    /// Whether this effect targets the caster rather than the defender.
    pub fn targets_caster(self) -> bool {
        matches!(
            self,
            EffectKind::AttackBoost
                | EffectKind::DefenseBoost
                | EffectKind::SpeedBoost
                | EffectKind::DodgeBoost
                | EffectKind::CriticalBoost
                | EffectKind::Shield
                | EffectKind::Heal
                | EffectKind::SelfDamage
                | EffectKind::Purify
        )
    }
}

/// A static effect descriptor, as carried on a skill definition in the
/// catalog. `chance` defaults to 1.0 (always applies) when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    pub value: f64,
    pub duration: u32,
    #[serde(default = "default_chance")]
    pub chance: f64,
}

fn default_chance() -> f64 {
    1.0
}

impl EffectDescriptor {
    pub fn new(kind: EffectKind, value: f64, duration: u32) -> Self {
        EffectDescriptor {
            kind,
            value,
            duration,
            chance: 1.0,
        }
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = chance;
        self
    }
}

/// A live instance of an effect attached to a combatant in a battle: a
/// descriptor plus a source id and remaining-duration counter that actually
/// ticks down, independent of the catalog entry it was spawned from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectInstance {
    pub kind: EffectKind,
    pub value: f64,
    pub remaining_duration: u32,
    pub source: Option<String>,
}

impl EffectInstance {
    pub fn new(kind: EffectKind, value: f64, duration: u32, source: Option<String>) -> Self {
        EffectInstance {
            kind,
            value,
            remaining_duration: duration,
            source,
        }
    }

    /// Decrement duration by one round; returns `false` once expired.
    pub fn tick(&mut self) -> bool {
        self.remaining_duration = self.remaining_duration.saturating_sub(1);
        self.remaining_duration > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immobilizing_kinds() {
        assert!(EffectKind::Stun.immobilizes());
        assert!(EffectKind::Freeze.immobilizes());
        assert!(EffectKind::Paralysis.immobilizes());
        assert!(!EffectKind::Slow.immobilizes());
    }

    #[test]
    fn dot_kinds() {
        assert!(EffectKind::Bleed.is_dot());
        assert!(EffectKind::Burn.is_dot());
        assert!(EffectKind::Poison.is_dot());
        assert!(!EffectKind::Stun.is_dot());
    }

    #[test]
    fn effect_instance_ticks_to_expiry() {
        let mut e = EffectInstance::new(EffectKind::Freeze, 0.0, 2, None);
        assert!(e.tick());
        assert_eq!(e.remaining_duration, 1);
        assert!(!e.tick());
        assert_eq!(e.remaining_duration, 0);
    }

    #[test]
    fn default_chance_is_certain() {
        let d = EffectDescriptor::new(EffectKind::Stun, 0.0, 1);
        assert!((d.chance - 1.0).abs() < f64::EPSILON);
    }
}
