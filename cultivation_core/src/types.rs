//! Small shared types used across subsystems.

use serde::{Deserialize, Serialize};

/// The two cultivation paths a player may walk. Spirit biases toward magic
/// attack and mana pools; body biases toward physical attack, defenses, and
/// a blood-qi pool in place of the spirit pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultivationPath {
    Spirit,
    Body,
}

/// An equipment slot on a player. At most one item occupies each slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    MainTechnique,
    StorageRing,
}

/// The kind of a mutually-exclusive, time-deadlined activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Cultivating,
    Adventuring,
    Exploring,
    Crafting,
    Bounty,
    BossCombat,
    DualPending,
    DualConfirmed,
}

/// The kind of damage a skill or attack deals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    Physical,
    Magic,
}

/// The context a battle is fought under; determines surrender rules and
/// persistence propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleKind {
    Spar,
    Duel,
    Boss,
    ImpartPk,
}

impl BattleKind {
    /// Whether this battle kind applies the spar early-surrender rule.
    pub fn allows_surrender(self) -> bool {
        matches!(self, BattleKind::Spar)
    }

    /// Whether hp changes propagate back to persistent player state (duel
    /// and boss do; spar and impart_pk only refill mp).
    pub fn persists_hp(self) -> bool {
        matches!(self, BattleKind::Duel | BattleKind::Boss)
    }
}

/// A weighted spiritual root rarity, drawn on character creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiritualRoot {
    Mortal,
    Earth,
    Profound,
    Heaven,
    Chaos,
}

impl SpiritualRoot {
    /// The cultivation-speed multiplier granted by this root.
    pub fn cultivation_multiplier(self) -> f64 {
        match self {
            SpiritualRoot::Mortal => 0.8,
            SpiritualRoot::Earth => 1.0,
            SpiritualRoot::Profound => 1.3,
            SpiritualRoot::Heaven => 1.8,
            SpiritualRoot::Chaos => 3.0,
        }
    }

    /// The rarity table to draw a root from on first contact: weight pairs,
    /// heaviest (most common) first.
    pub fn weighted_table() -> &'static [(SpiritualRoot, u32)] {
        &[
            (SpiritualRoot::Mortal, 50),
            (SpiritualRoot::Earth, 30),
            (SpiritualRoot::Profound, 14),
            (SpiritualRoot::Heaven, 5),
            (SpiritualRoot::Chaos, 1),
        ]
    }
}
