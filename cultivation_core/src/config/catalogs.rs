//! Static catalog types: realm table, skills, techniques,
//! items, pills, storage rings, bounty templates, rift definitions, and
//! adventure routes. All loaded once into a `Catalogs` bundle and threaded
//! through every operation that resolves something by id or name — never a
//! global, so the core stays pure and testable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::combat::EffectDescriptor;
use crate::types::DamageKind;

/// Per-attribute flat gains, reused for realm breakthrough gains, technique
/// fixed bonuses, and equipment bonuses — the same shape, different source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeGains {
    #[serde(default)]
    pub max_hp: i64,
    #[serde(default)]
    pub max_mp: i64,
    #[serde(default)]
    pub physical_attack: i64,
    #[serde(default)]
    pub magic_attack: i64,
    #[serde(default)]
    pub physical_defense: i64,
    #[serde(default)]
    pub magic_defense: i64,
    #[serde(default)]
    pub speed: i64,
    #[serde(default)]
    pub critical_rate: f64,
    #[serde(default)]
    pub critical_damage: f64,
    #[serde(default)]
    pub hit_rate: f64,
    #[serde(default)]
    pub dodge_rate: f64,
}

/// One entry of the realm table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmEntry {
    pub name: String,
    pub required_exp: u64,
    pub base_success_rate: f64,
    pub breakthrough_gains: AttributeGains,
    pub base_hp: i64,
    pub base_mp: i64,
    pub base_speed: i64,
    pub base_physical_attack: i64,
    pub base_magic_attack: i64,
    pub base_physical_defense: i64,
    pub base_magic_defense: i64,
}

/// A skill catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    pub damage_kind: DamageKind,
    pub base_damage: f64,
    pub attack_ratio: f64,
    pub mp_cost: i64,
    pub cooldown: u32,
    pub realm_requirement: u32,
    pub price: u64,
    #[serde(default)]
    pub lifesteal: f64,
    #[serde(default)]
    pub mp_exhausted_penalty: Option<f64>,
    #[serde(default)]
    pub effects: Vec<EffectDescriptor>,
}

/// A technique catalog entry: fixed bonuses plus passive/growth modifier
/// maps applied during stats composition stage 4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueDef {
    pub id: String,
    pub name: String,
    pub realm_requirement: u32,
    pub price: u64,
    #[serde(default)]
    pub bonuses: AttributeGains,
    /// Flat-value passive effects, keyed by target attribute.
    #[serde(default)]
    pub passive_effects: HashMap<String, f64>,
    /// Percentage modifiers (keys conventionally end in `_percent`), applied
    /// multiplicatively in stage 5.
    #[serde(default)]
    pub growth_modifiers: HashMap<String, f64>,
}

/// The broad category an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    MainTechnique,
    Technique,
    Pill,
    Material,
    StorageRing,
}

/// An equippable item: weapon, armor, or main technique. Pills, materials,
/// and storage rings have their own catalog tables since their fields
/// diverge sharply from attribute bonuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub rank: u32,
    pub realm_requirement: u32,
    pub price: u64,
    #[serde(default)]
    pub bonuses: AttributeGains,
}

/// What a pill does when used (spec glossary: "consumable granting
/// temporary multipliers, permanent additive gains (bounded), or a single
/// breakthrough assist").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PillEffect {
    Temporary {
        #[serde(default)]
        hp_multiplier: f64,
        #[serde(default)]
        mp_multiplier: f64,
        #[serde(default)]
        atk_multiplier: f64,
        #[serde(default)]
        def_multiplier: f64,
        #[serde(default)]
        speed_multiplier: f64,
        #[serde(default)]
        critical_rate_bonus: f64,
        #[serde(default)]
        dodge_rate_bonus: f64,
        /// Added to `temporary_cultivation_multiplier` while the effect is active.
        #[serde(default)]
        cultivation_multiplier_bonus: f64,
        /// Added directly to breakthrough success probability while the effect is active.
        #[serde(default)]
        breakthrough_bonus: f64,
        duration_secs: i64,
    },
    Permanent {
        #[serde(default)]
        gains: AttributeGains,
        #[serde(default)]
        max_hp_percent: f64,
        #[serde(default)]
        max_mp_percent: f64,
        #[serde(default)]
        atk_percent: f64,
        #[serde(default)]
        def_percent: f64,
    },
    Breakthrough {
        bonus: f64,
        cap: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillDef {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub effect: PillEffect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageRingDef {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub price: u64,
}

/// A shared shape for the three lazily-settled timed activities that are
/// parameterized by a static table: bounty, adventure route, rift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedActivityTemplate {
    pub id: String,
    pub name: String,
    pub min_realm: u32,
    pub duration_secs: i64,
    pub exp_reward: u64,
    pub gold_reward: u64,
    #[serde(default)]
    pub item_rewards: Vec<String>,
}

/// All static reference data the simulation needs, loaded once and passed
/// by reference into every pure function that resolves something by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogs {
    pub realms: Vec<RealmEntry>,
    pub skills: HashMap<String, SkillDef>,
    pub techniques: HashMap<String, TechniqueDef>,
    pub items: HashMap<String, ItemDef>,
    pub pills: HashMap<String, PillDef>,
    pub storage_rings: HashMap<String, StorageRingDef>,
    pub bounties: HashMap<String, TimedActivityTemplate>,
    pub rifts: HashMap<String, TimedActivityTemplate>,
    pub adventure_routes: HashMap<String, TimedActivityTemplate>,
}

impl Catalogs {
    pub fn realm(&self, index: usize) -> Option<&RealmEntry> {
        self.realms.get(index)
    }

    pub fn realm_count(&self) -> usize {
        self.realms.len()
    }

    pub fn skill(&self, id: &str) -> Option<&SkillDef> {
        self.skills.get(id)
    }

    pub fn technique(&self, id: &str) -> Option<&TechniqueDef> {
        self.techniques.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn pill(&self, id: &str) -> Option<&PillDef> {
        self.pills.get(id)
    }

    pub fn storage_ring(&self, id: &str) -> Option<&StorageRingDef> {
        self.storage_rings.get(id)
    }

    pub fn bounty(&self, id: &str) -> Option<&TimedActivityTemplate> {
        self.bounties.get(id)
    }

    pub fn rift(&self, id: &str) -> Option<&TimedActivityTemplate> {
        self.rifts.get(id)
    }

    pub fn adventure_route(&self, id: &str) -> Option<&TimedActivityTemplate> {
        self.adventure_routes.get(id)
    }
}
