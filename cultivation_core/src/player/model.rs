//! `Player` — the authoritative persistent entity for a user.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::AttributeGains;
use crate::inventory::StorageRing;
use crate::scheduler::ActivityState;
use crate::types::{ActivityKind, CultivationPath, EquipmentSlot, SpiritualRoot};

/// A temporary pill effect, expiring at an absolute timestamp. Purged
/// lazily rather than by a
/// background timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTemporaryEffect {
    pub hp_multiplier: f64,
    pub mp_multiplier: f64,
    pub atk_multiplier: f64,
    pub def_multiplier: f64,
    pub speed_multiplier: f64,
    pub critical_rate_bonus: f64,
    pub dodge_rate_bonus: f64,
    /// Added to the cultivation exp formula's `temporary_cultivation_multiplier` term while active.
    #[serde(default)]
    pub cultivation_multiplier_bonus: f64,
    /// Added directly to breakthrough success probability while active.
    #[serde(default)]
    pub breakthrough_bonus: f64,
    pub expiry: i64,
    pub pill_name: String,
}

/// Permanent pill gains: stored percentage gains (applied to the relevant
/// base) plus stored flat gains, each bounded by a per-attribute ceiling
/// enforced where they're accumulated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermanentPillGains {
    pub flat: AttributeGains,
    pub max_hp_percent: f64,
    pub max_mp_percent: f64,
    pub atk_percent: f64,
    pub def_percent: f64,
}

impl PermanentPillGains {
    /// Per-attribute ceiling: no single percent gain may exceed 50% in
    /// total, no matter how many permanent pills stack onto it.
    pub const PERCENT_CEILING: f64 = 0.5;

    pub fn add_percent(current: f64, delta: f64) -> f64 {
        (current + delta).min(Self::PERCENT_CEILING)
    }
}

/// The four equipment slots, at most one item name each.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentSlots {
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub main_technique: Option<String>,
    pub storage_ring: Option<String>,
}

impl EquipmentSlots {
    pub fn get(&self, slot: EquipmentSlot) -> &Option<String> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::MainTechnique => &self.main_technique,
            EquipmentSlot::StorageRing => &self.storage_ring,
        }
    }

    pub fn set(&mut self, slot: EquipmentSlot, item: Option<String>) {
        match slot {
            EquipmentSlot::Weapon => self.weapon = item,
            EquipmentSlot::Armor => self.armor = item,
            EquipmentSlot::MainTechnique => self.main_technique = item,
            EquipmentSlot::StorageRing => self.storage_ring = item,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub user_id: String,
    pub display_name: Option<String>,

    pub realm_index: usize,
    pub cultivation_path: CultivationPath,
    pub spiritual_root: SpiritualRoot,
    pub experience: u64,
    pub lifespan: i64,

    pub gold: u64,
    pub hp: i64,
    pub max_hp: i64,
    /// For `CultivationPath::Body` this pool represents blood-qi rather
    /// than mana; the field is shared since every downstream formula
    /// (stats composition, combat) treats it identically.
    pub mp: i64,
    pub max_mp: i64,

    pub physical_attack: i64,
    pub magic_attack: i64,
    pub physical_defense: i64,
    pub magic_defense: i64,
    pub mental_power: i64,
    pub speed: i64,
    pub critical_rate: f64,
    pub critical_damage: f64,
    pub hit_rate: f64,
    pub dodge_rate: f64,

    pub equipment: EquipmentSlots,
    pub learned_skills: HashSet<String>,
    pub equipped_skills: Vec<String>,

    pub active_temporary_effects: Vec<ActiveTemporaryEffect>,
    pub permanent_pill_gains: PermanentPillGains,
    pub has_resurrection_token: bool,
    pub has_debuff_shield: bool,
    pub pill_inventory: HashMap<String, u32>,
    pub storage_ring: StorageRing,

    pub activity_state: ActivityState,
    pub last_check_in_date: i64,
    pub cultivation_start_time: i64,
    pub last_start_time: HashMap<ActivityKind, i64>,
    pub last_abandon_time: Option<i64>,
}

impl Player {
    pub const EQUIPPED_SKILL_CAPACITY: usize = 2;

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn equip_skill(&mut self, skill_id: &str) -> bool {
        if self.equipped_skills.iter().any(|s| s == skill_id) {
            return true;
        }
        if !self.learned_skills.contains(skill_id) || self.equipped_skills.len() >= Self::EQUIPPED_SKILL_CAPACITY {
            return false;
        }
        self.equipped_skills.push(skill_id.to_string());
        true
    }

    pub fn unequip_skill(&mut self, skill_id: &str) {
        self.equipped_skills.retain(|s| s != skill_id);
    }

    /// Remove temporary effects whose expiry has passed. Returns the
    /// number purged, for callers that want to log or test the sweep.
    pub fn purge_expired_temporary_effects(&mut self, now: i64) -> usize {
        let before = self.active_temporary_effects.len();
        self.active_temporary_effects.retain(|e| e.expiry > now);
        before - self.active_temporary_effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_player() -> Player {
        Player {
            user_id: "u1".into(),
            display_name: None,
            realm_index: 0,
            cultivation_path: CultivationPath::Spirit,
            spiritual_root: SpiritualRoot::Mortal,
            experience: 0,
            lifespan: 100,
            gold: 0,
            hp: 100,
            max_hp: 100,
            mp: 50,
            max_mp: 50,
            physical_attack: 10,
            magic_attack: 10,
            physical_defense: 5,
            magic_defense: 5,
            mental_power: 5,
            speed: 10,
            critical_rate: 0.05,
            critical_damage: 1.5,
            hit_rate: 0.95,
            dodge_rate: 0.05,
            equipment: EquipmentSlots::default(),
            learned_skills: HashSet::new(),
            equipped_skills: Vec::new(),
            active_temporary_effects: Vec::new(),
            permanent_pill_gains: PermanentPillGains::default(),
            has_resurrection_token: false,
            has_debuff_shield: false,
            pill_inventory: HashMap::new(),
            storage_ring: StorageRing::new(10),
            activity_state: ActivityState::Idle,
            last_check_in_date: 0,
            cultivation_start_time: 0,
            last_start_time: HashMap::new(),
            last_abandon_time: None,
        }
    }

    #[test]
    fn equipped_skills_capped_at_two_and_subset_of_learned() {
        let mut p = minimal_player();
        p.learned_skills.insert("a".into());
        p.learned_skills.insert("b".into());
        p.learned_skills.insert("c".into());
        assert!(p.equip_skill("a"));
        assert!(p.equip_skill("b"));
        assert!(!p.equip_skill("c"));
        assert!(!p.equip_skill("unknown"));
        assert_eq!(p.equipped_skills.len(), 2);
    }

    #[test]
    fn purge_removes_only_expired() {
        let mut p = minimal_player();
        p.active_temporary_effects.push(ActiveTemporaryEffect {
            hp_multiplier: 0.0,
            mp_multiplier: 0.0,
            atk_multiplier: 0.1,
            def_multiplier: 0.0,
            speed_multiplier: 0.0,
            critical_rate_bonus: 0.0,
            dodge_rate_bonus: 0.0,
            cultivation_multiplier_bonus: 0.0,
            breakthrough_bonus: 0.0,
            expiry: 100,
            pill_name: "expired".into(),
        });
        p.active_temporary_effects.push(ActiveTemporaryEffect {
            hp_multiplier: 0.0,
            mp_multiplier: 0.0,
            atk_multiplier: 0.1,
            def_multiplier: 0.0,
            speed_multiplier: 0.0,
            critical_rate_bonus: 0.0,
            dodge_rate_bonus: 0.0,
            cultivation_multiplier_bonus: 0.0,
            breakthrough_bonus: 0.0,
            expiry: 500,
            pill_name: "active".into(),
        });
        let purged = p.purge_expired_temporary_effects(200);
        assert_eq!(purged, 1);
        assert_eq!(p.active_temporary_effects.len(), 1);
        assert_eq!(p.active_temporary_effects[0].pill_name, "active");
    }
}
