//! Compiled-in default catalogs, so the crate is usable without any file on
//! disk.

use std::collections::HashMap;

use super::catalogs::{
    AttributeGains, Catalogs, ItemDef, ItemKind, PillDef, PillEffect, RealmEntry, SkillDef,
    StorageRingDef, TechniqueDef, TimedActivityTemplate,
};
use crate::combat::{EffectDescriptor, EffectKind};
use crate::types::DamageKind;

const REALM_NAMES: &[&str] = &[
    "Qi Condensation",
    "Foundation Establishment",
    "Golden Core",
    "Nascent Soul",
    "Spirit Severing",
    "Void Refinement",
    "Body Integration",
    "Mahayana",
    "Tribulation",
    "True Immortal",
];

fn default_realms() -> Vec<RealmEntry> {
    REALM_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let tier = i as i64;
            RealmEntry {
                name: name.to_string(),
                required_exp: 1000 * 3u64.pow(i as u32),
                base_success_rate: (0.9 - i as f64 * 0.05).max(0.2),
                breakthrough_gains: AttributeGains {
                    max_hp: 200 + tier * 150,
                    max_mp: 100 + tier * 80,
                    physical_attack: 20 + tier * 15,
                    magic_attack: 20 + tier * 15,
                    physical_defense: 10 + tier * 8,
                    magic_defense: 10 + tier * 8,
                    speed: 2 + tier,
                    critical_rate: 0.0,
                    critical_damage: 0.0,
                    hit_rate: 0.0,
                    dodge_rate: 0.0,
                },
                base_hp: 500 + tier * 300,
                base_mp: 200 + tier * 150,
                base_speed: 10 + tier * 2,
                base_physical_attack: 50 + tier * 25,
                base_magic_attack: 50 + tier * 25,
                base_physical_defense: 20 + tier * 10,
                base_magic_defense: 20 + tier * 10,
            }
        })
        .collect()
}

fn default_skills() -> HashMap<String, SkillDef> {
    let mut map = HashMap::new();
    map.insert(
        "flowing_blade".to_string(),
        SkillDef {
            id: "flowing_blade".to_string(),
            name: "Flowing Blade".to_string(),
            damage_kind: DamageKind::Physical,
            base_damage: 10.0,
            attack_ratio: 1.3,
            mp_cost: 15,
            cooldown: 2,
            realm_requirement: 0,
            price: 200,
            lifesteal: 0.0,
            mp_exhausted_penalty: None,
            effects: Vec::new(),
        },
    );
    map.insert(
        "frost_lance".to_string(),
        SkillDef {
            id: "frost_lance".to_string(),
            name: "Frost Lance".to_string(),
            damage_kind: DamageKind::Magic,
            base_damage: 5.0,
            attack_ratio: 1.1,
            mp_cost: 20,
            cooldown: 3,
            realm_requirement: 1,
            price: 350,
            lifesteal: 0.0,
            mp_exhausted_penalty: None,
            effects: vec![EffectDescriptor::new(EffectKind::Slow, 0.3, 2).with_chance(0.6)],
        },
    );
    map.insert(
        "freeze".to_string(),
        SkillDef {
            id: "freeze".to_string(),
            name: "Freeze".to_string(),
            damage_kind: DamageKind::Magic,
            base_damage: 0.0,
            attack_ratio: 1.0,
            mp_cost: 10,
            cooldown: 0,
            realm_requirement: 0,
            price: 150,
            lifesteal: 0.0,
            mp_exhausted_penalty: None,
            effects: vec![EffectDescriptor::new(EffectKind::Freeze, 0.0, 2).with_chance(1.0)],
        },
    );
    map.insert(
        "bloodletting_strike".to_string(),
        SkillDef {
            id: "bloodletting_strike".to_string(),
            name: "Bloodletting Strike".to_string(),
            damage_kind: DamageKind::Physical,
            base_damage: 8.0,
            attack_ratio: 0.9,
            mp_cost: 12,
            cooldown: 2,
            realm_requirement: 0,
            price: 200,
            lifesteal: 0.25,
            mp_exhausted_penalty: None,
            effects: vec![EffectDescriptor::new(EffectKind::Bleed, 0.05, 3).with_chance(0.5)],
        },
    );
    map.insert(
        "spirit_drain".to_string(),
        SkillDef {
            id: "spirit_drain".to_string(),
            name: "Spirit Drain".to_string(),
            damage_kind: DamageKind::Magic,
            base_damage: 0.0,
            attack_ratio: 0.6,
            mp_cost: 25,
            cooldown: 4,
            realm_requirement: 2,
            price: 500,
            lifesteal: 0.0,
            mp_exhausted_penalty: Some(0.2),
            effects: vec![EffectDescriptor::new(EffectKind::MpBurn, 0.1, 1).with_chance(1.0)],
        },
    );
    map
}

fn default_techniques() -> HashMap<String, TechniqueDef> {
    let mut map = HashMap::new();
    map.insert(
        "basic_sword_art".to_string(),
        TechniqueDef {
            id: "basic_sword_art".to_string(),
            name: "Basic Sword Art".to_string(),
            realm_requirement: 0,
            price: 300,
            bonuses: AttributeGains {
                physical_attack: 15,
                ..Default::default()
            },
            passive_effects: HashMap::new(),
            growth_modifiers: HashMap::new(),
        },
    );
    map.insert(
        "nine_heavens_scripture".to_string(),
        TechniqueDef {
            id: "nine_heavens_scripture".to_string(),
            name: "Nine Heavens Scripture".to_string(),
            realm_requirement: 3,
            price: 2000,
            bonuses: AttributeGains {
                max_hp: 100,
                magic_attack: 30,
                ..Default::default()
            },
            passive_effects: [("speed".to_string(), 5.0)].into_iter().collect(),
            growth_modifiers: [("atk_percent".to_string(), 0.08), ("exp_percent".to_string(), 0.1)]
                .into_iter()
                .collect(),
        },
    );
    map
}

fn default_items() -> HashMap<String, ItemDef> {
    let mut map = HashMap::new();
    map.insert(
        "iron_sword".to_string(),
        ItemDef {
            id: "iron_sword".to_string(),
            name: "Iron Sword".to_string(),
            kind: ItemKind::Weapon,
            rank: 1,
            realm_requirement: 0,
            price: 150,
            bonuses: AttributeGains {
                physical_attack: 25,
                ..Default::default()
            },
        },
    );
    map.insert(
        "azure_robe".to_string(),
        ItemDef {
            id: "azure_robe".to_string(),
            name: "Azure Robe".to_string(),
            kind: ItemKind::Armor,
            rank: 1,
            realm_requirement: 0,
            price: 150,
            bonuses: AttributeGains {
                physical_defense: 15,
                magic_defense: 15,
                ..Default::default()
            },
        },
    );
    map.insert(
        "frostiron_blade".to_string(),
        ItemDef {
            id: "frostiron_blade".to_string(),
            name: "Frostiron Blade".to_string(),
            kind: ItemKind::Weapon,
            rank: 2,
            realm_requirement: 2,
            price: 800,
            bonuses: AttributeGains {
                physical_attack: 60,
                critical_rate: 0.03,
                ..Default::default()
            },
        },
    );
    map
}

fn default_pills() -> HashMap<String, PillDef> {
    let mut map = HashMap::new();
    map.insert(
        "qi_gathering_pill".to_string(),
        PillDef {
            id: "qi_gathering_pill".to_string(),
            name: "Qi Gathering Pill".to_string(),
            price: 50,
            effect: PillEffect::Temporary {
                hp_multiplier: 0.0,
                mp_multiplier: 0.0,
                atk_multiplier: 0.15,
                def_multiplier: 0.0,
                speed_multiplier: 0.0,
                critical_rate_bonus: 0.0,
                dodge_rate_bonus: 0.0,
                cultivation_multiplier_bonus: 0.0,
                breakthrough_bonus: 0.0,
                duration_secs: 1800,
            },
        },
    );
    map.insert(
        "meditation_incense".to_string(),
        PillDef {
            id: "meditation_incense".to_string(),
            name: "Meditation Incense".to_string(),
            price: 120,
            effect: PillEffect::Temporary {
                hp_multiplier: 0.0,
                mp_multiplier: 0.0,
                atk_multiplier: 0.0,
                def_multiplier: 0.0,
                speed_multiplier: 0.0,
                critical_rate_bonus: 0.0,
                dodge_rate_bonus: 0.0,
                cultivation_multiplier_bonus: 0.2,
                breakthrough_bonus: 0.0,
                duration_secs: 3600,
            },
        },
    );
    map.insert(
        "heart_steeling_tea".to_string(),
        PillDef {
            id: "heart_steeling_tea".to_string(),
            name: "Heart-Steeling Tea".to_string(),
            price: 300,
            effect: PillEffect::Temporary {
                hp_multiplier: 0.0,
                mp_multiplier: 0.0,
                atk_multiplier: 0.0,
                def_multiplier: 0.0,
                speed_multiplier: 0.0,
                critical_rate_bonus: 0.0,
                dodge_rate_bonus: 0.0,
                cultivation_multiplier_bonus: 0.0,
                breakthrough_bonus: 0.05,
                duration_secs: 1800,
            },
        },
    );
    map.insert(
        "foundation_pill".to_string(),
        PillDef {
            id: "foundation_pill".to_string(),
            name: "Foundation Pill".to_string(),
            price: 200,
            effect: PillEffect::Permanent {
                gains: AttributeGains {
                    max_hp: 50,
                    ..Default::default()
                },
                max_hp_percent: 0.0,
                max_mp_percent: 0.0,
                atk_percent: 0.0,
                def_percent: 0.0,
            },
        },
    );
    map.insert(
        "breakthrough_pill".to_string(),
        PillDef {
            id: "breakthrough_pill".to_string(),
            name: "Breakthrough Pill".to_string(),
            price: 500,
            effect: PillEffect::Breakthrough { bonus: 0.15, cap: 0.95 },
        },
    );
    map
}

fn default_storage_rings() -> HashMap<String, StorageRingDef> {
    let mut map = HashMap::new();
    map.insert(
        "cloth_pouch".to_string(),
        StorageRingDef {
            id: "cloth_pouch".to_string(),
            name: "Cloth Pouch".to_string(),
            capacity: 10,
            price: 0,
        },
    );
    map.insert(
        "spirit_ring".to_string(),
        StorageRingDef {
            id: "spirit_ring".to_string(),
            name: "Spirit Ring".to_string(),
            capacity: 30,
            price: 1000,
        },
    );
    map
}

fn default_bounties() -> HashMap<String, TimedActivityTemplate> {
    let mut map = HashMap::new();
    map.insert(
        "bandit_cleanup".to_string(),
        TimedActivityTemplate {
            id: "bandit_cleanup".to_string(),
            name: "Bandit Cleanup".to_string(),
            min_realm: 0,
            duration_secs: 900,
            exp_reward: 150,
            gold_reward: 80,
            item_rewards: Vec::new(),
        },
    );
    map
}

fn default_rifts() -> HashMap<String, TimedActivityTemplate> {
    let mut map = HashMap::new();
    map.insert(
        "mist_rift".to_string(),
        TimedActivityTemplate {
            id: "mist_rift".to_string(),
            name: "Mist Rift".to_string(),
            min_realm: 1,
            duration_secs: 3600,
            exp_reward: 600,
            gold_reward: 200,
            item_rewards: vec!["spirit_stone_fragment".to_string()],
        },
    );
    map
}

fn default_adventure_routes() -> HashMap<String, TimedActivityTemplate> {
    let mut map = HashMap::new();
    map.insert(
        "verdant_trail".to_string(),
        TimedActivityTemplate {
            id: "verdant_trail".to_string(),
            name: "Verdant Trail".to_string(),
            min_realm: 0,
            duration_secs: 1800,
            exp_reward: 300,
            gold_reward: 120,
            item_rewards: Vec::new(),
        },
    );
    map
}

pub fn default_catalogs() -> Catalogs {
    Catalogs {
        realms: default_realms(),
        skills: default_skills(),
        techniques: default_techniques(),
        items: default_items(),
        pills: default_pills(),
        storage_rings: default_storage_rings(),
        bounties: default_bounties(),
        rifts: default_rifts(),
        adventure_routes: default_adventure_routes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalogs_are_internally_consistent() {
        let catalogs = default_catalogs();
        assert_eq!(catalogs.realms.len(), REALM_NAMES.len());
        assert!(catalogs.skill("freeze").is_some());
        assert!(catalogs.storage_ring("cloth_pouch").unwrap().capacity > 0);
        for skill in catalogs.skills.values() {
            assert!(skill.realm_requirement < catalogs.realms.len() as u32);
        }
    }
}
