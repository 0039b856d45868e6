//! `compose_stats` — the pure pipeline deriving a battle-ready `CombatStats`
//! from a `Player` and the active catalogs.

use std::collections::HashMap;

use crate::combat::{CombatStats, ResolvedSkill};
use crate::config::Catalogs;
use crate::player::{ActiveTemporaryEffect, Player};
use crate::types::CultivationPath;

use super::accumulator::StatAccumulator;

const CRIT_RATE_CAP: f64 = 0.8;
const MIN_CRIT_DAMAGE: f64 = 1.0;
const HIT_RATE_MIN: f64 = 0.5;
const HIT_RATE_MAX: f64 = 1.0;
const DODGE_RATE_CAP: f64 = 0.8;
const REALM_MULTIPLIER_STEP: f64 = 0.1;

/// Result of composing stats: the battle-ready snapshot, plus the
/// temporary-effect list with expired entries already purged. The pipeline
/// itself never mutates `player`; callers persist
/// `remaining_temporary_effects` back onto the record.
pub struct ComposedStats {
    pub stats: CombatStats,
    pub remaining_temporary_effects: Vec<ActiveTemporaryEffect>,
}

/// Derive a `CombatStats` snapshot for `player` as of `now`. Pure: does not
/// write through `player`.
pub fn compose_stats(player: &Player, catalogs: &Catalogs, now: i64) -> ComposedStats {
    let mut acc = StatAccumulator {
        max_hp: player.max_hp as f64,
        max_mp: player.max_mp as f64,
        physical_attack: player.physical_attack as f64,
        magic_attack: player.magic_attack as f64,
        physical_defense: player.physical_defense as f64,
        magic_defense: player.magic_defense as f64,
        speed: player.speed as f64,
        critical_rate: player.critical_rate,
        critical_damage: player.critical_damage,
        hit_rate: player.hit_rate,
        dodge_rate: player.dodge_rate,
        ..Default::default()
    };

    apply_realm_base(&mut acc, player, catalogs);
    apply_permanent_pill_gains(&mut acc, player);
    apply_equipment(&mut acc, player, catalogs);
    apply_techniques(&mut acc, player, catalogs);
    acc.apply_percentages();

    let remaining_temporary_effects: Vec<ActiveTemporaryEffect> = player
        .active_temporary_effects
        .iter()
        .filter(|e| e.expiry > now)
        .cloned()
        .collect();
    apply_temporary_pill_multipliers(&mut acc, &remaining_temporary_effects);

    let skills = resolve_equipped_skills(player, catalogs);

    let stats = CombatStats {
        id: player.user_id.clone(),
        name: player.display_name.clone().unwrap_or_else(|| player.user_id.clone()),
        hp: player.hp.min(acc.max_hp.round() as i64),
        max_hp: acc.max_hp.round() as i64,
        mp: player.mp.min(acc.max_mp.round() as i64),
        max_mp: acc.max_mp.round() as i64,
        physical_attack: (acc.physical_attack.floor() as i64).max(1),
        magic_attack: (acc.magic_attack.floor() as i64).max(1),
        physical_defense: (acc.physical_defense.floor() as i64).max(0),
        magic_defense: (acc.magic_defense.floor() as i64).max(0),
        speed: (acc.speed.floor() as i64).max(1),
        critical_rate: acc.critical_rate.clamp(0.0, CRIT_RATE_CAP),
        critical_damage: acc.critical_damage.max(MIN_CRIT_DAMAGE),
        hit_rate: acc.hit_rate.clamp(HIT_RATE_MIN, HIT_RATE_MAX),
        dodge_rate: acc.dodge_rate.clamp(0.0, DODGE_RATE_CAP),
        skills,
        skill_cooldowns: HashMap::new(),
        shield: 0,
        buffs: Vec::new(),
        debuffs: Vec::new(),
    };

    ComposedStats {
        stats,
        remaining_temporary_effects,
    }
}

/// Stage 1: the realm table's own scaling. `Player`'s persisted combat
/// fields already carry the realm-0 base (applied at creation, multiplier
/// 1.0) plus every breakthrough's flat gains, so this stage adds only the
/// growth the current realm's multiplier confers beyond that baseline,
/// `base * path_bias * realm_index * step`, rather than recomputing the
/// base from scratch and double-counting it.
fn apply_realm_base(acc: &mut StatAccumulator, player: &Player, catalogs: &Catalogs) {
    let Some(realm) = catalogs.realm(player.realm_index) else { return };
    let growth = player.realm_index as f64 * REALM_MULTIPLIER_STEP;
    if growth == 0.0 {
        return;
    }
    let (physical_bias, magic_bias) = match player.cultivation_path {
        CultivationPath::Spirit => (0.7, 1.3),
        CultivationPath::Body => (1.3, 0.7),
    };
    acc.max_hp += realm.base_hp as f64 * growth;
    acc.max_mp += realm.base_mp as f64 * growth;
    acc.speed += realm.base_speed as f64 * growth;
    acc.physical_attack += realm.base_physical_attack as f64 * physical_bias * growth;
    acc.magic_attack += realm.base_magic_attack as f64 * magic_bias * growth;
    acc.physical_defense += realm.base_physical_defense as f64 * growth;
    acc.magic_defense += realm.base_magic_defense as f64 * growth;
}

fn apply_permanent_pill_gains(acc: &mut StatAccumulator, player: &Player) {
    let gains = &player.permanent_pill_gains;
    acc.max_hp *= 1.0 + gains.max_hp_percent;
    acc.max_mp *= 1.0 + gains.max_mp_percent;
    acc.physical_attack *= 1.0 + gains.atk_percent;
    acc.magic_attack *= 1.0 + gains.atk_percent;
    acc.physical_defense *= 1.0 + gains.def_percent;
    acc.magic_defense *= 1.0 + gains.def_percent;

    acc.max_hp += gains.flat.max_hp as f64;
    acc.max_mp += gains.flat.max_mp as f64;
    acc.physical_attack += gains.flat.physical_attack as f64;
    acc.magic_attack += gains.flat.magic_attack as f64;
    acc.physical_defense += gains.flat.physical_defense as f64;
    acc.magic_defense += gains.flat.magic_defense as f64;
    acc.speed += gains.flat.speed as f64;
    acc.critical_rate += gains.flat.critical_rate;
    acc.critical_damage += gains.flat.critical_damage;
    acc.hit_rate += gains.flat.hit_rate;
    acc.dodge_rate += gains.flat.dodge_rate;
}

fn apply_equipment(acc: &mut StatAccumulator, player: &Player, catalogs: &Catalogs) {
    for slot_item in [
        &player.equipment.weapon,
        &player.equipment.armor,
        &player.equipment.main_technique,
    ] {
        let Some(name) = slot_item else { continue };
        let Some(item) = catalogs.item(name) else { continue };
        add_attribute_gains(acc, &item.bonuses);
    }
}

fn add_attribute_gains(acc: &mut StatAccumulator, gains: &crate::config::AttributeGains) {
    acc.max_hp += gains.max_hp as f64;
    acc.max_mp += gains.max_mp as f64;
    acc.physical_attack += gains.physical_attack as f64;
    acc.magic_attack += gains.magic_attack as f64;
    acc.physical_defense += gains.physical_defense as f64;
    acc.magic_defense += gains.magic_defense as f64;
    acc.speed += gains.speed as f64;
    acc.critical_rate += gains.critical_rate;
    acc.critical_damage += gains.critical_damage;
    acc.hit_rate += gains.hit_rate;
    acc.dodge_rate += gains.dodge_rate;
}

fn apply_techniques(acc: &mut StatAccumulator, player: &Player, catalogs: &Catalogs) {
    let Some(technique_name) = &player.equipment.main_technique else { return };
    let Some(technique) = catalogs.technique(technique_name) else { return };

    add_attribute_gains(acc, &technique.bonuses);

    for (key, value) in &technique.passive_effects {
        apply_named_flat(acc, key, *value);
    }
    for (key, value) in &technique.growth_modifiers {
        if key.ends_with("_percent") {
            acc.add_percent(key, *value);
        }
    }
}

fn apply_named_flat(acc: &mut StatAccumulator, key: &str, value: f64) {
    match key {
        "max_hp" => acc.max_hp += value,
        "max_mp" => acc.max_mp += value,
        "physical_attack" => acc.physical_attack += value,
        "magic_attack" => acc.magic_attack += value,
        "physical_defense" => acc.physical_defense += value,
        "magic_defense" => acc.magic_defense += value,
        "speed" => acc.speed += value,
        "critical_rate" => acc.critical_rate += value,
        "critical_damage" => acc.critical_damage += value,
        "hit_rate" => acc.hit_rate += value,
        "dodge_rate" => acc.dodge_rate += value,
        _ => {}
    }
}

fn apply_temporary_pill_multipliers(acc: &mut StatAccumulator, effects: &[ActiveTemporaryEffect]) {
    for effect in effects {
        acc.max_hp *= 1.0 + effect.hp_multiplier;
        acc.max_mp *= 1.0 + effect.mp_multiplier;
        acc.physical_attack *= 1.0 + effect.atk_multiplier;
        acc.magic_attack *= 1.0 + effect.atk_multiplier;
        acc.physical_defense *= 1.0 + effect.def_multiplier;
        acc.magic_defense *= 1.0 + effect.def_multiplier;
        acc.speed *= 1.0 + effect.speed_multiplier;
        acc.critical_rate += effect.critical_rate_bonus;
        acc.dodge_rate += effect.dodge_rate_bonus;
    }
}

fn resolve_equipped_skills(player: &Player, catalogs: &Catalogs) -> Vec<ResolvedSkill> {
    player
        .equipped_skills
        .iter()
        .filter_map(|id| catalogs.skill(id))
        .map(|def| ResolvedSkill {
            id: def.id.clone(),
            name: def.name.clone(),
            damage_kind: def.damage_kind,
            base_damage: def.base_damage,
            attack_ratio: def.attack_ratio,
            mp_cost: def.mp_cost,
            cooldown: def.cooldown,
            lifesteal: def.lifesteal,
            mp_exhausted_penalty: def.mp_exhausted_penalty,
            effects: def.effects.clone(),
        })
        .collect()
}

/// Whether `path` biases toward magic (spirit) or physical (body); used
/// only at character creation since
/// after that the bias is already baked into `Player`'s persisted base
/// stats.
pub fn path_bias_favors_magic(path: CultivationPath) -> bool {
    matches!(path, CultivationPath::Spirit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_catalogs, ItemDef, ItemKind};
    use crate::player::create_player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_player(catalogs: &Catalogs) -> Player {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        create_player(
            "u1",
            None,
            CultivationPath::Spirit,
            catalogs.realm(0).unwrap(),
            0,
            &mut rng,
        )
    }

    #[test]
    fn composition_is_idempotent_with_no_expiring_effects() {
        let catalogs = default_catalogs();
        let player = sample_player(&catalogs);
        let a = compose_stats(&player, &catalogs, 0);
        let b = compose_stats(&player, &catalogs, 0);
        assert_eq!(a.stats.physical_attack, b.stats.physical_attack);
        assert_eq!(a.stats.max_hp, b.stats.max_hp);
        assert_eq!(a.stats.critical_rate, b.stats.critical_rate);
    }

    #[test]
    fn equipment_bonuses_are_added() {
        let mut catalogs = default_catalogs();
        catalogs.items.insert(
            "test_sword".to_string(),
            ItemDef {
                id: "test_sword".into(),
                name: "Test Sword".into(),
                kind: ItemKind::Weapon,
                rank: 1,
                realm_requirement: 0,
                price: 0,
                bonuses: crate::config::AttributeGains {
                    physical_attack: 40,
                    ..Default::default()
                },
            },
        );
        let mut player = sample_player(&catalogs);
        let before = compose_stats(&player, &catalogs, 0).stats.physical_attack;
        player.equipment.weapon = Some("test_sword".to_string());
        let after = compose_stats(&player, &catalogs, 0).stats.physical_attack;
        assert_eq!(after, before + 40);
    }

    #[test]
    fn final_clamps_hold() {
        let catalogs = default_catalogs();
        let mut player = sample_player(&catalogs);
        player.critical_rate = 5.0;
        player.dodge_rate = 5.0;
        player.hit_rate = 0.1;
        let composed = compose_stats(&player, &catalogs, 0);
        assert!(composed.stats.critical_rate <= CRIT_RATE_CAP);
        assert!(composed.stats.dodge_rate <= DODGE_RATE_CAP);
        assert!(composed.stats.hit_rate >= HIT_RATE_MIN);
    }

    #[test]
    fn expired_temporary_effects_are_purged_from_the_returned_list() {
        let catalogs = default_catalogs();
        let mut player = sample_player(&catalogs);
        player.active_temporary_effects.push(ActiveTemporaryEffect {
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
        let composed = compose_stats(&player, &catalogs, 200);
        assert!(composed.remaining_temporary_effects.is_empty());
    }
}
