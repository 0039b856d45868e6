//! Integration test: create a player, learn and equip a skill, equip gear
//! from the storage ring, compose battle-ready stats, and resolve a full
//! duel against an opponent with the same catalogs.

use cultivation_core::combat::resolve_battle;
use cultivation_core::config::default_catalogs;
use cultivation_core::player::create_player;
use cultivation_core::stats_pipeline::compose_stats;
use cultivation_core::types::{BattleKind, CultivationPath, EquipmentSlot};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn full_loadout_to_combat_flow() {
    let catalogs = default_catalogs();
    let realm_zero = catalogs.realm(0).expect("default catalogs always have realm 0");
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let mut player = create_player(
        "integration_player",
        Some("Test Cultivator".to_string()),
        CultivationPath::Spirit,
        realm_zero,
        0,
        &mut rng,
    );
    let mut opponent = create_player(
        "integration_opponent",
        Some("Test Rival".to_string()),
        CultivationPath::Body,
        realm_zero,
        0,
        &mut rng,
    );

    // Gear both combatants from their storage rings, matching how a shop
    // purchase or bounty reward would land items before equip_item runs.
    for p in [&mut player, &mut opponent] {
        p.storage_ring.store("iron_sword", 1).expect("default storage ring has room");
        p.storage_ring.store("azure_robe", 1).expect("default storage ring has room");
        p.storage_ring.store("basic_sword_art", 1).expect("default storage ring has room");
        p.learned_skills.insert("flowing_blade".to_string());
        assert!(p.equip_skill("flowing_blade"));

        p.storage_ring.retrieve("iron_sword", 1).unwrap();
        p.equipment.set(EquipmentSlot::Weapon, Some("iron_sword".to_string()));
        p.storage_ring.retrieve("azure_robe", 1).unwrap();
        p.equipment.set(EquipmentSlot::Armor, Some("azure_robe".to_string()));
        p.storage_ring.retrieve("basic_sword_art", 1).unwrap();
        p.equipment.set(EquipmentSlot::MainTechnique, Some("basic_sword_art".to_string()));
    }

    let player_stats = compose_stats(&player, &catalogs, 0).stats;
    let opponent_stats = compose_stats(&opponent, &catalogs, 0).stats;

    assert!(player_stats.physical_attack > player.physical_attack, "equipment and technique should raise attack above base");
    assert_eq!(player_stats.skills.len(), 1, "the one equipped skill should resolve");

    let outcome = resolve_battle(player_stats, opponent_stats, BattleKind::Duel, &mut rng);

    assert!(outcome.rounds >= 1);
    assert!(outcome.rounds <= 50);
    assert!(!outcome.log.is_empty());
    // A duel always runs to a death or the round cap, never a surrender.
    assert!(!outcome.attacker_final.is_alive() || !outcome.defender_final.is_alive() || outcome.rounds == 50);
}

#[test]
fn battle_is_deterministic_given_the_same_seed() {
    let catalogs = default_catalogs();
    let realm_zero = catalogs.realm(0).unwrap();

    let run = || {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let player = create_player("a", None, CultivationPath::Spirit, realm_zero, 0, &mut rng);
        let opponent = create_player("b", None, CultivationPath::Body, realm_zero, 0, &mut rng);
        let player_stats = compose_stats(&player, &catalogs, 0).stats;
        let opponent_stats = compose_stats(&opponent, &catalogs, 0).stats;
        resolve_battle(player_stats, opponent_stats, BattleKind::Duel, &mut rng)
    };

    let first = run();
    let second = run();
    assert_eq!(first.winner, second.winner);
    assert_eq!(first.rounds, second.rounds);
    assert_eq!(first.log, second.log);
}
