//! Player creation and the abandon-path lifecycle event.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use super::model::{EquipmentSlots, Player};
use crate::config::RealmEntry;
use crate::inventory::StorageRing;
use crate::scheduler::ActivityState;
use crate::types::{CultivationPath, SpiritualRoot};

const STARTING_CRITICAL_RATE: f64 = 0.05;
const STARTING_CRITICAL_DAMAGE: f64 = 1.5;
const STARTING_HIT_RATE: f64 = 0.95;
const STARTING_DODGE_RATE: f64 = 0.05;
const STARTING_STORAGE_CAPACITY: u32 = 10;
const STARTING_LIFESPAN: i64 = 120;
const ABANDON_PATH_COOLDOWN_SECS: i64 = 3600;

/// Draw a spiritual root from the weighted rarity table.
pub fn draw_spiritual_root(rng: &mut impl Rng) -> SpiritualRoot {
    let table = SpiritualRoot::weighted_table();
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (root, weight) in table {
        if roll < *weight {
            return *root;
        }
        roll -= weight;
    }
    table.last().unwrap().0
}

/// Create a new Player on first "enter cultivation" command: a randomly
/// chosen spiritual root and base stats derived from realm 0.
pub fn create_player(
    user_id: impl Into<String>,
    display_name: Option<String>,
    path: CultivationPath,
    realm_zero: &RealmEntry,
    now: i64,
    rng: &mut impl Rng,
) -> Player {
    let spiritual_root = draw_spiritual_root(rng);

    let (physical_attack, magic_attack) = match path {
        CultivationPath::Spirit => (
            realm_zero.base_physical_attack * 7 / 10,
            realm_zero.base_magic_attack * 13 / 10,
        ),
        CultivationPath::Body => (
            realm_zero.base_physical_attack * 13 / 10,
            realm_zero.base_magic_attack * 7 / 10,
        ),
    };

    Player {
        user_id: user_id.into(),
        display_name,
        realm_index: 0,
        cultivation_path: path,
        spiritual_root,
        experience: 0,
        lifespan: STARTING_LIFESPAN,
        gold: 0,
        hp: realm_zero.base_hp,
        max_hp: realm_zero.base_hp,
        mp: realm_zero.base_mp,
        max_mp: realm_zero.base_mp,
        physical_attack,
        magic_attack,
        physical_defense: realm_zero.base_physical_defense,
        magic_defense: realm_zero.base_magic_defense,
        mental_power: 10,
        speed: realm_zero.base_speed,
        critical_rate: STARTING_CRITICAL_RATE,
        critical_damage: STARTING_CRITICAL_DAMAGE,
        hit_rate: STARTING_HIT_RATE,
        dodge_rate: STARTING_DODGE_RATE,
        equipment: EquipmentSlots::default(),
        learned_skills: HashSet::new(),
        equipped_skills: Vec::new(),
        active_temporary_effects: Vec::new(),
        permanent_pill_gains: Default::default(),
        has_resurrection_token: false,
        has_debuff_shield: false,
        pill_inventory: HashMap::new(),
        storage_ring: StorageRing::new(STARTING_STORAGE_CAPACITY),
        activity_state: ActivityState::Idle,
        last_check_in_date: now,
        cultivation_start_time: 0,
        last_start_time: HashMap::new(),
        last_abandon_time: None,
    }
}

/// Whether `abandon_path` may proceed right now given the global 1-hour
/// cooldown. Returns the remaining seconds on
/// failure.
pub fn check_abandon_cooldown(player: &Player, now: i64) -> Result<(), i64> {
    match player.last_abandon_time {
        Some(last) if now - last < ABANDON_PATH_COOLDOWN_SECS => {
            Err(ABANDON_PATH_COOLDOWN_SECS - (now - last))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_realm() -> RealmEntry {
        RealmEntry {
            name: "Qi Condensation".into(),
            required_exp: 1000,
            base_success_rate: 0.9,
            breakthrough_gains: Default::default(),
            base_hp: 500,
            base_mp: 200,
            base_speed: 10,
            base_physical_attack: 50,
            base_magic_attack: 50,
            base_physical_defense: 20,
            base_magic_defense: 20,
        }
    }

    #[test]
    fn spiritual_root_draw_is_deterministic_given_seed() {
        let mut rng_a = ChaCha8Rng::seed_from_u64(5);
        let mut rng_b = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(draw_spiritual_root(&mut rng_a), draw_spiritual_root(&mut rng_b));
    }

    #[test]
    fn new_player_starts_idle_at_realm_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let realm = sample_realm();
        let player = create_player("u1", None, CultivationPath::Spirit, &realm, 0, &mut rng);
        assert_eq!(player.realm_index, 0);
        assert_eq!(player.hp, realm.base_hp);
        assert!(matches!(player.activity_state, ActivityState::Idle));
        assert_eq!(player.equipped_skills.len(), 0);
    }

    #[test]
    fn abandon_cooldown_blocks_within_the_hour() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let realm = sample_realm();
        let mut player = create_player("u1", None, CultivationPath::Spirit, &realm, 0, &mut rng);
        player.last_abandon_time = Some(0);
        assert!(check_abandon_cooldown(&player, 1000).is_err());
        assert!(check_abandon_cooldown(&player, 4000).is_ok());
    }
}
