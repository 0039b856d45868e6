//! The command dispatcher: a single `Dispatcher` owning the
//! static `Catalogs`, the tunable `GameConstants`, and all mutable `World`
//! state, routing named commands to the subsystem operations the rest of
//! the crate already implements. The dispatcher's job ends at producing a
//! plain-text response and mutating in-memory state; the chat-platform
//! adapter, physical persistence, and shop-stock generation are out of
//! scope.

mod activities;
mod combat_cmds;
mod equipment_cmds;
mod extras;
mod identity;
mod inventory_cmds;
mod pills_cmds;
mod progression;
mod shop_cmds;

use std::collections::HashMap;

use rand::Rng;

use crate::config::{default_catalogs, Catalogs, GameConstants};
use crate::error::DispatchError;
use crate::features::{BlessedLand, ShopStock, SpiritEye, SpiritFarm};
use crate::inventory::PendingGifts;
use crate::player::Player;
use crate::scheduler::CombatCooldowns;
use crate::world::WorldBossArena;

/// All mutable, in-process state the dispatcher threads commands through.
/// Static reference data (`Catalogs`) lives alongside it on `Dispatcher`
/// but is never mutated after load.
pub struct World {
    pub players: HashMap<String, Player>,
    pub boss_arena: WorldBossArena,
    pub shop_stock: HashMap<String, ShopStock>,
    pub combat_cooldowns: CombatCooldowns,
    pub pending_gifts: PendingGifts,
    pub blessed_lands: HashMap<String, BlessedLand>,
    pub spirit_farms: HashMap<String, SpiritFarm>,
    pub spirit_eyes: HashMap<String, SpiritEye>,
    pub abandon_cooldowns: HashMap<String, i64>,
}

impl World {
    pub fn new() -> Self {
        World {
            players: HashMap::new(),
            boss_arena: WorldBossArena::new(),
            shop_stock: HashMap::new(),
            combat_cooldowns: CombatCooldowns::new(),
            pending_gifts: PendingGifts::new(),
            blessed_lands: HashMap::new(),
            spirit_farms: HashMap::new(),
            spirit_eyes: HashMap::new(),
            abandon_cooldowns: HashMap::new(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        World::new()
    }
}

/// The command surface: owns the static catalogs, the tunable constants,
/// and the mutable world. One process-wide instance is expected; command
/// handlers serialize naturally since `dispatch` takes `&mut self`.
pub struct Dispatcher {
    pub catalogs: Catalogs,
    pub constants: GameConstants,
    pub world: World,
}

impl Dispatcher {
    pub fn new(catalogs: Catalogs, constants: GameConstants) -> Self {
        Dispatcher {
            catalogs,
            constants,
            world: World::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Dispatcher::new(default_catalogs(), GameConstants::default())
    }

    fn player(&self, user_id: &str) -> Result<&Player, DispatchError> {
        self.world.players.get(user_id).ok_or_else(|| DispatchError::NotRegistered {
            user_id: user_id.to_string(),
        })
    }

    fn player_mut(&mut self, user_id: &str) -> Result<&mut Player, DispatchError> {
        self.world.players.get_mut(user_id).ok_or_else(|| DispatchError::NotRegistered {
            user_id: user_id.to_string(),
        })
    }

    /// Pull both `a` and `b` out of the player map for commands that need
    /// two mutable records at once (duel, dual cultivation, gifting).
    /// Returns both to the map before propagating any error.
    fn take_pair(&mut self, a: &str, b: &str) -> Result<(Player, Player), DispatchError> {
        let player_a = self.world.players.remove(a).ok_or_else(|| DispatchError::NotRegistered { user_id: a.to_string() })?;
        let player_b = match self.world.players.remove(b) {
            Some(p) => p,
            None => {
                self.world.players.insert(a.to_string(), player_a);
                return Err(DispatchError::NotRegistered { user_id: b.to_string() });
            }
        };
        Ok((player_a, player_b))
    }

    fn return_pair(&mut self, a: Player, b: Player) {
        self.world.players.insert(a.user_id.clone(), a);
        self.world.players.insert(b.user_id.clone(), b);
    }

    /// Route one command. `args` are whitespace-split tokens following the
    /// command name; `now` is the caller-supplied unix timestamp driving
    /// every lazy-settlement computation.
    pub fn dispatch(&mut self, user_id: &str, display_name: &str, command: &str, args: &[&str], now: i64, rng: &mut impl Rng) -> Result<String, DispatchError> {
        match command {
            "enter_cultivation" => identity::enter_cultivation(self, user_id, display_name, args, now, rng),
            "info" => identity::info(self, user_id),
            "set_dao_name" => identity::set_dao_name(self, user_id, args),
            "abandon_path" => identity::abandon_path(self, user_id, args, now),
            "check-in" | "check_in" => identity::check_in(self, user_id, now),

            "start_cultivation" => activities::start_cultivation(self, user_id, now),
            "end_cultivation" | "finish_cultivation" => activities::finish_cultivation(self, user_id, now),
            "start_adventure" => activities::start_adventure(self, user_id, args, now),
            "adventure_status" => activities::adventure_status(self, user_id),
            "finish_adventure" => activities::finish_adventure(self, user_id, now),
            "rift_list" => activities::rift_list(self),
            "enter_rift" => activities::enter_rift(self, user_id, args, now),
            "finish_exploration" => activities::finish_exploration(self, user_id, now),
            "exit_rift" => activities::exit_rift(self, user_id),
            "bounty_list" => activities::bounty_list(self),
            "accept_bounty" => activities::accept_bounty_cmd(self, user_id, args, now),
            "bounty_status" => activities::bounty_status(self, user_id),
            "complete_bounty" | "turn_in_bounty" => activities::complete_bounty_cmd(self, user_id, now),
            "abandon_bounty" => activities::abandon_bounty(self, user_id),

            "duel" => combat_cmds::duel(self, user_id, args, now, rng),
            "spar" => combat_cmds::spar(self, user_id, args, now, rng),
            "battle_log" => combat_cmds::battle_log(self, user_id, args, now, rng),
            "combat_stats" => combat_cmds::combat_stats(self, user_id, now),
            "boss_info" => combat_cmds::boss_info(self, now),
            "challenge_boss" => combat_cmds::challenge_boss(self, user_id, now, rng),
            "impart_challenge" => combat_cmds::impart_challenge(self, user_id, args, now, rng),

            "breakthrough_info" => progression::breakthrough_info(self, user_id),
            "breakthrough" => progression::breakthrough(self, user_id, args, now, rng),

            "storage_ring" => inventory_cmds::storage_ring(self, user_id),
            "store" => inventory_cmds::store(self, user_id, args),
            "retrieve" => inventory_cmds::retrieve(self, user_id, args),
            "discard" => inventory_cmds::discard(self, user_id, args),
            "gift" => inventory_cmds::gift(self, user_id, args, now),
            "accept_gift" => inventory_cmds::accept_gift(self, user_id),
            "reject_gift" => inventory_cmds::reject_gift(self, user_id),
            "upgrade_storage_ring" => inventory_cmds::upgrade_storage_ring(self, user_id, args),

            "show_equipment" => equipment_cmds::show_equipment(self, user_id),
            "equip" => equipment_cmds::equip(self, user_id, args),
            "unequip" => equipment_cmds::unequip(self, user_id, args),
            "skill_list" => equipment_cmds::skill_list(self, user_id),
            "learn_skill" => equipment_cmds::learn_skill(self, user_id, args),
            "equip_skill" => equipment_cmds::equip_skill(self, user_id, args),
            "unequip_skill" => equipment_cmds::unequip_skill(self, user_id, args),
            "skill_info" => equipment_cmds::skill_info(self, args),
            "available_skills" => equipment_cmds::available_skills(self, user_id),

            "use_pill" => pills_cmds::use_pill(self, user_id, args, now),
            "show_pills" => pills_cmds::show_pills(self, user_id),
            "pill_info" => pills_cmds::pill_info(self, args),

            "pill_pavilion" => shop_cmds::pill_pavilion(self),
            "weapon_pavilion" => shop_cmds::weapon_pavilion(self),
            "treasure_pavilion" => shop_cmds::treasure_pavilion(self),
            "buy" => shop_cmds::buy(self, user_id, args),
            "item_info" => shop_cmds::item_info(self, args),

            "blessed_land_info" => extras::blessed_land_info(self, user_id, now),
            "purchase_blessed_land" => extras::purchase_blessed_land(self, user_id, now),
            "upgrade_blessed_land" => extras::upgrade_blessed_land(self, user_id, now),
            "collect_blessed_land" => extras::collect_blessed_land(self, user_id, now),
            "advance_blessed_land" => extras::advance_blessed_land_cmd(self, user_id, args),

            "farm_info" => extras::farm_info(self, user_id, now),
            "create_farm" => extras::create_farm(self, user_id),
            "plant" => extras::plant(self, user_id, args, now),
            "harvest" => extras::harvest(self, user_id, now),
            "upgrade_farm" => extras::upgrade_farm(self, user_id, args),

            "dual" => extras::dual(self, user_id, args, now),
            "accept_dual" => extras::accept_dual(self, user_id, args, now),
            "reject_dual" => extras::reject_dual(self, user_id, args),

            "spirit_eye_info" => extras::spirit_eye_info(self, args, now),
            "claim_spirit_eye" => extras::claim_spirit_eye(self, user_id, args, now),
            "collect_spirit_eye" => extras::collect_spirit_eye(self, user_id, args, now),
            "release_spirit_eye" => extras::release_spirit_eye(self, user_id, args, now),

            other => Err(DispatchError::NotFound {
                kind: "command".to_string(),
                name: other.to_string(),
            }),
        }
    }
}
