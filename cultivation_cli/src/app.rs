//! Application state for the stat-composition / combat visualization harness.

use cultivation_core::combat::{resolve_battle, BattleOutcome};
use cultivation_core::config::{default_catalogs, Catalogs};
use cultivation_core::player::create_player;
use cultivation_core::player::Player;
use cultivation_core::stats_pipeline::compose_stats;
use cultivation_core::types::{BattleKind, CultivationPath, EquipmentSlot};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Which combatant the Equipment tab is currently editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipTarget {
    Player,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Stats,
    Equipment,
    Breakdown,
    Combat,
    Skills,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Stats, Tab::Equipment, Tab::Breakdown, Tab::Combat, Tab::Skills, Tab::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Stats => "Stats",
            Tab::Equipment => "Equip",
            Tab::Breakdown => "Calc",
            Tab::Combat => "Combat",
            Tab::Skills => "Skills",
            Tab::Help => "Help",
        }
    }
}

/// The four equippable slots in a fixed order, used to index `selected_slot`.
pub const EQUIP_SLOTS: [EquipmentSlot; 3] = [
    EquipmentSlot::Weapon,
    EquipmentSlot::Armor,
    EquipmentSlot::MainTechnique,
];

pub struct App {
    pub current_tab: Tab,
    pub catalogs: Catalogs,
    pub player: Player,
    pub opponent: Player,
    pub now: i64,
    pub rng: ChaCha8Rng,

    pub combat_log: Vec<String>,
    pub last_outcome: Option<BattleOutcome>,
    pub battle_kind: BattleKind,

    pub show_help: bool,
    pub stats_scroll: usize,
    pub log_scroll: usize,
    pub breakdown_scroll: usize,

    pub equip_target: EquipTarget,
    pub selected_slot: usize,
    pub selected_inventory: usize,

    pub selected_skill: usize,
}

impl App {
    pub fn new() -> Self {
        let catalogs = default_catalogs();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let realm_zero = catalogs.realm(0).expect("default catalogs always have realm 0");
        let mut player = create_player("cli_player", Some("Wandering Sword".to_string()), CultivationPath::Spirit, realm_zero, 0, &mut rng);
        let mut opponent = create_player("cli_opponent", Some("Shadow Duelist".to_string()), CultivationPath::Body, realm_zero, 0, &mut rng);

        // Seed both combatants with a starter loadout so every view has
        // something to show on first launch.
        for p in [&mut player, &mut opponent] {
            let _ = p.storage_ring.store("iron_sword", 1);
            let _ = p.storage_ring.store("azure_robe", 1);
            let _ = p.storage_ring.store("basic_sword_art", 1);
            p.learned_skills.insert("flowing_blade".to_string());
            p.learned_skills.insert("freeze".to_string());
            p.equip_skill("flowing_blade");
        }
        player.equipment.weapon = Some("iron_sword".to_string());
        player.equipment.armor = Some("azure_robe".to_string());
        player.equipment.main_technique = Some("basic_sword_art".to_string());
        let _ = player.storage_ring.retrieve("iron_sword", 1);
        let _ = player.storage_ring.retrieve("azure_robe", 1);
        let _ = player.storage_ring.retrieve("basic_sword_art", 1);

        App {
            current_tab: Tab::Stats,
            catalogs,
            player,
            opponent,
            now: 0,
            rng,
            combat_log: vec!["no battles fought yet — press [a] on the Combat tab".to_string()],
            last_outcome: None,
            battle_kind: BattleKind::Duel,
            show_help: false,
            stats_scroll: 0,
            log_scroll: 0,
            breakdown_scroll: 0,
            equip_target: EquipTarget::Player,
            selected_slot: 0,
            selected_inventory: 0,
            selected_skill: 0,
        }
    }

    fn target_mut(&mut self) -> &mut Player {
        match self.equip_target {
            EquipTarget::Player => &mut self.player,
            EquipTarget::Opponent => &mut self.opponent,
        }
    }

    fn target(&self) -> &Player {
        match self.equip_target {
            EquipTarget::Player => &self.player,
            EquipTarget::Opponent => &self.opponent,
        }
    }

    /// Inventory item names currently sitting in the targeted combatant's
    /// storage ring, sorted for stable selection.
    pub fn target_inventory(&self) -> Vec<String> {
        let mut names: Vec<String> = self.target().storage_ring.items.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }

    pub fn set_tab(&mut self, index: usize) {
        let tabs = Tab::all();
        if index < tabs.len() {
            self.current_tab = tabs[index];
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_equip_target(&mut self) {
        self.equip_target = match self.equip_target {
            EquipTarget::Player => EquipTarget::Opponent,
            EquipTarget::Opponent => EquipTarget::Player,
        };
        self.selected_slot = 0;
        self.selected_inventory = 0;
    }

    pub fn on_up(&mut self) {
        match self.current_tab {
            Tab::Stats => self.stats_scroll = self.stats_scroll.saturating_sub(1),
            Tab::Breakdown => self.breakdown_scroll = self.breakdown_scroll.saturating_sub(1),
            Tab::Combat => self.log_scroll = self.log_scroll.saturating_sub(1),
            Tab::Equipment => {
                if self.selected_inventory > 0 {
                    self.selected_inventory -= 1;
                } else if self.selected_slot > 0 {
                    self.selected_slot -= 1;
                }
            }
            Tab::Skills => self.selected_skill = self.selected_skill.saturating_sub(1),
            Tab::Help => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.current_tab {
            Tab::Stats => self.stats_scroll = self.stats_scroll.saturating_add(1),
            Tab::Breakdown => self.breakdown_scroll = self.breakdown_scroll.saturating_add(1),
            Tab::Combat => self.log_scroll = self.log_scroll.saturating_add(1),
            Tab::Equipment => {
                let inventory_len = self.target_inventory().len();
                if self.selected_inventory + 1 < inventory_len.max(1) {
                    self.selected_inventory += 1;
                } else if self.selected_slot + 1 < EQUIP_SLOTS.len() {
                    self.selected_slot += 1;
                }
            }
            Tab::Skills => {
                let learned = self.sorted_learned_skills();
                if self.selected_skill + 1 < learned.len() {
                    self.selected_skill += 1;
                }
            }
            Tab::Help => {}
        }
    }

    pub fn on_left(&mut self) {
        if self.current_tab == Tab::Equipment {
            self.toggle_equip_target();
        }
    }

    pub fn on_right(&mut self) {
        if self.current_tab == Tab::Equipment {
            self.toggle_equip_target();
        }
    }

    /// Equip the selected inventory item into its catalog-resolved slot,
    /// returning whatever previously occupied that slot to the ring.
    pub fn on_enter(&mut self) {
        match self.current_tab {
            Tab::Equipment => self.equip_selected_inventory_item(),
            Tab::Skills => self.toggle_selected_skill_equipped(),
            _ => {}
        }
    }

    pub fn on_space(&mut self) {
        self.on_enter();
    }

    fn equip_selected_inventory_item(&mut self) {
        let inventory = self.target_inventory();
        let Some(name) = inventory.get(self.selected_inventory).cloned() else { return };

        let slot = if self.catalogs.technique(&name).is_some() {
            EquipmentSlot::MainTechnique
        } else if let Some(item) = self.catalogs.item(&name) {
            match item.kind {
                cultivation_core::config::ItemKind::Weapon => EquipmentSlot::Weapon,
                cultivation_core::config::ItemKind::Armor => EquipmentSlot::Armor,
                cultivation_core::config::ItemKind::MainTechnique | cultivation_core::config::ItemKind::Technique => {
                    EquipmentSlot::MainTechnique
                }
                _ => return,
            }
        } else {
            return;
        };

        let target = self.target_mut();
        if target.storage_ring.retrieve(&name, 1).is_err() {
            return;
        }
        if let Some(previous) = target.equipment.get(slot).clone() {
            let _ = target.storage_ring.store(&previous, 1);
        }
        target.equipment.set(slot, Some(name));
    }

    pub fn unequip_current_slot(&mut self) {
        let slot = EQUIP_SLOTS[self.selected_slot.min(EQUIP_SLOTS.len() - 1)];
        let target = self.target_mut();
        if let Some(item_name) = target.equipment.get(slot).clone() {
            let _ = target.storage_ring.store(&item_name, 1);
            target.equipment.set(slot, None);
        }
    }

    fn sorted_learned_skills(&self) -> Vec<String> {
        let mut skills: Vec<String> = self.player.learned_skills.iter().cloned().collect();
        skills.sort();
        skills
    }

    fn toggle_selected_skill_equipped(&mut self) {
        let skills = self.sorted_learned_skills();
        let Some(id) = skills.get(self.selected_skill) else { return };
        if self.player.equipped_skills.iter().any(|s| s == id) {
            self.player.unequip_skill(id);
        } else {
            self.player.equip_skill(id);
        }
    }

    /// Cycle the battle kind the Combat tab fights under (duel vs spar),
    /// which changes whether the 20% surrender rule applies.
    pub fn toggle_battle_kind(&mut self) {
        self.battle_kind = match self.battle_kind {
            BattleKind::Duel => BattleKind::Spar,
            _ => BattleKind::Duel,
        };
    }

    /// Run one full battle between the composed stats of `player` and
    /// `opponent` and append its log to the combat panel.
    pub fn attack(&mut self) {
        let player_stats = compose_stats(&self.player, &self.catalogs, self.now).stats;
        let opponent_stats = compose_stats(&self.opponent, &self.catalogs, self.now).stats;

        let outcome = resolve_battle(player_stats, opponent_stats, self.battle_kind, &mut self.rng);

        self.combat_log = outcome.log.clone();
        self.combat_log.push(match &outcome.winner {
            Some(id) if *id == self.player.user_id => "you win!".to_string(),
            Some(id) if *id == self.opponent.user_id => "you lose.".to_string(),
            Some(_) => "battle concluded.".to_string(),
            None => "draw.".to_string(),
        });
        self.log_scroll = 0;
        self.last_outcome = Some(outcome);
    }

    pub fn reset(&mut self) {
        self.combat_log = vec!["combat log cleared.".to_string()];
        self.last_outcome = None;
        self.log_scroll = 0;
    }

    /// Advance the simulated clock, purging any expired temporary pill
    /// effects the next time stats are composed.
    pub fn tick_time(&mut self, secs: f64) {
        self.now += secs.max(0.0) as i64;
    }

    pub fn tick(&mut self, _dt: f64) {
        // No real-time simulation runs between key presses; battles are
        // resolved instantaneously on [a]/[space] per the turn-based engine.
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
