//! Tunable game constants
//!
//! Every magic number that governs combat and progression lives here rather
//! than scattered through the combat/stats code, so a deployment can retune
//! the game by shipping a different TOML file without touching logic.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConstants {
    pub combat: CombatConstants,
    pub stats: StatConstants,
    pub breakthrough: BreakthroughConstants,
    pub activity: ActivityConstants,
}

impl Default for GameConstants {
    fn default() -> Self {
        GameConstants {
            combat: CombatConstants::default(),
            stats: StatConstants::default(),
            breakthrough: BreakthroughConstants::default(),
            activity: ActivityConstants::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "default_spar_surrender_threshold")]
    pub spar_surrender_threshold: f64,
    #[serde(default = "default_hit_rate_floor")]
    pub hit_rate_floor: f64,
    #[serde(default = "default_hit_rate_ceiling")]
    pub hit_rate_ceiling: f64,
    #[serde(default = "default_armour_constant")]
    pub armour_constant: f64,
    #[serde(default = "default_damage_variance")]
    pub damage_variance: f64,
    #[serde(default = "default_confusion_self_strike_ratio")]
    pub confusion_self_strike_ratio: f64,
    #[serde(default = "default_skill_select_weight")]
    pub skill_select_weight: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            max_rounds: default_max_rounds(),
            spar_surrender_threshold: default_spar_surrender_threshold(),
            hit_rate_floor: default_hit_rate_floor(),
            hit_rate_ceiling: default_hit_rate_ceiling(),
            armour_constant: default_armour_constant(),
            damage_variance: default_damage_variance(),
            confusion_self_strike_ratio: default_confusion_self_strike_ratio(),
            skill_select_weight: default_skill_select_weight(),
        }
    }
}

fn default_max_rounds() -> u32 {
    50
}
fn default_spar_surrender_threshold() -> f64 {
    0.2
}
fn default_hit_rate_floor() -> f64 {
    0.3
}
fn default_hit_rate_ceiling() -> f64 {
    0.95
}
fn default_armour_constant() -> f64 {
    100.0
}
fn default_damage_variance() -> f64 {
    0.1
}
fn default_confusion_self_strike_ratio() -> f64 {
    0.3
}
fn default_skill_select_weight() -> f64 {
    0.8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatConstants {
    #[serde(default = "default_crit_rate_cap")]
    pub crit_rate_cap: f64,
    #[serde(default = "default_min_crit_damage")]
    pub min_crit_damage: f64,
    #[serde(default = "default_hit_rate_min")]
    pub hit_rate_min: f64,
    #[serde(default = "default_hit_rate_max")]
    pub hit_rate_max: f64,
    #[serde(default = "default_dodge_rate_cap")]
    pub dodge_rate_cap: f64,
    #[serde(default = "default_realm_multiplier_step")]
    pub realm_multiplier_step: f64,
}

impl Default for StatConstants {
    fn default() -> Self {
        StatConstants {
            crit_rate_cap: default_crit_rate_cap(),
            min_crit_damage: default_min_crit_damage(),
            hit_rate_min: default_hit_rate_min(),
            hit_rate_max: default_hit_rate_max(),
            dodge_rate_cap: default_dodge_rate_cap(),
            realm_multiplier_step: default_realm_multiplier_step(),
        }
    }
}

fn default_crit_rate_cap() -> f64 {
    0.8
}
fn default_min_crit_damage() -> f64 {
    1.0
}
fn default_hit_rate_min() -> f64 {
    0.5
}
fn default_hit_rate_max() -> f64 {
    1.0
}
fn default_dodge_rate_cap() -> f64 {
    0.8
}
fn default_realm_multiplier_step() -> f64 {
    0.1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakthroughConstants {
    #[serde(default = "default_death_min")]
    pub death_min: f64,
    #[serde(default = "default_death_max")]
    pub death_max: f64,
    #[serde(default = "default_survive_exp_penalty")]
    pub survive_exp_penalty: f64,
}

impl Default for BreakthroughConstants {
    fn default() -> Self {
        BreakthroughConstants {
            death_min: default_death_min(),
            death_max: default_death_max(),
            survive_exp_penalty: default_survive_exp_penalty(),
        }
    }
}

fn default_death_min() -> f64 {
    0.05
}
fn default_death_max() -> f64 {
    0.3
}
fn default_survive_exp_penalty() -> f64 {
    0.1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConstants {
    #[serde(default = "default_base_cultivation_cap_hours")]
    pub base_cultivation_cap_hours: f64,
    #[serde(default = "default_cultivation_cap_step_hours")]
    pub cultivation_cap_step_hours: f64,
    #[serde(default = "default_cultivation_cap_step_realms")]
    pub cultivation_cap_step_realms: u32,
    #[serde(default = "default_regen_percent_per_minute")]
    pub regen_percent_per_minute: f64,
    #[serde(default = "default_rebirth_cooldown_secs")]
    pub rebirth_cooldown_secs: i64,
    #[serde(default = "default_duel_cooldown_secs")]
    pub duel_cooldown_secs: i64,
    #[serde(default = "default_spar_cooldown_secs")]
    pub spar_cooldown_secs: i64,
}

impl Default for ActivityConstants {
    fn default() -> Self {
        ActivityConstants {
            base_cultivation_cap_hours: default_base_cultivation_cap_hours(),
            cultivation_cap_step_hours: default_cultivation_cap_step_hours(),
            cultivation_cap_step_realms: default_cultivation_cap_step_realms(),
            regen_percent_per_minute: default_regen_percent_per_minute(),
            rebirth_cooldown_secs: default_rebirth_cooldown_secs(),
            duel_cooldown_secs: default_duel_cooldown_secs(),
            spar_cooldown_secs: default_spar_cooldown_secs(),
        }
    }
}

fn default_base_cultivation_cap_hours() -> f64 {
    24.0
}
fn default_cultivation_cap_step_hours() -> f64 {
    6.0
}
fn default_cultivation_cap_step_realms() -> u32 {
    9
}
fn default_regen_percent_per_minute() -> f64 {
    0.005
}
fn default_rebirth_cooldown_secs() -> i64 {
    3600
}
fn default_duel_cooldown_secs() -> i64 {
    300
}
fn default_spar_cooldown_secs() -> i64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constants_match_spec() {
        let c = GameConstants::default();
        assert_eq!(c.combat.max_rounds, 50);
        assert!((c.combat.spar_surrender_threshold - 0.2).abs() < f64::EPSILON);
        assert!((c.stats.dodge_rate_cap - 0.8).abs() < f64::EPSILON);
        assert_eq!(c.activity.rebirth_cooldown_secs, 3600);
    }

    #[test]
    fn parse_from_toml() {
        let toml = r#"
[combat]
max_rounds = 50
spar_surrender_threshold = 0.2
hit_rate_floor = 0.3
hit_rate_ceiling = 0.95
armour_constant = 100.0
damage_variance = 0.1
confusion_self_strike_ratio = 0.3
skill_select_weight = 0.8

[stats]
crit_rate_cap = 0.8
min_crit_damage = 1.0
hit_rate_min = 0.5
hit_rate_max = 1.0
dodge_rate_cap = 0.8
realm_multiplier_step = 0.1

[breakthrough]
death_min = 0.05
death_max = 0.3
survive_exp_penalty = 0.1

[activity]
base_cultivation_cap_hours = 24.0
cultivation_cap_step_hours = 6.0
cultivation_cap_step_realms = 9
regen_percent_per_minute = 0.005
rebirth_cooldown_secs = 3600
duel_cooldown_secs = 300
spar_cooldown_secs = 60
"#;
        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert_eq!(constants.combat.max_rounds, 50);
    }
}
