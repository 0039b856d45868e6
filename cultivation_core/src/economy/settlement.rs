//! Lazy reward settlement: elapsed time is clamped, never
//! driven by a background timer — rewards are computed the moment a
//! `finish` command is issued.

use crate::config::{GameConstants, TimedActivityTemplate};
use crate::player::Player;

/// Cultivation experience gained per elapsed minute before root/technique/
/// temporary multipliers.
const BASE_EXP_PER_MINUTE: f64 = 2.0;
const HP_MP_REGEN_PERCENT_PER_MINUTE_FALLBACK: f64 = 0.005;

#[derive(Debug, Clone, PartialEq)]
pub struct SettlementResult {
    pub elapsed_secs: i64,
    pub experience_gained: u64,
    pub gold_gained: u64,
    pub hp_recovered: i64,
    pub mp_recovered: i64,
}

/// Clamp elapsed cultivation time to `24h + (realm_index / 9) * 6h` (spec
/// §4.6) and settle experience plus hp/mp regeneration.
pub fn settle_cultivation(player: &Player, constants: &GameConstants, elapsed_secs: i64, technique_exp_multiplier: f64, temporary_cultivation_multiplier: f64) -> SettlementResult {
    let cap_hours = constants.activity.base_cultivation_cap_hours
        + (player.realm_index as u32 / constants.activity.cultivation_cap_step_realms) as f64
            * constants.activity.cultivation_cap_step_hours;
    let cap_secs = (cap_hours * 3600.0) as i64;
    let clamped = elapsed_secs.clamp(0, cap_secs);
    let minutes = clamped as f64 / 60.0;

    let root_multiplier = player.spiritual_root.cultivation_multiplier();
    let experience_gained = (minutes
        * BASE_EXP_PER_MINUTE
        * root_multiplier
        * (1.0 + technique_exp_multiplier)
        * temporary_cultivation_multiplier.max(0.0))
    .floor()
    .max(0.0) as u64;

    let regen_percent = if constants.activity.regen_percent_per_minute > 0.0 {
        constants.activity.regen_percent_per_minute
    } else {
        HP_MP_REGEN_PERCENT_PER_MINUTE_FALLBACK
    };
    let hp_recovered = ((player.max_hp as f64) * regen_percent * minutes).floor() as i64;
    let mp_recovered = ((player.max_mp as f64) * regen_percent * minutes).floor() as i64;

    SettlementResult {
        elapsed_secs: clamped,
        experience_gained,
        gold_gained: 0,
        hp_recovered: hp_recovered.min(player.max_hp - player.hp).max(0),
        mp_recovered: mp_recovered.min(player.max_mp - player.mp).max(0),
    }
}

/// Settle a timed-activity template (adventure route, rift exploration,
/// bounty): elapsed time is clamped to the template's duration, and reward
/// scales proportionally with how much of that window elapsed.
pub fn settle_timed_activity(template: &TimedActivityTemplate, elapsed_secs: i64) -> SettlementResult {
    let clamped = elapsed_secs.clamp(0, template.duration_secs);
    let fraction = if template.duration_secs == 0 {
        1.0
    } else {
        clamped as f64 / template.duration_secs as f64
    };

    SettlementResult {
        elapsed_secs: clamped,
        experience_gained: (template.exp_reward as f64 * fraction).floor() as u64,
        gold_gained: (template.gold_reward as f64 * fraction).floor() as u64,
        hp_recovered: 0,
        mp_recovered: 0,
    }
}

pub fn settle_adventure(template: &TimedActivityTemplate, elapsed_secs: i64) -> SettlementResult {
    settle_timed_activity(template, elapsed_secs)
}

pub fn settle_exploration(template: &TimedActivityTemplate, elapsed_secs: i64) -> SettlementResult {
    settle_timed_activity(template, elapsed_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_catalogs;
    use crate::player::create_player;
    use crate::types::CultivationPath;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_player() -> Player {
        let catalogs = default_catalogs();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        create_player("u1", None, CultivationPath::Spirit, catalogs.realm(0).unwrap(), 0, &mut rng)
    }

    #[test]
    fn cultivation_elapsed_is_clamped_to_24h_at_realm_zero() {
        let constants = GameConstants::default();
        let player = sample_player();
        let result = settle_cultivation(&player, &constants, 25 * 3600, 0.0, 1.0);
        assert_eq!(result.elapsed_secs, 24 * 3600);
    }

    #[test]
    fn zero_duration_cultivation_grants_no_experience() {
        let constants = GameConstants::default();
        let mut player = sample_player();
        player.hp = player.max_hp;
        player.mp = player.max_mp;
        let result = settle_cultivation(&player, &constants, 0, 0.0, 1.0);
        assert_eq!(result.experience_gained, 0);
        assert_eq!(result.hp_recovered, 0);
    }

    #[test]
    fn regen_never_exceeds_missing_hp_or_mp() {
        let constants = GameConstants::default();
        let mut player = sample_player();
        player.hp = player.max_hp - 1;
        player.mp = player.max_mp - 1;
        let result = settle_cultivation(&player, &constants, 10_000_000, 0.0, 1.0);
        assert_eq!(result.hp_recovered, 1);
        assert_eq!(result.mp_recovered, 1);
    }

    #[test]
    fn timed_activity_reward_scales_with_elapsed_fraction() {
        let template = TimedActivityTemplate {
            id: "route".into(),
            name: "Route".into(),
            min_realm: 0,
            duration_secs: 1000,
            exp_reward: 100,
            gold_reward: 50,
            item_rewards: Vec::new(),
        };
        let half = settle_adventure(&template, 500);
        assert_eq!(half.experience_gained, 50);
        assert_eq!(half.gold_gained, 25);

        let over = settle_adventure(&template, 5000);
        assert_eq!(over.elapsed_secs, 1000);
        assert_eq!(over.experience_gained, 100);
    }
}
