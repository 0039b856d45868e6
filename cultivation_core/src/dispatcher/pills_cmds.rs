//! Pill consumption commands: temporary
//! multiplier pills, permanent bounded gains, and breakthrough-assist
//! pills (which are only consumed through the `breakthrough` command).

use crate::config::PillEffect;
use crate::error::DispatchError;
use crate::player::{ActiveTemporaryEffect, PermanentPillGains};

use super::Dispatcher;

fn parse_count(args: &[&str], index: usize) -> u32 {
    args.get(index).and_then(|s| s.parse::<u32>().ok()).unwrap_or(1)
}

/// `use_pill <pill_id> [count]`: consumes `count` copies from the pill
/// inventory and applies the pill's effect `count` times.
pub fn use_pill(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let pill_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "use_pill requires a pill id".to_string(),
    })?;
    let count = parse_count(args, 1);
    let def = dispatcher.catalogs.pill(pill_id).ok_or_else(|| DispatchError::NotFound {
        kind: "pill".to_string(),
        name: pill_id.to_string(),
    })?;

    if matches!(def.effect, PillEffect::Breakthrough { .. }) {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("{pill_id} is a breakthrough pill; pass it to the breakthrough command instead"),
        });
    }
    let effect = def.effect.clone();
    let pill_name = def.name.clone();

    let player = dispatcher.player_mut(user_id)?;
    let held = player.pill_inventory.get(*pill_id).copied().unwrap_or(0);
    if held < count {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("need {count}x {pill_id}, have {held}"),
        });
    }
    match player.pill_inventory.get_mut(*pill_id) {
        Some(remaining) if *remaining > count => *remaining -= count,
        _ => {
            player.pill_inventory.remove(*pill_id);
        }
    }

    match effect {
        PillEffect::Temporary {
            hp_multiplier,
            mp_multiplier,
            atk_multiplier,
            def_multiplier,
            speed_multiplier,
            critical_rate_bonus,
            dodge_rate_bonus,
            cultivation_multiplier_bonus,
            breakthrough_bonus,
            duration_secs,
        } => {
            for _ in 0..count {
                player.active_temporary_effects.push(ActiveTemporaryEffect {
                    hp_multiplier,
                    mp_multiplier,
                    atk_multiplier,
                    def_multiplier,
                    speed_multiplier,
                    critical_rate_bonus,
                    dodge_rate_bonus,
                    cultivation_multiplier_bonus,
                    breakthrough_bonus,
                    expiry: now + duration_secs,
                    pill_name: pill_name.clone(),
                });
            }
            Ok(format!("used {count}x {pill_name}; temporary effect active for {duration_secs}s"))
        }
        PillEffect::Permanent {
            gains,
            max_hp_percent,
            max_mp_percent,
            atk_percent,
            def_percent,
        } => {
            for _ in 0..count {
                let g = &mut player.permanent_pill_gains;
                g.flat.max_hp += gains.max_hp;
                g.flat.max_mp += gains.max_mp;
                g.flat.physical_attack += gains.physical_attack;
                g.flat.magic_attack += gains.magic_attack;
                g.flat.physical_defense += gains.physical_defense;
                g.flat.magic_defense += gains.magic_defense;
                g.flat.speed += gains.speed;
                g.flat.critical_rate += gains.critical_rate;
                g.flat.critical_damage += gains.critical_damage;
                g.flat.hit_rate += gains.hit_rate;
                g.flat.dodge_rate += gains.dodge_rate;
                g.max_hp_percent = PermanentPillGains::add_percent(g.max_hp_percent, max_hp_percent);
                g.max_mp_percent = PermanentPillGains::add_percent(g.max_mp_percent, max_mp_percent);
                g.atk_percent = PermanentPillGains::add_percent(g.atk_percent, atk_percent);
                g.def_percent = PermanentPillGains::add_percent(g.def_percent, def_percent);
            }
            Ok(format!("used {count}x {pill_name}; permanent gains applied"))
        }
        PillEffect::Breakthrough { .. } => unreachable!("rejected above"),
    }
}

pub fn show_pills(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    if player.pill_inventory.is_empty() {
        return Ok("no pills held".to_string());
    }
    let mut entries: Vec<String> = player.pill_inventory.iter().map(|(name, count)| format!("{name} x{count}")).collect();
    entries.sort_unstable();
    Ok(entries.join(", "))
}

pub fn pill_info(dispatcher: &Dispatcher, args: &[&str]) -> Result<String, DispatchError> {
    let pill_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "pill_info requires a pill id".to_string(),
    })?;
    let def = dispatcher.catalogs.pill(pill_id).ok_or_else(|| DispatchError::NotFound {
        kind: "pill".to_string(),
        name: pill_id.to_string(),
    })?;
    Ok(format!("{}: price {} gold, effect {:?}", def.name, def.price, def.effect))
}
