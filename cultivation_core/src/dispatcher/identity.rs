//! Identity & status commands: first contact,
//! the `info` summary, the dao-name rename, and the abandon-path lifecycle
//! event.

use rand::Rng;

use crate::error::DispatchError;
use crate::player::create_player;
use crate::types::CultivationPath;

use super::Dispatcher;

const ABANDON_PATH_COOLDOWN_SECS: i64 = 3600;
const CHECK_IN_GOLD: u64 = 50;
const CHECK_IN_EXP: u64 = 20;
const CHECK_IN_SECONDS_PER_DAY: i64 = 86_400;

fn parse_path(args: &[&str]) -> CultivationPath {
    match args.first().map(|s| s.to_lowercase()) {
        Some(s) if s == "body" => CultivationPath::Body,
        _ => CultivationPath::Spirit,
    }
}

pub fn enter_cultivation(
    dispatcher: &mut Dispatcher,
    user_id: &str,
    display_name: &str,
    args: &[&str],
    now: i64,
    rng: &mut impl Rng,
) -> Result<String, DispatchError> {
    if dispatcher.world.players.contains_key(user_id) {
        return Err(DispatchError::Conflict {
            reason: "you have already entered the cultivation path".to_string(),
        });
    }

    let path = parse_path(args);
    let realm_zero = dispatcher.catalogs.realm(0).ok_or_else(|| DispatchError::NotFound {
        kind: "realm".to_string(),
        name: "0".to_string(),
    })?;
    let player = create_player(user_id, Some(display_name.to_string()), path, realm_zero, now, rng);
    let spiritual_root = player.spiritual_root;
    dispatcher.world.players.insert(user_id.to_string(), player);

    Ok(format!(
        "{display_name} begins the {path:?} path at {} with a {spiritual_root:?} spiritual root.",
        realm_zero.name
    ))
}

pub fn info(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    let realm_name = dispatcher
        .catalogs
        .realm(player.realm_index)
        .map(|r| r.name.as_str())
        .unwrap_or("unknown realm");
    Ok(format!(
        "{} ({:?}/{:?}) — {} | exp {} | hp {}/{} | mp {}/{} | gold {}",
        player.display_name.clone().unwrap_or_else(|| player.user_id.clone()),
        player.cultivation_path,
        player.spiritual_root,
        realm_name,
        player.experience,
        player.hp,
        player.max_hp,
        player.mp,
        player.max_mp,
        player.gold,
    ))
}

pub fn set_dao_name(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let name = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "set_dao_name requires a name argument".to_string(),
    })?;
    let player = dispatcher.player_mut(user_id)?;
    player.display_name = Some(name.to_string());
    Ok(format!("dao name set to {name}"))
}

/// Destroys the player's record, subject to a 1-hour cooldown tracked
/// independently of the record itself (a key-value entry rather than a
/// `Player` field, since the record the cooldown would otherwise live on
/// is exactly what this command deletes). Requires the literal `confirm`
/// argument to guard against accidental invocation.
pub fn abandon_path(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    dispatcher.player(user_id)?;

    if let Some(&last) = dispatcher.world.abandon_cooldowns.get(user_id) {
        let elapsed = now - last;
        if elapsed < ABANDON_PATH_COOLDOWN_SECS {
            return Err(DispatchError::NotReady {
                remaining: ABANDON_PATH_COOLDOWN_SECS - elapsed,
            });
        }
    }

    if args.first().copied() != Some("confirm") {
        return Err(DispatchError::PreconditionNotMet {
            reason: "abandon_path is destructive; pass `confirm` to proceed".to_string(),
        });
    }

    dispatcher.world.players.remove(user_id);
    dispatcher.world.abandon_cooldowns.insert(user_id.to_string(), now);
    Ok("you have abandoned your path; the dao awaits your return".to_string())
}

pub fn check_in(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let player = dispatcher.player_mut(user_id)?;
    let today = now.div_euclid(CHECK_IN_SECONDS_PER_DAY);
    let last_day = player.last_check_in_date.div_euclid(CHECK_IN_SECONDS_PER_DAY);
    if player.last_check_in_date != 0 && today == last_day {
        return Err(DispatchError::PreconditionNotMet {
            reason: "already checked in today".to_string(),
        });
    }
    player.last_check_in_date = now;
    player.gold += CHECK_IN_GOLD;
    player.experience += CHECK_IN_EXP;
    Ok(format!("checked in: +{CHECK_IN_GOLD} gold, +{CHECK_IN_EXP} exp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dispatcher() -> Dispatcher {
        Dispatcher::with_defaults()
    }

    #[test]
    fn enter_cultivation_twice_fails() {
        let mut d = dispatcher();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        enter_cultivation(&mut d, "u1", "Alice", &[], 0, &mut rng).unwrap();
        assert!(matches!(
            enter_cultivation(&mut d, "u1", "Alice", &[], 0, &mut rng),
            Err(DispatchError::Conflict { .. })
        ));
    }

    #[test]
    fn abandon_path_requires_confirm() {
        let mut d = dispatcher();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        enter_cultivation(&mut d, "u1", "Alice", &[], 0, &mut rng).unwrap();
        assert!(matches!(
            abandon_path(&mut d, "u1", &[], 0),
            Err(DispatchError::PreconditionNotMet { .. })
        ));
        abandon_path(&mut d, "u1", &["confirm"], 0).unwrap();
        assert!(!d.world.players.contains_key("u1"));
    }

    #[test]
    fn abandon_path_cooldown_blocks_rapid_rebirth() {
        let mut d = dispatcher();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        enter_cultivation(&mut d, "u1", "Alice", &[], 0, &mut rng).unwrap();
        abandon_path(&mut d, "u1", &["confirm"], 0).unwrap();
        enter_cultivation(&mut d, "u1", "Alice", &[], 1, &mut rng).unwrap();
        assert!(matches!(
            abandon_path(&mut d, "u1", &["confirm"], 1),
            Err(DispatchError::NotReady { .. })
        ));
    }

    #[test]
    fn check_in_twice_same_day_fails() {
        let mut d = dispatcher();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        enter_cultivation(&mut d, "u1", "Alice", &[], 0, &mut rng).unwrap();
        check_in(&mut d, "u1", 0).unwrap();
        assert!(matches!(check_in(&mut d, "u1", 10), Err(DispatchError::PreconditionNotMet { .. })));
        assert!(check_in(&mut d, "u1", CHECK_IN_SECONDS_PER_DAY + 10).is_ok());
    }
}
