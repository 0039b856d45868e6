//! Commands for the "other systems" features:
//! blessed land, spirit farm, dual cultivation, and spirit eye. Each
//! follows the same tick-since-last-collect idiom and has no sub-pipeline depth of its own; the dispatcher's
//! job here is purely routing plus gold/inventory bookkeeping.

use crate::error::DispatchError;
use crate::features::{self, BlessedLand, SpiritEye, SpiritFarm};

use super::Dispatcher;

const FARM_PLOT_UPGRADE_PLOTS: usize = 2;
const FARM_UPGRADE_PRICE: u64 = 300;
const HERB_PLANT_COST: u64 = 10;

// ---- Blessed land ----------------------------------------------------

pub fn blessed_land_info(dispatcher: &Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    match dispatcher.world.blessed_lands.get(user_id) {
        Some(land) => Ok(format!(
            "blessed land: tier {} level {} ({} gold unclaimed, upgrade costs {} gold)",
            land.tier,
            land.level,
            land.accrued_yield(now),
            land.upgrade_price()
        )),
        None => Ok(format!("no blessed land yet; purchase for {} gold", BlessedLand::purchase_price(1))),
    }
}

pub fn purchase_blessed_land(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    if dispatcher.world.blessed_lands.contains_key(user_id) {
        return Err(DispatchError::Conflict {
            reason: "you already own a blessed land".to_string(),
        });
    }
    let price = BlessedLand::purchase_price(1);
    let player = dispatcher.player_mut(user_id)?;
    if player.gold < price {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("insufficient gold: have {}, need {price}", player.gold),
        });
    }
    player.gold -= price;
    dispatcher.world.blessed_lands.insert(user_id.to_string(), BlessedLand::purchase(now));
    Ok(format!("blessed land purchased for {price} gold"))
}

pub fn upgrade_blessed_land(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let land = dispatcher
        .world
        .blessed_lands
        .get(user_id)
        .ok_or_else(|| DispatchError::PreconditionNotMet {
            reason: "you do not own a blessed land".to_string(),
        })?;
    let price = land.upgrade_price();
    let player = dispatcher.player_mut(user_id)?;
    if player.gold < price {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("insufficient gold: have {}, need {price}", player.gold),
        });
    }
    player.gold -= price;
    let land = dispatcher.world.blessed_lands.get_mut(user_id).expect("checked above");
    land.collect(now);
    land.upgrade();
    Ok(format!("blessed land upgraded to level {}", land.level))
}

pub fn collect_blessed_land(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let land = dispatcher
        .world
        .blessed_lands
        .get_mut(user_id)
        .ok_or_else(|| DispatchError::PreconditionNotMet {
            reason: "you do not own a blessed land".to_string(),
        })?;
    let amount = land.collect(now);
    let player = dispatcher.player_mut(user_id)?;
    player.gold += amount;
    Ok(format!("collected {amount} gold from your blessed land"))
}

pub fn advance_blessed_land_cmd(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let kind = args.first().copied().unwrap_or("tier");
    let land = dispatcher
        .world
        .blessed_lands
        .get_mut(user_id)
        .ok_or_else(|| DispatchError::PreconditionNotMet {
            reason: "you do not own a blessed land".to_string(),
        })?;
    features::advance_blessed_land(land, kind)?;
    Ok(format!("blessed land advanced to tier {}", land.tier))
}

// ---- Spirit farm -------------------------------------------------------

pub fn farm_info(dispatcher: &Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    match dispatcher.world.spirit_farms.get(user_id) {
        Some(farm) => {
            let plots: Vec<String> = farm
                .plots
                .iter()
                .map(|p| match p {
                    Some(herb) if now >= herb.ready_at => format!("{} (ready)", herb.herb),
                    Some(herb) => format!("{} (ready in {}s)", herb.herb, herb.ready_at - now),
                    None => "empty".to_string(),
                })
                .collect();
            Ok(format!("spirit farm: {}", plots.join(", ")))
        }
        None => Ok("no spirit farm yet; use create_farm".to_string()),
    }
}

pub fn create_farm(dispatcher: &mut Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    dispatcher.player(user_id)?;
    if dispatcher.world.spirit_farms.contains_key(user_id) {
        return Err(DispatchError::Conflict {
            reason: "you already have a spirit farm".to_string(),
        });
    }
    dispatcher.world.spirit_farms.insert(user_id.to_string(), SpiritFarm::create());
    Ok("spirit farm created with 3 plots".to_string())
}

pub fn plant(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let herb = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "plant requires an herb name".to_string(),
    })?;
    let count = args.get(1).and_then(|s| s.parse::<u32>().ok()).unwrap_or(1).max(1);
    let cost = HERB_PLANT_COST * count as u64;

    let player = dispatcher.player_mut(user_id)?;
    if player.gold < cost {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("insufficient gold: have {}, need {cost}", player.gold),
        });
    }
    player.gold -= cost;

    let farm = dispatcher
        .world
        .spirit_farms
        .get_mut(user_id)
        .ok_or_else(|| DispatchError::PreconditionNotMet {
            reason: "you do not have a spirit farm yet".to_string(),
        })?;
    let mut planted = 0;
    for _ in 0..count {
        if farm.plant(herb, now).is_err() {
            break;
        }
        planted += 1;
    }
    if planted == 0 {
        let player = dispatcher.player_mut(user_id)?;
        player.gold += cost;
        return Err(DispatchError::PreconditionNotMet {
            reason: "no free plots".to_string(),
        });
    }
    Ok(format!("planted {planted}x {herb}"))
}

pub fn harvest(dispatcher: &mut Dispatcher, user_id: &str, now: i64) -> Result<String, DispatchError> {
    let farm = dispatcher
        .world
        .spirit_farms
        .get_mut(user_id)
        .ok_or_else(|| DispatchError::PreconditionNotMet {
            reason: "you do not have a spirit farm yet".to_string(),
        })?;
    let harvested = farm.harvest(now);
    if harvested.is_empty() {
        return Ok("nothing ready to harvest".to_string());
    }
    let player = dispatcher.player_mut(user_id)?;
    for herb in &harvested {
        player.storage_ring.store(herb, 1)?;
    }
    Ok(format!("harvested: {}", harvested.join(", ")))
}

pub fn upgrade_farm(dispatcher: &mut Dispatcher, user_id: &str, _args: &[&str]) -> Result<String, DispatchError> {
    let player = dispatcher.player_mut(user_id)?;
    if player.gold < FARM_UPGRADE_PRICE {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("insufficient gold: have {}, need {FARM_UPGRADE_PRICE}", player.gold),
        });
    }
    player.gold -= FARM_UPGRADE_PRICE;
    let farm = dispatcher
        .world
        .spirit_farms
        .get_mut(user_id)
        .ok_or_else(|| DispatchError::PreconditionNotMet {
            reason: "you do not have a spirit farm yet".to_string(),
        })?;
    farm.upgrade(FARM_PLOT_UPGRADE_PLOTS);
    Ok(format!("spirit farm upgraded to {} plots", farm.plots.len()))
}

// ---- Dual cultivation ---------------------------------------------------

pub fn dual(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let target_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "dual requires a target user id".to_string(),
    })?;
    let (mut initiator, target) = dispatcher.take_pair(user_id, target_id)?;
    let result = features::offer_dual(&mut initiator, &target, now);
    dispatcher.return_pair(initiator, target);
    result?;
    Ok(format!("dual cultivation offered to {target_id}"))
}

pub fn accept_dual(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let initiator_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "accept_dual requires the initiator's user id".to_string(),
    })?;
    let (mut initiator, mut target) = dispatcher.take_pair(initiator_id, user_id)?;
    let result = features::accept_dual(&mut initiator, &mut target, now);
    dispatcher.return_pair(initiator, target);
    result?;
    Ok(format!("dual cultivation with {initiator_id} confirmed"))
}

pub fn reject_dual(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let initiator_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "reject_dual requires the initiator's user id".to_string(),
    })?;
    let (mut initiator, target) = dispatcher.take_pair(initiator_id, user_id)?;
    let result = features::reject_dual(&mut initiator, &target);
    dispatcher.return_pair(initiator, target);
    result?;
    Ok(format!("dual cultivation offer from {initiator_id} rejected"))
}

// ---- Spirit eye ----------------------------------------------------------

pub fn spirit_eye_info(dispatcher: &Dispatcher, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let eye_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "spirit_eye_info requires a spirit eye id".to_string(),
    })?;
    match dispatcher.world.spirit_eyes.get(*eye_id) {
        Some(SpiritEye::Unclaimed) | None => Ok(format!("spirit eye {eye_id} is unclaimed")),
        Some(SpiritEye::Claimed { owner, last_collect, .. }) => {
            let accrued = (((now - *last_collect).max(0) as f64) / 3600.0 * 30.0).floor() as u64;
            Ok(format!("spirit eye {eye_id} claimed by {owner}, {accrued} gold unclaimed"))
        }
    }
}

pub fn claim_spirit_eye(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let eye_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "claim_spirit_eye requires a spirit eye id".to_string(),
    })?;
    dispatcher.player(user_id)?;
    let eye = dispatcher.world.spirit_eyes.entry(eye_id.to_string()).or_default();
    features::claim_spirit_eye(eye, user_id, now)?;
    Ok(format!("spirit eye {eye_id} claimed"))
}

pub fn collect_spirit_eye(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let eye_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "collect_spirit_eye requires a spirit eye id".to_string(),
    })?;
    let eye = dispatcher
        .world
        .spirit_eyes
        .get_mut(*eye_id)
        .ok_or_else(|| DispatchError::NotFound {
            kind: "spirit_eye".to_string(),
            name: eye_id.to_string(),
        })?;
    let amount = features::collect_spirit_eye(eye, user_id, now)?;
    let player = dispatcher.player_mut(user_id)?;
    player.gold += amount;
    Ok(format!("collected {amount} gold from spirit eye {eye_id}"))
}

pub fn release_spirit_eye(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let eye_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "release_spirit_eye requires a spirit eye id".to_string(),
    })?;
    let eye = dispatcher
        .world
        .spirit_eyes
        .get_mut(*eye_id)
        .ok_or_else(|| DispatchError::NotFound {
            kind: "spirit_eye".to_string(),
            name: eye_id.to_string(),
        })?;
    features::release_spirit_eye(eye, user_id, now)?;
    Ok(format!("spirit eye {eye_id} released"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dispatcher_with_player(user_id: &str) -> Dispatcher {
        let mut d = Dispatcher::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        super::super::identity::enter_cultivation(&mut d, user_id, "Alice", &[], 0, &mut rng).unwrap();
        d.player_mut(user_id).unwrap().gold = 10_000;
        d
    }

    #[test]
    fn blessed_land_purchase_upgrade_collect_round_trip() {
        let mut d = dispatcher_with_player("u1");
        purchase_blessed_land(&mut d, "u1", 0).unwrap();
        assert!(purchase_blessed_land(&mut d, "u1", 0).is_err());
        let msg = collect_blessed_land(&mut d, "u1", 3600).unwrap();
        assert!(msg.contains("gold"));
        upgrade_blessed_land(&mut d, "u1", 3600).unwrap();
        assert_eq!(d.world.blessed_lands.get("u1").unwrap().level, 2);
    }

    #[test]
    fn spirit_farm_plant_and_harvest() {
        let mut d = dispatcher_with_player("u1");
        create_farm(&mut d, "u1").unwrap();
        plant(&mut d, "u1", &["ginseng"], 0).unwrap();
        assert!(harvest(&mut d, "u1", 100).unwrap().contains("nothing"));
        let msg = harvest(&mut d, "u1", 999_999).unwrap();
        assert!(msg.contains("ginseng"));
        assert!(d.player("u1").unwrap().storage_ring.has("ginseng", 1));
    }

    #[test]
    fn dual_cultivation_offer_accept_flow() {
        let mut d = dispatcher_with_player("alice");
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        super::super::identity::enter_cultivation(&mut d, "bob", "Bob", &[], 0, &mut rng).unwrap();
        dual(&mut d, "alice", &["bob"], 0).unwrap();
        accept_dual(&mut d, "bob", &["alice"], 10).unwrap();
        assert!(matches!(
            d.player("alice").unwrap().activity_state,
            crate::scheduler::ActivityState::Busy {
                kind: crate::types::ActivityKind::DualConfirmed,
                ..
            }
        ));
    }

    #[test]
    fn spirit_eye_claim_collect_release() {
        let mut d = dispatcher_with_player("u1");
        claim_spirit_eye(&mut d, "u1", &["eye1"], 0).unwrap();
        assert!(claim_spirit_eye(&mut d, "u1", &["eye1"], 10).is_err());
        let msg = collect_spirit_eye(&mut d, "u1", &["eye1"], 3600).unwrap();
        assert!(msg.contains("gold"));
        assert!(release_spirit_eye(&mut d, "u1", &["eye1"], 100).is_err());
        release_spirit_eye(&mut d, "u1", &["eye1"], 3700).unwrap();
    }
}
