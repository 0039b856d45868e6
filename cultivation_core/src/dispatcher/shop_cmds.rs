//! Pavilion shop commands: three pavilions
//! fronting the item/pill catalogs, each backed by its own `ShopStock`
//! ledger in `World::shop_stock`.

use crate::config::ItemKind;
use crate::error::DispatchError;
use crate::features::{buy_shop_item, shop_item_info, ShopStock};

use super::Dispatcher;

const PILL_PAVILION: &str = "pill_pavilion";
const WEAPON_PAVILION: &str = "weapon_pavilion";
const TREASURE_PAVILION: &str = "treasure_pavilion";

fn resolve_pavilion(pavilion: &str) -> Result<&'static str, DispatchError> {
    match pavilion {
        "pill_pavilion" | "pill" => Ok(PILL_PAVILION),
        "weapon_pavilion" | "weapon" => Ok(WEAPON_PAVILION),
        "treasure_pavilion" | "treasure" => Ok(TREASURE_PAVILION),
        other => Err(DispatchError::NotFound {
            kind: "pavilion".to_string(),
            name: other.to_string(),
        }),
    }
}

pub fn pill_pavilion(dispatcher: &Dispatcher) -> Result<String, DispatchError> {
    let stock = dispatcher.world.shop_stock.get(PILL_PAVILION);
    let mut entries: Vec<String> = dispatcher
        .catalogs
        .pills
        .values()
        .map(|p| match stock.and_then(|s| s.remaining(&p.id)) {
            Some(remaining) => format!("{} ({} gold, {remaining} left)", p.name, p.price),
            None => format!("{} ({} gold)", p.name, p.price),
        })
        .collect();
    entries.sort_unstable();
    Ok(entries.join(", "))
}

pub fn weapon_pavilion(dispatcher: &Dispatcher) -> Result<String, DispatchError> {
    list_items(dispatcher, WEAPON_PAVILION, |kind| matches!(kind, ItemKind::Weapon))
}

pub fn treasure_pavilion(dispatcher: &Dispatcher) -> Result<String, DispatchError> {
    list_items(dispatcher, TREASURE_PAVILION, |kind| {
        matches!(kind, ItemKind::Armor | ItemKind::MainTechnique | ItemKind::Technique | ItemKind::Material | ItemKind::StorageRing)
    })
}

fn list_items(dispatcher: &Dispatcher, pavilion: &str, filter: impl Fn(ItemKind) -> bool) -> Result<String, DispatchError> {
    let stock = dispatcher.world.shop_stock.get(pavilion);
    let mut entries: Vec<String> = dispatcher
        .catalogs
        .items
        .values()
        .filter(|i| filter(i.kind))
        .map(|i| match stock.and_then(|s| s.remaining(&i.id)) {
            Some(remaining) => format!("{} ({} gold, {remaining} left)", i.name, i.price),
            None => format!("{} ({} gold)", i.name, i.price),
        })
        .collect();
    entries.sort_unstable();
    Ok(entries.join(", "))
}

/// `buy <pavilion> <item_id> [quantity]`.
pub fn buy(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let pavilion_arg = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "buy requires a pavilion and item id".to_string(),
    })?;
    let item_id = args.get(1).ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "buy requires an item id".to_string(),
    })?;
    let quantity = args.get(2).and_then(|s| s.parse::<u32>().ok()).unwrap_or(1);
    let pavilion = resolve_pavilion(pavilion_arg)?;

    let player = dispatcher.world.players.get_mut(user_id).ok_or_else(|| DispatchError::NotRegistered { user_id: user_id.to_string() })?;
    let stock = dispatcher.world.shop_stock.entry(pavilion.to_string()).or_default();
    let spent = buy_shop_item(player, &dispatcher.catalogs, stock, item_id, quantity)?;
    Ok(format!("bought {quantity}x {item_id} for {spent} gold"))
}

pub fn item_info(dispatcher: &Dispatcher, args: &[&str]) -> Result<String, DispatchError> {
    let pavilion_arg = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "item_info requires a pavilion and item id".to_string(),
    })?;
    let item_id = args.get(1).ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "item_info requires an item id".to_string(),
    })?;
    let pavilion = resolve_pavilion(pavilion_arg)?;
    let empty_stock = ShopStock::new();
    let stock = dispatcher.world.shop_stock.get(pavilion).unwrap_or(&empty_stock);
    let info = shop_item_info(&dispatcher.catalogs, stock, item_id)?;
    match info.remaining {
        Some(remaining) => Ok(format!("{}: {} gold, {remaining} left", info.name, info.price)),
        None => Ok(format!("{}: {} gold, unlimited stock", info.name, info.price)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dispatcher_with_player() -> Dispatcher {
        let mut d = Dispatcher::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        super::super::identity::enter_cultivation(&mut d, "u1", "Alice", &[], 0, &mut rng).unwrap();
        d.player_mut("u1").unwrap().gold = 1_000_000;
        d
    }

    #[test]
    fn buy_from_weapon_pavilion_credits_ring() {
        let mut d = dispatcher_with_player();
        let item_id = d.catalogs.items.values().find(|i| matches!(i.kind, ItemKind::Weapon)).unwrap().id.clone();
        buy(&mut d, "u1", &["weapon_pavilion", &item_id, "1"]).unwrap();
        assert!(d.player("u1").unwrap().storage_ring.has(&item_id, 1));
    }

    #[test]
    fn buy_from_pill_pavilion_credits_pill_inventory() {
        let mut d = dispatcher_with_player();
        let pill_id = d.catalogs.pills.values().next().unwrap().id.clone();
        buy(&mut d, "u1", &["pill_pavilion", &pill_id, "2"]).unwrap();
        assert_eq!(d.player("u1").unwrap().pill_inventory.get(&pill_id).copied().unwrap_or(0), 2);
    }

    #[test]
    fn unknown_pavilion_rejected() {
        let mut d = dispatcher_with_player();
        assert!(matches!(buy(&mut d, "u1", &["nonexistent", "x"]), Err(DispatchError::NotFound { .. })));
    }
}
