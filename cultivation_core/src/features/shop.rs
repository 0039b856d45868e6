//! Pavilion shop: a small stock ledger sitting in
//! front of the item/pill catalogs, decremented atomically per purchase the
//! same way `StorageRing` counts distinct stacks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::Catalogs;
use crate::error::DispatchError;
use crate::player::Player;

/// What the pavilion is currently willing to sell, and how many of each.
/// `None` means unlimited stock (most catalog items); a concrete count is
/// decremented on every successful `buy`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopStock {
    limited: HashMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopItemInfo {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub remaining: Option<u32>,
}

impl ShopStock {
    pub fn new() -> Self {
        ShopStock::default()
    }

    /// Restrict `item_id` to `count` remaining purchases. Call again to
    /// restock.
    pub fn set_limit(&mut self, item_id: &str, count: u32) {
        self.limited.insert(item_id.to_string(), count);
    }

    fn decrement_stock(&mut self, item_id: &str) -> Result<(), DispatchError> {
        match self.limited.get_mut(item_id) {
            Some(0) => Err(DispatchError::PreconditionNotMet {
                reason: format!("{} is out of stock", item_id),
            }),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn remaining(&self, item_id: &str) -> Option<u32> {
        self.limited.get(item_id).copied()
    }
}

/// Look up a catalog item or pill by id, reporting its price and any
/// pavilion stock limit.
pub fn item_info<'a>(catalogs: &'a Catalogs, stock: &ShopStock, id: &'a str) -> Result<ShopItemInfo, DispatchError> {
    if let Some(item) = catalogs.item(id) {
        return Ok(ShopItemInfo {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            remaining: stock.remaining(id),
        });
    }
    if let Some(pill) = catalogs.pill(id) {
        return Ok(ShopItemInfo {
            id: pill.id.clone(),
            name: pill.name.clone(),
            price: pill.price,
            remaining: stock.remaining(id),
        });
    }
    Err(DispatchError::NotFound {
        kind: "shop_item".to_string(),
        name: id.to_string(),
    })
}

/// Buy `quantity` of `item_id`, debiting gold and crediting the player's
/// storage ring (items) or pill inventory (pills). Atomic: on any failure,
/// neither gold, stock, nor inventory is mutated.
pub fn buy(player: &mut Player, catalogs: &Catalogs, stock: &mut ShopStock, item_id: &str, quantity: u32) -> Result<u64, DispatchError> {
    if quantity == 0 {
        return Err(DispatchError::PreconditionNotMet {
            reason: "quantity must be at least 1".to_string(),
        });
    }

    let (price, is_pill) = if let Some(item) = catalogs.item(item_id) {
        (item.price, false)
    } else if let Some(pill) = catalogs.pill(item_id) {
        (pill.price, true)
    } else {
        return Err(DispatchError::NotFound {
            kind: "shop_item".to_string(),
            name: item_id.to_string(),
        });
    };

    let total_price = price * quantity as u64;
    if player.gold < total_price {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("need {} gold, have {}", total_price, player.gold),
        });
    }

    for _ in 0..quantity {
        stock.decrement_stock(item_id)?;
    }

    player.gold -= total_price;
    if is_pill {
        *player.pill_inventory.entry(item_id.to_string()).or_insert(0) += quantity;
    } else {
        player.storage_ring.store(item_id, quantity)?;
    }
    Ok(total_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_catalogs;
    use crate::player::create_player;
    use crate::types::CultivationPath;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_player(gold: u64) -> Player {
        let catalogs = default_catalogs();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut player = create_player("u1", None, CultivationPath::Spirit, catalogs.realm(0).unwrap(), 0, &mut rng);
        player.gold = gold;
        player
    }

    fn any_item_id(catalogs: &Catalogs) -> String {
        catalogs.item("iron_sword").map(|i| i.id.clone()).unwrap_or_default()
    }

    #[test]
    fn buy_debits_gold_and_credits_ring() {
        let catalogs = default_catalogs();
        let id = any_item_id(&catalogs);
        let price = catalogs.item(&id).unwrap().price;
        let mut player = sample_player(price * 2);
        let mut stock = ShopStock::new();
        let spent = buy(&mut player, &catalogs, &mut stock, &id, 1).unwrap();
        assert_eq!(spent, price);
        assert_eq!(player.gold, price);
        assert!(player.storage_ring.has(&id, 1));
    }

    #[test]
    fn buy_fails_on_insufficient_gold() {
        let catalogs = default_catalogs();
        let id = any_item_id(&catalogs);
        let mut player = sample_player(0);
        let mut stock = ShopStock::new();
        assert!(buy(&mut player, &catalogs, &mut stock, &id, 1).is_err());
        assert_eq!(player.gold, 0);
    }

    #[test]
    fn limited_stock_exhausts_after_count() {
        let catalogs = default_catalogs();
        let id = any_item_id(&catalogs);
        let mut player = sample_player(1_000_000);
        let mut stock = ShopStock::new();
        stock.set_limit(&id, 1);
        buy(&mut player, &catalogs, &mut stock, &id, 1).unwrap();
        assert!(matches!(
            buy(&mut player, &catalogs, &mut stock, &id, 1),
            Err(DispatchError::PreconditionNotMet { .. })
        ));
    }
}
