//! Storage ring & gifting commands.

use crate::error::DispatchError;

use super::Dispatcher;

pub fn storage_ring(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    let ring = &player.storage_ring;
    if ring.items.is_empty() {
        return Ok(format!("storage ring empty (0/{})", ring.capacity));
    }
    let mut entries: Vec<String> = ring.items.iter().map(|(name, count)| format!("{name} x{count}")).collect();
    entries.sort_unstable();
    Ok(format!("{} ({}/{})", entries.join(", "), ring.distinct_items(), ring.capacity))
}

fn parse_count(args: &[&str], index: usize) -> u32 {
    args.get(index).and_then(|s| s.parse::<u32>().ok()).unwrap_or(1)
}

pub fn store(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let name = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "store requires an item name".to_string(),
    })?;
    let count = parse_count(args, 1);
    let player = dispatcher.player_mut(user_id)?;
    player.storage_ring.store(name, count)?;
    Ok(format!("stored {count}x {name}"))
}

pub fn retrieve(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let name = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "retrieve requires an item name".to_string(),
    })?;
    let count = parse_count(args, 1);
    let player = dispatcher.player_mut(user_id)?;
    player.storage_ring.retrieve(name, count)?;
    Ok(format!("retrieved {count}x {name}"))
}

pub fn discard(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let name = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "discard requires an item name".to_string(),
    })?;
    let count = parse_count(args, 1);
    let player = dispatcher.player_mut(user_id)?;
    player.storage_ring.discard(name, count)?;
    Ok(format!("discarded {count}x {name}"))
}

pub fn gift(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str], now: i64) -> Result<String, DispatchError> {
    let receiver_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "gift requires a receiver, item name, and optional count".to_string(),
    })?;
    let item_name = args.get(1).ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "gift requires an item name".to_string(),
    })?;
    let count = parse_count(args, 2);

    dispatcher.player(receiver_id)?;
    let sender = dispatcher.player_mut(user_id)?;
    dispatcher
        .world
        .pending_gifts
        .gift(&mut sender.storage_ring, user_id, receiver_id, item_name, count, now)?;
    Ok(format!("gifted {count}x {item_name} to {receiver_id}, pending acceptance"))
}

pub fn accept_gift(dispatcher: &mut Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let pending = dispatcher.world.pending_gifts.pending_for(user_id).cloned().ok_or(DispatchError::Conflict {
        reason: "no pending gift to accept".to_string(),
    })?;
    let (mut receiver, mut sender) = dispatcher.take_pair(user_id, &pending.sender_id)?;
    let result = dispatcher.world.pending_gifts.accept(user_id, &mut receiver.storage_ring, &mut sender.storage_ring);
    dispatcher.return_pair(receiver, sender);
    let gift = result?;
    Ok(format!("accepted {}x {} from {}", gift.count, gift.item_name, gift.sender_id))
}

pub fn reject_gift(dispatcher: &mut Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let pending = dispatcher.world.pending_gifts.pending_for(user_id).cloned().ok_or(DispatchError::Conflict {
        reason: "no pending gift to reject".to_string(),
    })?;
    let sender = dispatcher.player_mut(&pending.sender_id)?;
    let gift = dispatcher.world.pending_gifts.reject(user_id, &mut sender.storage_ring)?;
    Ok(format!("rejected {}x {} from {}", gift.count, gift.item_name, gift.sender_id))
}

pub fn upgrade_storage_ring(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let ring_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "upgrade_storage_ring requires a storage ring catalog id".to_string(),
    })?;
    let def = dispatcher.catalogs.storage_ring(ring_id).ok_or_else(|| DispatchError::NotFound {
        kind: "storage_ring".to_string(),
        name: ring_id.to_string(),
    })?;
    let new_capacity = def.capacity;
    let price = def.price;
    let player = dispatcher.player_mut(user_id)?;
    if player.gold < price {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("need {price} gold, have {}", player.gold),
        });
    }
    player.storage_ring.upgrade(new_capacity)?;
    player.gold -= price;
    Ok(format!("storage ring upgraded to capacity {new_capacity}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dispatcher_with_two() -> Dispatcher {
        let mut d = Dispatcher::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        super::super::identity::enter_cultivation(&mut d, "alice", "Alice", &[], 0, &mut rng).unwrap();
        super::super::identity::enter_cultivation(&mut d, "bob", "Bob", &[], 0, &mut rng).unwrap();
        d
    }

    #[test]
    fn store_retrieve_round_trip() {
        let mut d = dispatcher_with_two();
        store(&mut d, "alice", &["herb", "3"]).unwrap();
        retrieve(&mut d, "alice", &["herb", "3"]).unwrap();
        assert_eq!(d.player("alice").unwrap().storage_ring.count("herb"), 0);
    }

    #[test]
    fn gift_accept_transfers_item() {
        let mut d = dispatcher_with_two();
        store(&mut d, "alice", &["herb", "2"]).unwrap();
        gift(&mut d, "alice", &["bob", "herb", "2"], 0).unwrap();
        assert!(!d.player("alice").unwrap().storage_ring.has("herb", 2));
        accept_gift(&mut d, "bob").unwrap();
        assert!(d.player("bob").unwrap().storage_ring.has("herb", 2));
    }

    #[test]
    fn gift_reject_restores_sender() {
        let mut d = dispatcher_with_two();
        store(&mut d, "alice", &["herb", "1"]).unwrap();
        gift(&mut d, "alice", &["bob", "herb", "1"], 0).unwrap();
        reject_gift(&mut d, "bob").unwrap();
        assert!(d.player("alice").unwrap().storage_ring.has("herb", 1));
    }
}
