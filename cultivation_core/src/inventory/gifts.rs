//! The two-step gift protocol:
//! pending gifts live in process memory keyed by receiver id. The only
//! invariant is "a pending gift is never simultaneously in the sender's
//! ring" — a restart dropping in-flight gifts is a documented limitation,
//! not a bug.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::storage_ring::StorageRing;
use crate::error::DispatchError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingGift {
    pub sender_id: String,
    pub item_name: String,
    pub count: u32,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingGifts {
    by_receiver: HashMap<String, PendingGift>,
}

impl PendingGifts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_for(&self, receiver_id: &str) -> Option<&PendingGift> {
        self.by_receiver.get(receiver_id)
    }

    /// Step 1: retrieve from the sender's ring and record the pending gift.
    pub fn gift(
        &mut self,
        sender_ring: &mut StorageRing,
        sender_id: &str,
        receiver_id: &str,
        item_name: &str,
        count: u32,
        now: i64,
    ) -> Result<(), DispatchError> {
        if sender_id == receiver_id {
            return Err(DispatchError::Conflict {
                reason: "cannot gift yourself".to_string(),
            });
        }
        if self.by_receiver.contains_key(receiver_id) {
            return Err(DispatchError::Conflict {
                reason: format!("{receiver_id} already has a pending gift"),
            });
        }
        sender_ring.retrieve(item_name, count)?;
        self.by_receiver.insert(
            receiver_id.to_string(),
            PendingGift {
                sender_id: sender_id.to_string(),
                item_name: item_name.to_string(),
                count,
                created_at: now,
            },
        );
        Ok(())
    }

    /// Step 2a: accept. On capacity failure at the receiver, restore to the
    /// sender and still clear the pending entry.
    pub fn accept(
        &mut self,
        receiver_id: &str,
        receiver_ring: &mut StorageRing,
        sender_ring: &mut StorageRing,
    ) -> Result<PendingGift, DispatchError> {
        let pending = self.by_receiver.remove(receiver_id).ok_or(DispatchError::Conflict {
            reason: "no pending gift to accept".to_string(),
        })?;

        match receiver_ring.store(&pending.item_name, pending.count) {
            Ok(()) => Ok(pending),
            Err(err) => {
                let _ = sender_ring.store(&pending.item_name, pending.count);
                Err(err)
            }
        }
    }

    /// Step 2b: reject. Always restores to the sender and clears pending.
    pub fn reject(&mut self, receiver_id: &str, sender_ring: &mut StorageRing) -> Result<PendingGift, DispatchError> {
        let pending = self.by_receiver.remove(receiver_id).ok_or(DispatchError::Conflict {
            reason: "no pending gift to reject".to_string(),
        })?;
        sender_ring.store(&pending.item_name, pending.count)?;
        Ok(pending)
    }

    /// Housekeeping sweep: drop pending gifts
    /// older than `max_age_secs`, restoring the item to the sender's ring.
    pub fn purge_stale(&mut self, now: i64, max_age_secs: i64, sender_ring_of: impl Fn(&str) -> Option<StorageRing>) -> Vec<(String, PendingGift)> {
        let stale: Vec<String> = self
            .by_receiver
            .iter()
            .filter(|(_, g)| now - g.created_at > max_age_secs)
            .map(|(receiver, _)| receiver.clone())
            .collect();

        let mut dropped = Vec::new();
        for receiver in stale {
            if let Some(gift) = self.by_receiver.remove(&receiver) {
                if let Some(mut ring) = sender_ring_of(&gift.sender_id) {
                    let _ = ring.store(&gift.item_name, gift.count);
                }
                dropped.push((receiver, gift));
            }
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gift_reject_round_trip_restores_sender() {
        let mut sender_ring = StorageRing::new(5);
        let mut receiver_ring = StorageRing::new(5);
        sender_ring.store("unique_blade", 1).unwrap();

        let mut pending = PendingGifts::new();
        pending.gift(&mut sender_ring, "alice", "bob", "unique_blade", 1, 0).unwrap();
        assert!(!sender_ring.has("unique_blade", 1));
        assert!(pending.pending_for("bob").is_some());

        pending.reject("bob", &mut sender_ring).unwrap();
        assert!(sender_ring.has("unique_blade", 1));
        assert!(pending.pending_for("bob").is_none());
        let _ = receiver_ring;
    }

    #[test]
    fn gift_accept_full_ring_restores_sender_and_clears_pending() {
        let mut sender_ring = StorageRing::new(5);
        let mut receiver_ring = StorageRing::new(1);
        receiver_ring.store("junk", 1).unwrap();
        sender_ring.store("unique_blade", 1).unwrap();

        let mut pending = PendingGifts::new();
        pending.gift(&mut sender_ring, "alice", "bob", "unique_blade", 1, 0).unwrap();

        let result = pending.accept("bob", &mut receiver_ring, &mut sender_ring);
        assert!(result.is_err());
        assert!(pending.pending_for("bob").is_none());
        assert!(sender_ring.has("unique_blade", 1));
    }

    #[test]
    fn cannot_gift_self() {
        let mut sender_ring = StorageRing::new(5);
        sender_ring.store("herb", 1).unwrap();
        let mut pending = PendingGifts::new();
        assert!(pending.gift(&mut sender_ring, "alice", "alice", "herb", 1, 0).is_err());
    }
}
