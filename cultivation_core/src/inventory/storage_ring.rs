//! `StorageRing` — a capacity-limited multiset inventory. The
//! ring name itself is resolved through the catalog at use time rather than
//! stored as a pointer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageRing {
    pub capacity: u32,
    pub items: HashMap<String, u32>,
}

impl StorageRing {
    pub fn new(capacity: u32) -> Self {
        StorageRing {
            capacity,
            items: HashMap::new(),
        }
    }

    pub fn distinct_items(&self) -> u32 {
        self.items.len() as u32
    }

    pub fn count(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    pub fn has(&self, name: &str, count: u32) -> bool {
        self.count(name) >= count
    }

    /// Fails `CapacityExceeded` only when `name` is a new distinct item and
    /// the ring is already at capacity; existing stacks are uncapped.
    pub fn store(&mut self, name: &str, count: u32) -> Result<(), DispatchError> {
        if !self.items.contains_key(name) && self.distinct_items() >= self.capacity {
            return Err(DispatchError::CapacityExceeded {
                name: name.to_string(),
                current: self.distinct_items(),
                cap: self.capacity,
            });
        }
        *self.items.entry(name.to_string()).or_insert(0) += count;
        Ok(())
    }

    pub fn retrieve(&mut self, name: &str, count: u32) -> Result<(), DispatchError> {
        let held = self.count(name);
        if held < count {
            return Err(DispatchError::PreconditionNotMet {
                reason: format!("insufficient {name}: have {held}, need {count}"),
            });
        }
        let remaining = held - count;
        if remaining == 0 {
            self.items.remove(name);
        } else {
            self.items.insert(name.to_string(), remaining);
        }
        Ok(())
    }

    /// Destructive retrieve with the same semantics as `retrieve` — kept as
    /// a distinct name because callers use it to express intent (discard
    /// vs. transfer).
    pub fn discard(&mut self, name: &str, count: u32) -> Result<(), DispatchError> {
        self.retrieve(name, count)
    }

    /// Accepted only if `new_capacity` strictly exceeds the current one.
    pub fn upgrade(&mut self, new_capacity: u32) -> Result<(), DispatchError> {
        if new_capacity <= self.capacity {
            return Err(DispatchError::PreconditionNotMet {
                reason: "new storage ring must have strictly greater capacity".to_string(),
            });
        }
        self.capacity = new_capacity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_retrieve_round_trips() {
        let mut ring = StorageRing::new(2);
        ring.store("herb", 5).unwrap();
        ring.retrieve("herb", 5).unwrap();
        assert_eq!(ring.count("herb"), 0);
        assert!(!ring.items.contains_key("herb"));
    }

    #[test]
    fn full_ring_rejects_new_item_but_accepts_existing() {
        let mut ring = StorageRing::new(1);
        ring.store("herb", 1).unwrap();
        assert!(ring.store("herb", 1).is_ok());
        assert!(matches!(
            ring.store("sword", 1),
            Err(DispatchError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn retrieve_more_than_held_fails() {
        let mut ring = StorageRing::new(5);
        ring.store("herb", 2).unwrap();
        assert!(ring.retrieve("herb", 3).is_err());
        assert_eq!(ring.count("herb"), 2);
    }

    #[test]
    fn upgrade_requires_strictly_larger_capacity() {
        let mut ring = StorageRing::new(10);
        assert!(ring.upgrade(10).is_err());
        assert!(ring.upgrade(30).is_ok());
        assert_eq!(ring.capacity, 30);
    }
}
