//! Inventory & Storage Ring.

mod gifts;
mod storage_ring;

pub use gifts::{PendingGift, PendingGifts};
pub use storage_ring::StorageRing;
