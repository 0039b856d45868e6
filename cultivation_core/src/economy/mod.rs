//! Reward Settlement / Economy.

mod settlement;

pub use settlement::{settle_adventure, settle_cultivation, settle_exploration, settle_timed_activity, SettlementResult};
