//! cultivation_core - Simulation core for a text-based cultivation RPG
//!
//! This library provides:
//! - `Player`: the authoritative persistent entity for a user
//! - Stats composition: deriving a `CombatStats` snapshot from a `Player`
//! - Combat engine: deterministic-given-seed turn-based battle resolution
//! - Breakthrough: the probabilistic realm-advancement state machine
//! - Activity scheduler: mutually exclusive, time-deadlined activity lifecycle
//! - Inventory: the capacity-limited storage ring and gift protocol
//! - Economy: lazy reward settlement for timed activities
//! - World: the shared world boss resource
//! - Dispatcher: routes textual commands to the subsystems above
//!
//! No I/O, no persistence, and no network live in this crate; the dispatcher
//! produces plain-text responses and mutates in-memory state, leaving actual
//! storage and chat-adapter wiring to the embedding application.

pub mod combat;
pub mod config;
pub mod dispatcher;
pub mod economy;
pub mod error;
pub mod features;
pub mod inventory;
pub mod player;
pub mod scheduler;
pub mod stats_pipeline;
pub mod types;
pub mod world;

mod breakthrough;
pub use breakthrough::{attempt_breakthrough, BreakthroughOutcome};

pub mod prelude {
    //! Convenient imports for consumers of the crate.

    pub use crate::combat::{resolve_battle, BattleOutcome, CombatStats};
    pub use crate::config::Catalogs;
    pub use crate::dispatcher::Dispatcher;
    pub use crate::error::DispatchError;
    pub use crate::player::Player;
    pub use crate::stats_pipeline::compose_stats;
    pub use crate::types::{ActivityKind, BattleKind, CultivationPath, EquipmentSlot};
    pub use crate::world::WorldBoss;
    pub use crate::{attempt_breakthrough, BreakthroughOutcome};
}
