//! `Player`: the authoritative persistent entity for a user.

mod lifecycle;
mod model;

pub use lifecycle::{check_abandon_cooldown, create_player, draw_spiritual_root};
pub use model::{ActiveTemporaryEffect, EquipmentSlots, PermanentPillGains, Player};
