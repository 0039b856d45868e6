//! Supplemented features (SPEC_FULL §11): peripheral systems present in
//! `original_source/` but dropped by the distilled spec — each a
//! self-contained module with no sub-pipeline depth.

mod blessed_land;
mod bounty;
mod dual_cultivation;
mod shop;
mod spirit_eye;
mod spirit_farm;

pub use blessed_land::{advance_blessed_land, BlessedLand};
pub use bounty::{accept_bounty, turn_in_bounty};
pub use dual_cultivation::{accept as accept_dual, offer as offer_dual, reject as reject_dual};
pub use shop::{buy as buy_shop_item, item_info as shop_item_info, ShopItemInfo, ShopStock};
pub use spirit_eye::{claim as claim_spirit_eye, collect as collect_spirit_eye, release as release_spirit_eye, SpiritEye};
pub use spirit_farm::{PlantedHerb, SpiritFarm};
