//! Combat engine: a bounded, round-based simulator operating on
//! a flattened `CombatStats` snapshot rather than live player records.

mod action;
mod effects;
mod engine;
mod result;
mod stats;

pub use action::{finalize_damage, hit_check, mitigation_ratio};
pub use effects::{EffectDescriptor, EffectInstance, EffectKind};
pub use engine::resolve_battle;
pub use result::BattleOutcome;
pub use stats::{CombatStats, ResolvedSkill};
