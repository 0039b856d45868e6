//! World Boss shared resource.

mod boss;

pub use boss::{BossChallengeOutcome, BossStatus, WorldBoss, WorldBossArena};
