//! Activity Scheduler: mutual exclusion among time-deadlined
//! activities, lazy settlement, and the combat cooldown side table.

mod activity;
mod cooldowns;

pub use activity::{abort, check, finish, start, ActivityState, FinishedActivity};
pub use cooldowns::{CombatCooldowns, DUEL_COOLDOWN_SECS, SPAR_COOLDOWN_SECS};
