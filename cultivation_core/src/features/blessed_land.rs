//! Blessed land: a per-user passive-income row
//! with a purchase tier, an upgrade level, and a tick-since-last-collect
//! accrual — the same idiom the activity scheduler uses for lazy
//! settlement, applied to a standing resource instead of a one-shot timer.

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

const BASE_TIER_PRICE: u64 = 500;
const BASE_YIELD_PER_HOUR: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlessedLand {
    pub tier: u32,
    pub level: u32,
    pub last_collect: i64,
}

impl BlessedLand {
    pub fn purchase(now: i64) -> Self {
        BlessedLand {
            tier: 1,
            level: 1,
            last_collect: now,
        }
    }

    pub fn purchase_price(tier: u32) -> u64 {
        BASE_TIER_PRICE * tier as u64
    }

    pub fn upgrade_price(&self) -> u64 {
        BASE_TIER_PRICE * (self.level as u64 + 1) / 2
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
    }

    pub fn advance_tier(&mut self) {
        self.tier += 1;
    }

    /// Yield accrued since `last_collect`, per hour, scaled by tier and
    /// level. Does not mutate; caller applies the gold and resets the
    /// timestamp via `collect`.
    pub fn accrued_yield(&self, now: i64) -> u64 {
        let hours = ((now - self.last_collect).max(0) as f64) / 3600.0;
        (hours * BASE_YIELD_PER_HOUR as f64 * self.tier as f64 * (1.0 + 0.1 * self.level as f64)).floor() as u64
    }

    pub fn collect(&mut self, now: i64) -> u64 {
        let amount = self.accrued_yield(now);
        self.last_collect = now;
        amount
    }
}

pub fn advance_blessed_land(land: &mut BlessedLand, kind: &str) -> Result<(), DispatchError> {
    match kind {
        "tier" => {
            land.advance_tier();
            Ok(())
        }
        other => Err(DispatchError::NotFound {
            kind: "blessed_land_advance".to_string(),
            name: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yield_accrues_with_elapsed_hours() {
        let land = BlessedLand::purchase(0);
        assert_eq!(land.accrued_yield(3600), BASE_YIELD_PER_HOUR + BASE_YIELD_PER_HOUR / 10);
    }

    #[test]
    fn collect_resets_the_clock() {
        let mut land = BlessedLand::purchase(0);
        let collected = land.collect(3600);
        assert!(collected > 0);
        assert_eq!(land.accrued_yield(3600), 0);
    }
}
