//! `StatAccumulator` — the running record threaded through the stats
//! composition stages.

use std::collections::HashMap;

/// Running totals for the six principal stats plus the transient accuracy
/// stats, and a percent accumulator keyed by canonical name (`max_hp_percent`,
/// `max_mp_percent`, `atk_percent`, `def_percent`, `speed_percent`). Flat
/// contributions add directly to the named field; percent contributions are
/// summed here and applied once, in stage 5.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    pub max_hp: f64,
    pub max_mp: f64,
    pub physical_attack: f64,
    pub magic_attack: f64,
    pub physical_defense: f64,
    pub magic_defense: f64,
    pub speed: f64,
    pub critical_rate: f64,
    pub critical_damage: f64,
    pub hit_rate: f64,
    pub dodge_rate: f64,
    percent: HashMap<String, f64>,
}

impl StatAccumulator {
    pub fn add_percent(&mut self, key: &str, value: f64) {
        *self.percent.entry(key.to_string()).or_insert(0.0) += value;
    }

    pub fn percent(&self, key: &str) -> f64 {
        self.percent.get(key).copied().unwrap_or(0.0)
    }

    /// Stage 5: multiply each of the six principal stats by
    /// `(1 + accumulator[stat])`. `atk_percent` hits both attacks;
    /// `def_percent` hits both defenses, matching the source's shared
    /// percentage keys.
    pub fn apply_percentages(&mut self) {
        self.max_hp *= 1.0 + self.percent("max_hp_percent");
        self.max_mp *= 1.0 + self.percent("max_mp_percent");
        self.physical_attack *= 1.0 + self.percent("atk_percent");
        self.magic_attack *= 1.0 + self.percent("atk_percent");
        self.physical_defense *= 1.0 + self.percent("def_percent");
        self.magic_defense *= 1.0 + self.percent("def_percent");
        self.speed *= 1.0 + self.percent("speed_percent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_application_hits_both_attacks_and_defenses() {
        let mut acc = StatAccumulator {
            physical_attack: 100.0,
            magic_attack: 100.0,
            physical_defense: 50.0,
            magic_defense: 50.0,
            ..Default::default()
        };
        acc.add_percent("atk_percent", 0.2);
        acc.add_percent("def_percent", 0.1);
        acc.apply_percentages();
        assert!((acc.physical_attack - 120.0).abs() < f64::EPSILON);
        assert!((acc.magic_attack - 120.0).abs() < f64::EPSILON);
        assert!((acc.physical_defense - 55.0).abs() < f64::EPSILON);
        assert!((acc.magic_defense - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_sums_across_multiple_contributors() {
        let mut acc = StatAccumulator::default();
        acc.add_percent("atk_percent", 0.1);
        acc.add_percent("atk_percent", 0.08);
        assert!((acc.percent("atk_percent") - 0.18).abs() < 1e-9);
    }
}
