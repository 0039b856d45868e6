//! Spirit farm: a planted-herb timer per plot,
//! resolved lazily on `harvest` rather than a separate timer thread —
//! mirroring the activity scheduler's lazy-settlement idiom.

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

const BASE_PLOTS: usize = 3;
const HERB_GROWTH_SECS: i64 = 1800;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantedHerb {
    pub herb: String,
    pub planted_at: i64,
    pub ready_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpiritFarm {
    pub plots: Vec<Option<PlantedHerb>>,
}

impl SpiritFarm {
    pub fn create() -> Self {
        SpiritFarm {
            plots: vec![None; BASE_PLOTS],
        }
    }

    pub fn upgrade(&mut self, additional_plots: usize) {
        self.plots.resize(self.plots.len() + additional_plots, None);
    }

    pub fn plant(&mut self, herb: &str, now: i64) -> Result<usize, DispatchError> {
        let slot = self
            .plots
            .iter()
            .position(|p| p.is_none())
            .ok_or(DispatchError::PreconditionNotMet {
                reason: "no free plots".to_string(),
            })?;
        self.plots[slot] = Some(PlantedHerb {
            herb: herb.to_string(),
            planted_at: now,
            ready_at: now + HERB_GROWTH_SECS,
        });
        Ok(slot)
    }

    /// Harvest every plot that has matured, returning the herbs collected
    /// and clearing those plots.
    pub fn harvest(&mut self, now: i64) -> Vec<String> {
        let mut harvested = Vec::new();
        for plot in &mut self.plots {
            if let Some(herb) = plot {
                if now >= herb.ready_at {
                    harvested.push(herb.herb.clone());
                    *plot = None;
                }
            }
        }
        harvested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harvest_only_collects_mature_plots() {
        let mut farm = SpiritFarm::create();
        farm.plant("ginseng", 0).unwrap();
        assert!(farm.harvest(100).is_empty());
        assert_eq!(farm.harvest(HERB_GROWTH_SECS), vec!["ginseng".to_string()]);
    }

    #[test]
    fn plant_fails_when_all_plots_occupied() {
        let mut farm = SpiritFarm::create();
        for _ in 0..BASE_PLOTS {
            farm.plant("ginseng", 0).unwrap();
        }
        assert!(farm.plant("ginseng", 0).is_err());
    }

    #[test]
    fn upgrade_adds_plots() {
        let mut farm = SpiritFarm::create();
        farm.upgrade(2);
        assert_eq!(farm.plots.len(), BASE_PLOTS + 2);
    }
}
