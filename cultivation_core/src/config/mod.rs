//! Configuration loading from TOML, plus the compiled-in default catalogs
//! and tunable constants.

mod catalogs;
mod constants;
mod defaults;

pub use catalogs::{
    AttributeGains, Catalogs, ItemDef, ItemKind, PillDef, PillEffect, RealmEntry, SkillDef,
    StorageRingDef, TechniqueDef, TimedActivityTemplate,
};
pub use constants::{ActivityConstants, BreakthroughConstants, CombatConstants, GameConstants, StatConstants};
pub use defaults::default_catalogs;

use std::fs;
use std::path::Path;

pub use crate::error::ConfigError;

/// Load a TOML file and deserialize it.
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: T = toml::from_str(&content)?;
    Ok(value)
}

/// Load a TOML string and deserialize it.
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let value: T = toml::from_str(content)?;
    Ok(value)
}
