//! Error kinds shared by every subsystem, per the propagation policy: every
//! command is a single transaction, and on any error the transaction aborts
//! with one of these descriptive variants.

use thiserror::Error;

/// Top-level error returned by the command dispatcher and the subsystem
/// operations it calls into.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("{user_id} has no cultivator record yet; start your journey first")]
    NotRegistered { user_id: String },

    #[error("you are busy {kind:?}")]
    Busy { kind: crate::types::ActivityKind },

    #[error("this requires {expected:?}, but you are {actual:?}")]
    WrongActivity {
        expected: crate::types::ActivityKind,
        actual: crate::types::ActivityKind,
    },

    #[error("not ready yet, {remaining}s remaining")]
    NotReady { remaining: i64 },

    #[error("precondition not met: {reason}")]
    PreconditionNotMet { reason: String },

    #[error("storage ring full: {name} ({current}/{cap})")]
    CapacityExceeded {
        name: String,
        current: u32,
        cap: u32,
    },

    #[error("no such {kind}: {name}")]
    NotFound { kind: String, name: String },

    #[error("conflict: {reason}")]
    Conflict { reason: String },

    #[error("{kind} is on cooldown, {remaining}s remaining")]
    Cooldown { kind: String, remaining: i64 },

    #[error("{user_id} is busy {kind:?} and cannot be interacted with right now")]
    TargetBusy {
        user_id: String,
        kind: crate::types::ActivityKind,
    },

    #[error("{user_id} died during the breakthrough attempt")]
    DeathOccurred { user_id: String },
}

/// Errors raised while loading static configuration (realm tables, skill
/// catalogs, and so on) from TOML.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("configuration validation error: {0}")]
    Validation(String),
}
