//! Spirit eye: a shared resource node claimed,
//! collected from, and released by players — a small state machine of its
//! own, independent of the activity scheduler.

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

const CLAIM_COOLDOWN_SECS: i64 = 3600;
const YIELD_PER_HOUR: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SpiritEye {
    Unclaimed,
    Claimed { owner: String, claimed_at: i64, last_collect: i64 },
}

impl Default for SpiritEye {
    fn default() -> Self {
        SpiritEye::Unclaimed
    }
}

pub fn claim(eye: &mut SpiritEye, owner: &str, now: i64) -> Result<(), DispatchError> {
    match eye {
        SpiritEye::Unclaimed => {
            *eye = SpiritEye::Claimed {
                owner: owner.to_string(),
                claimed_at: now,
                last_collect: now,
            };
            Ok(())
        }
        SpiritEye::Claimed { .. } => Err(DispatchError::Conflict {
            reason: "spirit eye already claimed".to_string(),
        }),
    }
}

pub fn collect(eye: &mut SpiritEye, owner: &str, now: i64) -> Result<u64, DispatchError> {
    match eye {
        SpiritEye::Claimed {
            owner: current_owner,
            last_collect,
            ..
        } if current_owner == owner => {
            let hours = ((now - *last_collect).max(0) as f64) / 3600.0;
            let amount = (hours * YIELD_PER_HOUR as f64).floor() as u64;
            *last_collect = now;
            Ok(amount)
        }
        SpiritEye::Claimed { .. } => Err(DispatchError::Conflict {
            reason: "not the owner of this spirit eye".to_string(),
        }),
        SpiritEye::Unclaimed => Err(DispatchError::PreconditionNotMet {
            reason: "spirit eye is unclaimed".to_string(),
        }),
    }
}

pub fn release(eye: &mut SpiritEye, owner: &str, now: i64) -> Result<(), DispatchError> {
    match eye {
        SpiritEye::Claimed { owner: current_owner, claimed_at, .. } if current_owner == owner => {
            if now - *claimed_at < CLAIM_COOLDOWN_SECS {
                return Err(DispatchError::NotReady {
                    remaining: CLAIM_COOLDOWN_SECS - (now - *claimed_at),
                });
            }
            *eye = SpiritEye::Unclaimed;
            Ok(())
        }
        SpiritEye::Claimed { .. } => Err(DispatchError::Conflict {
            reason: "not the owner of this spirit eye".to_string(),
        }),
        SpiritEye::Unclaimed => Err(DispatchError::PreconditionNotMet {
            reason: "spirit eye is already unclaimed".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_then_collect_accrues_yield() {
        let mut eye = SpiritEye::Unclaimed;
        claim(&mut eye, "alice", 0).unwrap();
        let amount = collect(&mut eye, "alice", 3600).unwrap();
        assert_eq!(amount, YIELD_PER_HOUR);
    }

    #[test]
    fn only_owner_may_collect_or_release() {
        let mut eye = SpiritEye::Unclaimed;
        claim(&mut eye, "alice", 0).unwrap();
        assert!(collect(&mut eye, "bob", 3600).is_err());
        assert!(release(&mut eye, "bob", 9999).is_err());
    }

    #[test]
    fn release_before_cooldown_fails() {
        let mut eye = SpiritEye::Unclaimed;
        claim(&mut eye, "alice", 0).unwrap();
        assert!(release(&mut eye, "alice", 100).is_err());
        assert!(release(&mut eye, "alice", CLAIM_COOLDOWN_SECS + 1).is_ok());
    }
}
