//! External ruleset: constants for team size, timeout duration, moves per
//! mon. Plain serde struct with a `Default`, threaded through construction
//! rather than read from the environment at call sites.

use crate::primitives::MOVES_PER_MON;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    pub team_size: u8,
    pub moves_per_mon: u8,
    /// Base timeout duration per commit/reveal window, in seconds.
    pub timeout_duration_secs: u64,
    /// Multiplier used to extend the timeout for slow turns.
    pub max_prev_turn_multiplier: u32,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            team_size: 6,
            moves_per_mon: MOVES_PER_MON as u8,
            timeout_duration_secs: 60,
            max_prev_turn_multiplier: 4,
        }
    }
}
