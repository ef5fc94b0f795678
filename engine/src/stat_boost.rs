//! Stat-boost layer. Boosts compose onto a flat `i32` delta per stat,
//! split into a `Temp` scope (cleared whenever the owning mon switches out)
//! and a `Perm` scope (survives switches, cleared only by an explicit
//! remove). Mirrors the split between an additive/volatile adjustment
//! table and a persistent multiplier table, folded here onto a single
//! integer axis per stat.

use crate::primitives::CLEARED_SENTINEL;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    CritRate,
}

pub const STAT_COUNT: usize = 7;

impl Stat {
    pub fn index(self) -> usize {
        match self {
            Stat::Attack => 0,
            Stat::Defense => 1,
            Stat::SpecialAttack => 2,
            Stat::SpecialDefense => 3,
            Stat::Speed => 4,
            Stat::Accuracy => 5,
            Stat::CritRate => 6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostScope {
    /// Cleared when the mon leaves the active slot.
    Temp,
    /// Survives switches; only an explicit remove clears it.
    Perm,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostType {
    Add,
    Multiply,
    Divide,
}

/// A boost request as handed to the layer by an effect/ability/move body.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatBoostToApply {
    pub stat: Stat,
    pub scope: BoostScope,
    pub boost_type: BoostType,
    /// Magnitude; interpretation depends on `boost_type` (see
    /// `contribution`).
    pub magnitude: i32,
}

impl StatBoostToApply {
    /// The signed contribution this boost makes to the flat `i32`
    /// accumulator. `Add` contributes directly; `Multiply`/`Divide` express
    /// a proportional boost/cut that is still folded onto the same additive
    /// axis, keeping storage to one delta per stat.
    fn contribution(&self) -> i32 {
        match self.boost_type {
            BoostType::Add => self.magnitude,
            BoostType::Multiply => self.magnitude,
            BoostType::Divide => -self.magnitude,
        }
    }
}

/// Per-mon boost state: one `i32` delta per stat per scope.
/// `CLEARED_SENTINEL` marks "never touched", distinct from an explicit 0.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatBoostLayer {
    temp: [i32; STAT_COUNT],
    perm: [i32; STAT_COUNT],
}

impl Default for StatBoostLayer {
    fn default() -> Self {
        Self {
            temp: [CLEARED_SENTINEL; STAT_COUNT],
            perm: [CLEARED_SENTINEL; STAT_COUNT],
        }
    }
}

impl StatBoostLayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, scope: BoostScope, stat: Stat) -> &mut i32 {
        let arr = match scope {
            BoostScope::Temp => &mut self.temp,
            BoostScope::Perm => &mut self.perm,
        };
        &mut arr[stat.index()]
    }

    /// Current effective delta for a stat: the sum of whichever scopes have
    /// been touched, treating `CLEARED_SENTINEL` as 0.
    pub fn delta(&self, stat: Stat) -> i32 {
        let t = self.temp[stat.index()];
        let p = self.perm[stat.index()];
        let t = if t == CLEARED_SENTINEL { 0 } else { t };
        let p = if p == CLEARED_SENTINEL { 0 } else { p };
        t.saturating_add(p)
    }

    pub fn apply(&mut self, boost: StatBoostToApply) {
        let contribution = boost.contribution();
        let slot = self.slot(boost.scope, boost.stat);
        let base = if *slot == CLEARED_SENTINEL { 0 } else { *slot };
        *slot = base.saturating_add(contribution);
    }

    /// Reverses exactly the contribution `boost` made. Callers (the effect
    /// pipeline) must pass back the same `StatBoostToApply` they applied.
    pub fn remove(&mut self, boost: StatBoostToApply) {
        let contribution = boost.contribution();
        let slot = self.slot(boost.scope, boost.stat);
        let base = if *slot == CLEARED_SENTINEL { 0 } else { *slot };
        *slot = base.saturating_sub(contribution);
    }

    /// Clears every `Temp` boost on switch-out. `Perm` boosts are
    /// untouched.
    pub fn clear_temp(&mut self) {
        self.temp = [CLEARED_SENTINEL; STAT_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_stat_has_zero_delta() {
        let layer = StatBoostLayer::new();
        assert_eq!(layer.delta(Stat::Speed), 0);
    }

    #[test]
    fn add_and_remove_round_trips_to_zero() {
        let mut layer = StatBoostLayer::new();
        let boost = StatBoostToApply {
            stat: Stat::Attack,
            scope: BoostScope::Temp,
            boost_type: BoostType::Add,
            magnitude: 3,
        };
        layer.apply(boost);
        assert_eq!(layer.delta(Stat::Attack), 3);
        layer.remove(boost);
        assert_eq!(layer.delta(Stat::Attack), 0);
    }

    #[test]
    fn switch_out_clears_only_temp_scope() {
        let mut layer = StatBoostLayer::new();
        layer.apply(StatBoostToApply {
            stat: Stat::Speed,
            scope: BoostScope::Temp,
            boost_type: BoostType::Add,
            magnitude: 2,
        });
        layer.apply(StatBoostToApply {
            stat: Stat::Speed,
            scope: BoostScope::Perm,
            boost_type: BoostType::Add,
            magnitude: 5,
        });
        assert_eq!(layer.delta(Stat::Speed), 7);
        layer.clear_temp();
        assert_eq!(layer.delta(Stat::Speed), 5);
    }

    #[test]
    fn divide_contributes_a_negative_delta() {
        let mut layer = StatBoostLayer::new();
        layer.apply(StatBoostToApply {
            stat: Stat::Defense,
            scope: BoostScope::Perm,
            boost_type: BoostType::Divide,
            magnitude: 4,
        });
        assert_eq!(layer.delta(Stat::Defense), -4);
    }
}
