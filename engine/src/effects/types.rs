//! Effect identifiers and storage shapes: a small closed set of dispatch
//! points (apply/remove/before-move/after-move/round-start/round-end/
//! after-damage/switch-in/switch-out), with dispatch driven by a bitmap
//! packed into the identifier itself rather than a side table.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which pipeline steps an effect participates in. Packed into the top
    /// 9 bits of a 160-bit `EffectId` so dispatch never needs a metadata
    /// lookup to know whether an effect cares about a given step.
    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Steps: u16 {
        const ON_APPLY     = 1 << 0;
        const ON_REMOVE    = 1 << 1;
        const BEFORE_MOVE  = 1 << 2;
        const AFTER_MOVE   = 1 << 3;
        const ROUND_START  = 1 << 4;
        const ROUND_END    = 1 << 5;
        const AFTER_DAMAGE = 1 << 6;
        const ON_SWITCH_IN = 1 << 7;
        const ON_SWITCH_OUT = 1 << 8;
    }
}

/// A single pipeline step, for call sites that dispatch one step at a time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    OnApply,
    OnRemove,
    BeforeMove,
    AfterMove,
    RoundStart,
    RoundEnd,
    AfterDamage,
    OnSwitchIn,
    OnSwitchOut,
}

impl Step {
    pub fn bit(self) -> Steps {
        match self {
            Step::OnApply => Steps::ON_APPLY,
            Step::OnRemove => Steps::ON_REMOVE,
            Step::BeforeMove => Steps::BEFORE_MOVE,
            Step::AfterMove => Steps::AFTER_MOVE,
            Step::RoundStart => Steps::ROUND_START,
            Step::RoundEnd => Steps::ROUND_END,
            Step::AfterDamage => Steps::AFTER_DAMAGE,
            Step::OnSwitchIn => Steps::ON_SWITCH_IN,
            Step::OnSwitchOut => Steps::ON_SWITCH_OUT,
        }
    }
}

/// 160-bit effect identifier. The low 151 bits are an opaque discriminator
/// (the effect "address"); the top 9 bits are the `Steps` bitmap.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub [u8; 20]);

impl EffectId {
    /// Builds an id from a 151-bit discriminator and its steps bitmap.
    /// `discriminator` is truncated to fit; callers that need the full
    /// range should derive it (e.g. via a hash) rather than pick it by
    /// hand.
    pub fn new(discriminator: u128, steps: Steps) -> Self {
        let mut bytes = [0u8; 20];
        bytes[4..20].copy_from_slice(&discriminator.to_be_bytes());
        let steps_bits = steps.bits();
        // Top 9 bits live in the high byte and the top bit of the next byte.
        bytes[0] = (steps_bits >> 1) as u8;
        bytes[1] = (bytes[1] & 0x7F) | (((steps_bits & 1) as u8) << 7);
        EffectId(bytes)
    }

    pub fn steps(&self) -> Steps {
        let high = u16::from(self.0[0]) << 1;
        let low = u16::from(self.0[1] >> 7);
        Steps::from_bits_truncate(high | low)
    }

    pub fn participates_in(&self, step: Step) -> bool {
        self.steps().contains(step.bit())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectScope {
    /// Attached to the battle as a whole, scoped to one player (weather,
    /// hazards, a field-wide hex).
    Global,
    /// Attached to a specific mon (a burn, a stat boost volatile).
    Local,
}

/// A live effect row. Removal tombstones the slot (`active = false`)
/// rather than shifting the vector, so indices taken mid-iteration stay
/// valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EffectInstance {
    pub id: EffectId,
    pub scope: EffectScope,
    pub owner: crate::primitives::PlayerIndex,
    pub mon: Option<crate::primitives::MonIndex>,
    pub data: [u8; 32],
    pub active: bool,
    /// Tombstoned automatically when its owning mon switches out (a
    /// volatile like a temporary stat hex, as opposed to one that should
    /// survive the switch).
    pub remove_on_switch_out: bool,
}

impl EffectInstance {
    pub fn new(
        id: EffectId,
        scope: EffectScope,
        owner: crate::primitives::PlayerIndex,
        mon: Option<crate::primitives::MonIndex>,
    ) -> Self {
        Self {
            id,
            scope,
            owner,
            mon,
            data: [0u8; 32],
            active: true,
            remove_on_switch_out: false,
        }
    }

    pub fn with_remove_on_switch_out(mut self, flag: bool) -> Self {
        self.remove_on_switch_out = flag;
        self
    }
}

/// Result of invoking one effect hook: the effect's updated scratch data,
/// and whether the pipeline should tombstone it immediately afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HookOutcome {
    pub updated_data: [u8; 32],
    pub remove_after_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_bitmap_round_trips_through_the_identifier() {
        let steps = Steps::AFTER_DAMAGE | Steps::ON_REMOVE;
        let id = EffectId::new(0xDEAD_BEEF, steps);
        assert!(id.participates_in(Step::AfterDamage));
        assert!(id.participates_in(Step::OnRemove));
        assert!(!id.participates_in(Step::RoundStart));
    }

    #[test]
    fn all_nine_steps_survive_packing() {
        let steps = Steps::all();
        let id = EffectId::new(1, steps);
        assert_eq!(id.steps(), steps);
    }
}
