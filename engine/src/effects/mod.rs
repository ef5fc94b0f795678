//! Effect pipeline: a tombstoning, address-bitmap-dispatched table of live
//! effects, plus the capability trait a concrete effect body implements.
//! Dispatch order is fixed and strictly categorical: global effects owned
//! by player 0 run to completion, then player 1's, then local effects on
//! player 0's active mon, then player 1's — never a single interleaved pass
//! across categories.

mod types;

pub use types::{EffectId, EffectInstance, EffectScope, HookOutcome, Step, Steps};

use crate::battle::Battle;
use crate::primitives::{MonIndex, PlayerIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A concrete effect body (glossary: "Effect"). One registered
/// implementation may back many live `EffectInstance` rows, each carrying
/// its own scratch `data`.
pub trait Effect: Send + Sync {
    fn id(&self) -> EffectId;
    fn on_step(
        &self,
        step: Step,
        battle: &mut Battle,
        owner: PlayerIndex,
        mon: Option<MonIndex>,
        data: [u8; 32],
    ) -> HookOutcome;
}

/// The live effect table for one battle. Slots are never removed, only
/// tombstoned, so an index captured before a dispatch pass stays valid
/// through it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectTable {
    slots: Vec<EffectInstance>,
}

impl EffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new effect, returning its slot index.
    pub fn add(&mut self, instance: EffectInstance) -> usize {
        self.slots.push(instance);
        self.slots.len() - 1
    }

    /// Logical delete: the slot stays, `active` flips to `false`.
    pub fn remove(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.active = false;
        }
    }

    pub fn get(&self, index: usize) -> Option<&EffectInstance> {
        self.slots.get(index)
    }

    fn is_owned_by(instance: &EffectInstance, scope: EffectScope, owner: PlayerIndex) -> bool {
        instance.active && instance.scope == scope && instance.owner == owner
    }

    fn is_local_on(instance: &EffectInstance, owner: PlayerIndex, mon: MonIndex) -> bool {
        instance.active
            && instance.scope == EffectScope::Local
            && instance.owner == owner
            && instance.mon == Some(mon)
    }

    /// Tombstones every local effect on `mon`, owned by `owner`, flagged
    /// `remove_on_switch_out` — called when that mon leaves the field.
    pub fn tombstone_local_switch_out(&mut self, owner: PlayerIndex, mon: MonIndex) {
        for slot in &mut self.slots {
            if slot.active
                && slot.remove_on_switch_out
                && slot.scope == EffectScope::Local
                && slot.owner == owner
                && slot.mon == Some(mon)
            {
                slot.active = false;
            }
        }
    }

    /// Runs one step over every slot matching `pred`, in slot order. The
    /// length is re-read on every loop iteration so an effect appended by a
    /// hook mid-bucket (e.g. one that calls `add`) still runs within this
    /// same bucket, while tombstoned slots are simply skipped.
    fn dispatch_bucket(
        &mut self,
        step: Step,
        battle: &mut Battle,
        registry: &dyn Fn(EffectId) -> Option<std::sync::Arc<dyn Effect>>,
        pred: impl Fn(&EffectInstance) -> bool,
    ) {
        let mut cursor = 0usize;
        loop {
            let len = self.slots.len();
            if cursor >= len {
                break;
            }
            let idx = cursor;
            let instance = self.slots[idx].clone();
            cursor += 1;

            if !instance.active || !instance.id.participates_in(step) || !pred(&instance) {
                continue;
            }
            let Some(body) = registry(instance.id) else {
                continue;
            };
            let outcome = body.on_step(step, battle, instance.owner, instance.mon, instance.data);
            if let Some(slot) = self.slots.get_mut(idx) {
                slot.data = outcome.updated_data;
                if outcome.remove_after_run {
                    slot.active = false;
                }
            }
        }
    }

    /// Dispatches one pipeline step in the fixed order: global p0 runs to
    /// completion, then global p1, then local-to-p0's-active, then
    /// local-to-p1's-active. Registry lookups resolve each `EffectId` to
    /// its concrete body; ids with no body registered are silently skipped
    /// (an effect may be data-only).
    pub fn dispatch(
        &mut self,
        step: Step,
        battle: &mut Battle,
        registry: &dyn Fn(EffectId) -> Option<std::sync::Arc<dyn Effect>>,
        active_mon: [MonIndex; 2],
    ) {
        self.dispatch_bucket(step, battle, registry, |i| {
            Self::is_owned_by(i, EffectScope::Global, PlayerIndex::P0)
        });
        self.dispatch_bucket(step, battle, registry, |i| {
            Self::is_owned_by(i, EffectScope::Global, PlayerIndex::P1)
        });
        self.dispatch_bucket(step, battle, registry, |i| {
            Self::is_local_on(i, PlayerIndex::P0, active_mon[0])
        });
        self.dispatch_bucket(step, battle, registry, |i| {
            Self::is_local_on(i, PlayerIndex::P1, active_mon[1])
        });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }
}

/// In-memory registry mapping `EffectId` to its concrete body. A thin
/// alternative to `dispatch`'s closure form for callers that already hold
/// a fixed map.
#[derive(Default)]
pub struct EffectRegistry {
    bodies: HashMap<EffectId, std::sync::Arc<dyn Effect>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, effect: std::sync::Arc<dyn Effect>) {
        self.bodies.insert(effect.id(), effect);
    }

    pub fn lookup(&self, id: EffectId) -> Option<std::sync::Arc<dyn Effect>> {
        self.bodies.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::PlayerIndex;

    fn dummy_instance(owner: PlayerIndex, scope: EffectScope, steps: Steps) -> EffectInstance {
        EffectInstance::new(EffectId::new(1, steps), scope, owner, None)
    }

    #[test]
    fn remove_tombstones_without_shifting_indices() {
        let mut table = EffectTable::new();
        let a = table.add(dummy_instance(PlayerIndex::P0, EffectScope::Global, Steps::ON_APPLY));
        let b = table.add(dummy_instance(PlayerIndex::P1, EffectScope::Global, Steps::ON_APPLY));
        table.remove(a);
        assert!(!table.get(a).unwrap().active);
        assert!(table.get(b).unwrap().active);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn active_count_ignores_tombstoned_slots() {
        let mut table = EffectTable::new();
        let a = table.add(dummy_instance(PlayerIndex::P0, EffectScope::Global, Steps::ON_APPLY));
        table.add(dummy_instance(PlayerIndex::P1, EffectScope::Global, Steps::ON_APPLY));
        table.remove(a);
        assert_eq!(table.active_count(), 1);
        assert_eq!(table.len(), 2);
    }
}
