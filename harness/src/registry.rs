//! In-memory move/ability/effect registries. The engine never stores a
//! trait object itself (it has to stay serializable); a host looks bodies
//! up through a registry like this one and hands the engine a plain
//! closure, the same indirection a species/move table loaded once at
//! startup would give for free.

use engine::battle::{AbilityId, MoveId};
use engine::capabilities::{Ability, Move};
use engine::effects::{Effect, EffectId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct Registry {
    moves: HashMap<MoveId, Arc<dyn Move>>,
    abilities: HashMap<AbilityId, Arc<dyn Ability>>,
    effects: HashMap<EffectId, Arc<dyn Effect>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_move(&mut self, id: MoveId, body: Arc<dyn Move>) {
        self.moves.insert(id, body);
    }

    pub fn register_ability(&mut self, id: AbilityId, body: Arc<dyn Ability>) {
        self.abilities.insert(id, body);
    }

    pub fn register_effect(&mut self, body: Arc<dyn Effect>) {
        self.effects.insert(body.id(), body);
    }

    pub fn move_lookup(&self) -> impl Fn(MoveId) -> Option<Arc<dyn Move>> + '_ {
        move |id| self.moves.get(&id).cloned()
    }

    pub fn ability_lookup(&self) -> impl Fn(AbilityId) -> Option<Arc<dyn Ability>> + '_ {
        move |id| self.abilities.get(&id).cloned()
    }

    pub fn effect_lookup(&self) -> impl Fn(EffectId) -> Option<Arc<dyn Effect>> + '_ {
        move |id| self.effects.get(&id).cloned()
    }
}
