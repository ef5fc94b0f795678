//! Deterministic turn-based battle engine core. A host (see `harness`)
//! supplies concrete `Move`/`Ability`/`TypeCalculator`/`Rng`/`Hook`
//! implementations and drives a `Battle` through commit, reveal, and
//! execute via `commit_reveal` and `turn`.
//!
//! Flat module layout (`pub mod X; pub use X::*;`) built around opaque
//! capability traits rather than a fixed move/ability roster.

pub mod battle;
pub mod capabilities;
pub mod commit_reveal;
pub mod damage;
pub mod effects;
pub mod error;
pub mod events;
pub mod kv_store;
pub mod primitives;
pub mod ruleset;
pub mod signature;
pub mod stat_boost;
pub mod turn;
pub mod validator;

pub use battle::*;
pub use capabilities::*;
pub use commit_reveal::{CommitCoordinator, Decision};
pub use damage::{calculate_damage, chain_effectiveness, check_accuracy, check_critical, DamageInput, DamageOutput};
pub use effects::{Effect, EffectId, EffectInstance, EffectRegistry, EffectScope, EffectTable, HookOutcome, Step, Steps};
pub use error::{EngineError, EngineResult};
pub use events::EngineEvent;
pub use kv_store::{KvKey, KvStore};
pub use primitives::*;
pub use ruleset::Ruleset;
pub use turn::{execute_turn, ActionKind, PlayerAction, TurnOutcome};
