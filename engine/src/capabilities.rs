//! Capability interfaces: the small pluggable traits through which the core
//! calls out to concrete move/ability/type-chart/RNG/hook/matchmaker/
//! team-registry implementations. Concrete bodies (a burn status, a real
//! type chart, a VRF oracle, ...) are out of scope; only the contracts live
//! here. `harness` supplies the thin in-memory bodies used to drive the
//! engine in tests.

use crate::battle::{Battle, Mon};
use crate::effects::HookOutcome;
use crate::primitives::{Address, BattleKey, MonIndex, PlayerIndex};
use serde::{Deserialize, Serialize};

/// 240-bit opaque payload a move or switch decision may carry (a team index
/// for a switch, a target selector for a move, ...).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtraData(pub [u8; 30]);

impl ExtraData {
    pub fn from_u8(v: u8) -> Self {
        let mut bytes = [0u8; 30];
        bytes[29] = v;
        ExtraData(bytes)
    }

    pub fn as_u8(&self) -> u8 {
        self.0[29]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraDataType {
    None,
    SelfTeamIndex,
    OpponentNonKOTeamIndex,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveClass {
    Physical,
    Special,
    Status,
}

/// Opaque elemental/affinity type identifier. Concrete type charts are
/// supplied via `TypeCalculator`; the engine never interprets the value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonType(pub u16);

/// A move: metadata getters plus one invoke hook (glossary: "Move").
pub trait Move: Send + Sync {
    fn name(&self) -> &str;
    fn stamina_cost(&self, battle: &Battle, attacker: PlayerIndex) -> u32;
    /// `SWITCH_PRIORITY` is used for switches/no-ops, not for a `Move` impl.
    fn priority(&self, battle: &Battle, attacker: PlayerIndex) -> i32;
    fn move_type(&self) -> MonType;
    fn move_class(&self) -> MoveClass;
    fn base_power(&self) -> Option<u32>;
    fn accuracy(&self) -> u8;
    fn volatility(&self) -> u32;
    fn crit_rate(&self) -> u32;
    fn extra_data_type(&self) -> ExtraDataType;
    fn is_valid_target(&self, extra_data: ExtraData) -> bool;

    /// Invokes the move body. Implementations call back into the engine
    /// only through `Battle`'s public surface (`deal_damage`,
    /// `add_effect`, ...); this trait does not expose those directly — a
    /// concrete implementation is handed a `&mut Battle` by the scheduler
    /// and uses its public API.
    fn invoke(
        &self,
        battle: &mut Battle,
        attacker: PlayerIndex,
        extra_data: ExtraData,
        rng: &dyn Rng,
    );
}

/// Ability trigger points a concrete ability can react to. Smaller than the
/// effect step set because abilities are attached to the mon definition, not
/// inserted/removed mid-battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityTrigger {
    OnSwitchIn,
    OnSwitchOut,
    BeforeMove,
    AfterMove,
    AfterDamage,
}

/// An ability: a passive triggered by lifecycle events (glossary:
/// "Ability"). Unlike `Effect`, abilities are not stored in a per-battle
/// effect table — they are looked up from the mon's static definition.
pub trait Ability: Send + Sync {
    fn name(&self) -> &str;
    fn on_trigger(
        &self,
        trigger: AbilityTrigger,
        battle: &mut Battle,
        player: PlayerIndex,
        mon: MonIndex,
    ) -> HookOutcome;
}

/// Type-effectiveness chart: `scale_power(moveType, defType, basePower)`.
pub trait TypeCalculator: Send + Sync {
    fn scale_power(&self, move_type: MonType, defender_type: MonType, base_power: u32) -> u32;
}

/// Deterministic randomness oracle. Implementations may be VRF-backed,
/// commit-salt-backed, or a simple PRNG; the engine only requires that the
/// same seed always yields the same output.
pub trait Rng: Send + Sync {
    fn get_rng(&self, seed: [u8; 32]) -> [u8; 32];
}

/// Engine-wide hooks. Hooks may not write engine state; they receive read
/// access plus the event sink.
pub trait Hook: Send + Sync {
    fn on_battle_start(&self, _battle_key: BattleKey) {}
    fn on_turn_start(&self, _battle_key: BattleKey, _turn_id: u64) {}
    fn on_turn_end(&self, _battle_key: BattleKey, _turn_id: u64) {}
    fn on_battle_end(&self, _battle_key: BattleKey, _winner: Option<PlayerIndex>) {}
    /// Receives every `EngineEvent` as it is emitted — a structured
    /// companion to the turn-start/turn-end/battle-end callbacks above.
    fn on_event(&self, _event: crate::events::EngineEvent) {}
}

/// Team/mon registry: reachable through a small pluggable interface.
/// Concrete storage (a database, a static table, ...) is out of scope.
pub trait TeamRegistry: Send + Sync {
    fn team_size(&self, team_ref: u64) -> u8;
    fn mon(&self, team_ref: u64, index: MonIndex) -> Mon;
}

/// Matchmaker: installs a `Battle` configuration. Concrete pairing/queueing
/// logic is out of scope; only battle-key construction is exercised here.
pub trait Matchmaker: Send + Sync {
    fn open_battle(
        &self,
        p0: Address,
        p1: Address,
        p0_team: u64,
        p1_team: u64,
    ) -> BattleKey;
}
