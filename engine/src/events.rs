//! Success-path event stream. The engine never owns a concrete log; it
//! hands each event to a `Hook::on_event` implementation, so a host can
//! render it however it likes.

use crate::primitives::{BattleKey, MonIndex, PlayerIndex};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    BattleStart {
        battle_key: BattleKey,
    },
    Commit {
        battle_key: BattleKey,
        player: PlayerIndex,
        turn_id: u64,
    },
    Reveal {
        battle_key: BattleKey,
        player: PlayerIndex,
        turn_id: u64,
    },
    Execute {
        battle_key: BattleKey,
        turn_id: u64,
    },
    Damage {
        battle_key: BattleKey,
        attacker: PlayerIndex,
        defender: PlayerIndex,
        amount: u32,
    },
    EffectApplied {
        battle_key: BattleKey,
        player: PlayerIndex,
    },
    EffectRemoved {
        battle_key: BattleKey,
        player: PlayerIndex,
    },
    Switch {
        battle_key: BattleKey,
        player: PlayerIndex,
        mon: MonIndex,
    },
    BattleEnd {
        battle_key: BattleKey,
        winner: Option<PlayerIndex>,
    },
}
