//! Action ordering: priority first, then speed, then an RNG tiebreak, over
//! this crate's two-player, single-slot action set.

use crate::battle::{Battle, MoveId};
use crate::capabilities::{ExtraData, Move, Rng};
use crate::primitives::{MonIndex, PlayerIndex, SWITCH_PRIORITY};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Move(MoveId, ExtraData),
    Switch(MonIndex),
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAction {
    pub player: PlayerIndex,
    pub kind: ActionKind,
}

fn priority_of(
    action: &PlayerAction,
    battle: &Battle,
    move_lookup: &dyn Fn(MoveId) -> Option<Arc<dyn Move>>,
) -> i32 {
    match action.kind {
        ActionKind::Switch(_) | ActionKind::NoOp => SWITCH_PRIORITY,
        ActionKind::Move(move_id, _) => move_lookup(move_id)
            .map(|m| m.priority(battle, action.player))
            .unwrap_or(0),
    }
}

fn speed_of(action: &PlayerAction, battle: &Battle) -> i32 {
    let mon = battle.active_mon(action.player);
    let state = battle.active_state(action.player);
    (mon.stats.speed as i32) + state.boosts.delta(crate::stat_boost::Stat::Speed)
}

/// Orders the two players' actions for this turn. Ties (equal priority and
/// equal speed) are broken by a single RNG byte drawn from `seed`, not by
/// player index, so neither player has a structural first-mover advantage.
pub fn order_actions(
    actions: [PlayerAction; 2],
    battle: &Battle,
    move_lookup: &dyn Fn(MoveId) -> Option<Arc<dyn Move>>,
    rng: &dyn Rng,
    seed: [u8; 32],
) -> [PlayerAction; 2] {
    let p0 = actions[0];
    let p1 = actions[1];
    let pr0 = priority_of(&p0, battle, move_lookup);
    let pr1 = priority_of(&p1, battle, move_lookup);
    if pr0 != pr1 {
        return if pr0 > pr1 { [p0, p1] } else { [p1, p0] };
    }
    let sp0 = speed_of(&p0, battle);
    let sp1 = speed_of(&p1, battle);
    if sp0 != sp1 {
        return if sp0 > sp1 { [p0, p1] } else { [p1, p0] };
    }
    let draw = rng.get_rng(seed);
    if draw[0] % 2 == 0 {
        [p0, p1]
    } else {
        [p1, p0]
    }
}
