//! Move/switch validation. Pure, read-only checks against a `Battle`'s
//! current state. Doubles-ready slot-indexed variants (`*_for_slot`)
//! generalize the single-slot versions without this codebase actually
//! playing doubles.

use crate::battle::{Battle, TurnState};
use crate::commit_reveal::{CommitCoordinator, Decision};
use crate::error::{EngineError, EngineResult};
use crate::primitives::{MonIndex, PlayerIndex, MOVES_PER_MON};
use crate::ruleset::Ruleset;

/// Checks that do not depend on which move/switch was selected: the battle
/// must still be running, turn 0 always requires a switch (choosing a lead
/// mon), and a knocked-out active mon with a surviving teammate requires one
/// too.
pub fn validate_player_move_basics(battle: &Battle, player: PlayerIndex) -> EngineResult<()> {
    if battle.is_over() {
        return Err(EngineError::BattleOver);
    }
    if battle.turn_id == 0 {
        return Err(EngineError::MustSwitch);
    }
    if battle.active_state(player).knocked_out
        && battle.team(player).has_non_ko_mon_other_than(battle.active_index(player))
    {
        return Err(EngineError::MustSwitch);
    }
    Ok(())
}

/// Doubles generalization: the same basics check against one specific
/// active slot rather than the team's single `primary()` slot.
pub fn validate_player_move_basics_for_slot(
    battle: &Battle,
    player: PlayerIndex,
    slot: MonIndex,
) -> EngineResult<()> {
    if battle.is_over() {
        return Err(EngineError::BattleOver);
    }
    if battle.turn_id == 0 {
        return Err(EngineError::MustSwitch);
    }
    let idx = slot.0 as usize;
    let team = battle.team(player);
    let Some(state) = team.states.get(idx) else {
        return Err(EngineError::MoveOutOfBounds);
    };
    if state.knocked_out && team.has_non_ko_mon_other_than(slot) {
        return Err(EngineError::MustSwitch);
    }
    Ok(())
}

/// Validates a switch target: in bounds and not already knocked out.
/// Switching into the currently active mon is rejected, except on turn 0
/// where every player is choosing a lead mon for the first time.
pub fn validate_switch(battle: &Battle, player: PlayerIndex, target: MonIndex) -> EngineResult<()> {
    let team = battle.team(player);
    let idx = target.0 as usize;
    if idx >= team.mons.len() {
        return Err(EngineError::MoveOutOfBounds);
    }
    if battle.turn_id != 0 && target == battle.active_index(player) {
        return Err(EngineError::SwitchToSame);
    }
    if team.states[idx].knocked_out {
        return Err(EngineError::SwitchToKO);
    }
    Ok(())
}

pub fn validate_switch_for_slot(
    battle: &Battle,
    player: PlayerIndex,
    slot: MonIndex,
    target: MonIndex,
) -> EngineResult<()> {
    let team = battle.team(player);
    let idx = target.0 as usize;
    if idx >= team.mons.len() {
        return Err(EngineError::MoveOutOfBounds);
    }
    if battle.turn_id != 0 && target == slot {
        return Err(EngineError::SwitchToSame);
    }
    if team.states[idx].knocked_out {
        return Err(EngineError::SwitchToKO);
    }
    Ok(())
}

/// Validates a decision's shape and, for an actual move slot, that the mon
/// has a move registered there. Target legality against the move's
/// `ExtraDataType` is left to the caller, which has the concrete `Move`
/// body in hand.
pub fn validate_specific_move_selection(
    battle: &Battle,
    player: PlayerIndex,
    decision: Decision,
) -> EngineResult<()> {
    if decision.is_no_op() {
        return Ok(());
    }
    if decision.is_switch() {
        let target = MonIndex(decision.extra_data[29]);
        return validate_switch(battle, player, target);
    }
    if decision.move_index as usize >= MOVES_PER_MON {
        return Err(EngineError::MoveOutOfBounds);
    }
    let mon = battle.active_mon(player);
    if mon.moves[decision.move_index as usize].is_none() {
        return Err(EngineError::IllegalMove);
    }
    Ok(())
}

/// Timeout validation delegating to the commit coordinator, surfaced here
/// as a single entry point grouping every legality check together. A turn
/// with only one `pending` flag set is a one-player turn (a forced switch,
/// or the lone remaining actor after the other side has already acted).
#[allow(clippy::too_many_arguments)]
pub fn validate_timeout_logic(
    coordinator: &CommitCoordinator,
    state: &TurnState,
    player: PlayerIndex,
    ruleset: &Ruleset,
    turn_id: u64,
    window_opened_at: u64,
    now: u64,
    turns_elapsed: u32,
) -> EngineResult<()> {
    let timed_out = match state {
        TurnState::AwaitingCommit { .. } => {
            coordinator.commit_timed_out(player, ruleset, window_opened_at, now, turns_elapsed)
        }
        TurnState::AwaitingReveal { pending } => {
            let single_player_turn = pending.iter().filter(|p| **p).count() <= 1;
            coordinator.reveal_timed_out(
                player,
                ruleset,
                turn_id,
                window_opened_at,
                now,
                turns_elapsed,
                single_player_turn,
            )
        }
        _ => false,
    };
    if timed_out {
        Ok(())
    } else {
        Err(EngineError::NotTimedOut)
    }
}

/// Read-only game-over check (mirrors `turn::check_game_over`'s
/// determination without mutating the battle), for callers that only want
/// to query the outcome.
pub fn check_game_over(battle: &Battle) -> Option<PlayerIndex> {
    let p0_out = battle.team(PlayerIndex::P0).is_fully_knocked_out();
    let p1_out = battle.team(PlayerIndex::P1).is_fully_knocked_out();
    match (p0_out, p1_out) {
        (true, true) => None,
        (true, false) => Some(PlayerIndex::P1),
        (false, true) => Some(PlayerIndex::P0),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{MonStats, Team};
    use crate::primitives::BattleKey;

    fn mon() -> crate::battle::Mon {
        crate::battle::Mon {
            name: "m".into(),
            stats: MonStats { max_hp: 50, max_stamina: 10, ..MonStats::zero() },
            types: vec![],
            moves: [None; MOVES_PER_MON],
            ability: None,
        }
    }

    fn battle() -> Battle {
        Battle::new(
            BattleKey::derive([0u8; 20], [1u8; 20], 0, b""),
            [[0u8; 20], [1u8; 20]],
            [Team::new(vec![mon(), mon()]), Team::new(vec![mon()])],
            Ruleset::default(),
        )
    }

    #[test]
    fn switching_into_the_active_mon_is_rejected() {
        let mut b = battle();
        b.turn_id = 1;
        let err = validate_switch(&b, PlayerIndex::P0, MonIndex(0)).unwrap_err();
        assert_eq!(err, EngineError::SwitchToSame);
    }

    #[test]
    fn switching_into_a_knocked_out_mon_is_rejected() {
        let mut b = battle();
        b.team_mut(PlayerIndex::P0).states[1].knocked_out = true;
        let err = validate_switch(&b, PlayerIndex::P0, MonIndex(1)).unwrap_err();
        assert_eq!(err, EngineError::SwitchToKO);
    }

    #[test]
    fn basics_require_a_switch_after_a_knockout_with_mons_left() {
        let mut b = battle();
        b.turn_id = 1;
        b.team_mut(PlayerIndex::P0).states[0].knocked_out = true;
        let err = validate_player_move_basics(&b, PlayerIndex::P0).unwrap_err();
        assert_eq!(err, EngineError::MustSwitch);
    }

    #[test]
    fn turn_zero_always_requires_a_switch() {
        let b = battle();
        let err = validate_player_move_basics(&b, PlayerIndex::P0).unwrap_err();
        assert_eq!(err, EngineError::MustSwitch);
    }

    #[test]
    fn move_out_of_bounds_is_rejected() {
        let b = battle();
        let decision = Decision::mv(9, [0u8; 30]);
        let err = validate_specific_move_selection(&b, PlayerIndex::P0, decision).unwrap_err();
        assert_eq!(err, EngineError::MoveOutOfBounds);
    }
}
