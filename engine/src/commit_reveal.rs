//! Commit-reveal move coordination, plus the dual-signed fast path that
//! skips straight to a revealed pair of decisions when the committing
//! player hands over the counterparty's signed reveal alongside their own,
//! instead of playing out the two-round commit/reveal dance. Timeout
//! policy reads off the `Ruleset`'s `timeout_duration_secs`/
//! `max_prev_turn_multiplier` rather than an ambient clock.

use crate::error::{EngineError, EngineResult};
use crate::primitives::{
    Address, PlayerIndex, MOVE_INDEX_MASK, NO_OP_MOVE_INDEX, SWITCH_MOVE_INDEX,
};
use crate::ruleset::Ruleset;
use crate::signature::{self, SignedMove};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// A move decision in its packed wire shape: either one of the mon's
/// `MOVES_PER_MON` move slots, a switch (carrying the target mon index in
/// `extra_data`), or a no-op.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub move_index: u8,
    pub extra_data: [u8; 30],
}

impl Decision {
    /// Builds a move decision from a raw slot index. Out-of-range slots are
    /// preserved as-is (masked to 7 bits) rather than rejected here —
    /// bounds-checking against `MOVES_PER_MON` is `validator`'s job, not the
    /// wire shape's.
    pub fn mv(slot: u8, extra_data: [u8; 30]) -> Self {
        Decision { move_index: slot & MOVE_INDEX_MASK, extra_data }
    }

    pub fn switch(target_mon: u8) -> Self {
        let mut extra_data = [0u8; 30];
        extra_data[29] = target_mon;
        Decision { move_index: SWITCH_MOVE_INDEX, extra_data }
    }

    pub fn no_op() -> Self {
        Decision { move_index: NO_OP_MOVE_INDEX, extra_data: [0u8; 30] }
    }

    pub fn is_switch(&self) -> bool {
        self.move_index == SWITCH_MOVE_INDEX
    }

    pub fn is_no_op(&self) -> bool {
        self.move_index == NO_OP_MOVE_INDEX
    }

    fn commitment(&self, player: Address, nonce: u64, salt: [u8; 32]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(player);
        hasher.update([self.move_index]);
        hasher.update(self.extra_data);
        hasher.update(nonce.to_be_bytes());
        hasher.update(salt);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PlayerSlot {
    commitment: Option<[u8; 32]>,
    revealed: Option<Decision>,
    committed_at: Option<u64>,
    revealed_at: Option<u64>,
}

/// Per-turn commit/reveal bookkeeping for both players. Constructed fresh
/// at the start of every commit window; `Battle::turn_id` is the
/// correlation key a host uses to match a coordinator instance to a turn.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitCoordinator {
    slots: [PlayerSlot; 2],
}

impl CommitCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, player: PlayerIndex, commitment: [u8; 32], now: u64) -> EngineResult<()> {
        let slot = &mut self.slots[player.as_usize()];
        if slot.commitment.is_some() {
            return Err(EngineError::InvalidNonce);
        }
        slot.commitment = Some(commitment);
        slot.committed_at = Some(now);
        Ok(())
    }

    pub fn both_committed(&self) -> bool {
        self.slots.iter().all(|s| s.commitment.is_some())
    }

    /// Reveals a commitment, checking it against the hash stored at commit
    /// time. Returns `true` once both players have revealed, signalling
    /// the caller to move on to `execute_turn`.
    pub fn reveal(
        &mut self,
        player: PlayerIndex,
        player_address: Address,
        decision: Decision,
        nonce: u64,
        salt: [u8; 32],
        now: u64,
    ) -> EngineResult<bool> {
        let slot = &mut self.slots[player.as_usize()];
        let Some(expected) = slot.commitment else {
            return Err(EngineError::IllegalMove);
        };
        if decision.commitment(player_address, nonce, salt) != expected {
            return Err(EngineError::HashMismatch);
        }
        slot.revealed = Some(decision);
        slot.revealed_at = Some(now);
        Ok(self.slots.iter().all(|s| s.revealed.is_some()))
    }

    pub fn revealed(&self) -> Option<[Decision; 2]> {
        let p0 = self.slots[0].revealed?;
        let p1 = self.slots[1].revealed?;
        Some([p0, p1])
    }

    /// Whether `turn_id` assigns the committer role to `player` (the two
    /// roles alternate by turn parity).
    fn is_committer(turn_id: u64, player: PlayerIndex) -> bool {
        turn_id % 2 == player.as_usize() as u64
    }

    /// Short-circuits straight to a revealed pair: the committer (the
    /// caller) submits both decisions directly, unsigned, and only the
    /// counterparty's EIP-712 signature over their own reveal is checked.
    pub fn execute_with_dual_signed_moves(
        &mut self,
        domain_separator: [u8; 32],
        committer: PlayerIndex,
        committer_decision: Decision,
        counterparty_move: SignedMove,
        counterparty_signature: [u8; 65],
        counterparty_address: Address,
    ) -> EngineResult<[Decision; 2]> {
        if !signature::verify(
            &counterparty_move,
            domain_separator,
            counterparty_signature,
            counterparty_address,
        ) {
            return Err(EngineError::InvalidSignature);
        }
        let counterparty_decision = Decision {
            move_index: counterparty_move.move_index,
            extra_data: counterparty_move.extra_data,
        };
        let mut out = [Decision::no_op(); 2];
        out[committer.as_usize()] = committer_decision;
        out[committer.other().as_usize()] = counterparty_decision;
        self.slots[committer.as_usize()].revealed = Some(committer_decision);
        self.slots[committer.other().as_usize()].revealed = Some(counterparty_decision);
        Ok(out)
    }

    fn timeout_for(&self, player: PlayerIndex, ruleset: &Ruleset, turns_elapsed: u32) -> u64 {
        let multiplier = turns_elapsed.min(ruleset.max_prev_turn_multiplier).max(1);
        let _ = player;
        ruleset.timeout_duration_secs * u64::from(multiplier)
    }

    /// Whether `player` has missed their commit deadline. A player who has
    /// already committed can never time out on the commit phase.
    pub fn commit_timed_out(
        &self,
        player: PlayerIndex,
        ruleset: &Ruleset,
        turn_opened_at: u64,
        now: u64,
        turns_elapsed: u32,
    ) -> bool {
        let slot = &self.slots[player.as_usize()];
        if slot.commitment.is_some() {
            return false;
        }
        now.saturating_sub(turn_opened_at) > self.timeout_for(player, ruleset, turns_elapsed)
    }

    /// Whether `player` has missed their reveal deadline. On a one-player
    /// turn the clock runs from `last_turn_timestamp`. On a two-player
    /// turn, the committer (by parity of `turn_id`) is clocked from the
    /// counterparty's reveal timestamp once the counterparty has revealed
    /// (a short window, since they're the last to act); the revealer is
    /// clocked from the counterparty's commit timestamp, since that's when
    /// their own reveal window opened.
    #[allow(clippy::too_many_arguments)]
    pub fn reveal_timed_out(
        &self,
        player: PlayerIndex,
        ruleset: &Ruleset,
        turn_id: u64,
        last_turn_timestamp: u64,
        now: u64,
        turns_elapsed: u32,
        single_player_turn: bool,
    ) -> bool {
        let slot = &self.slots[player.as_usize()];
        if slot.revealed.is_some() {
            return false;
        }
        let counterparty = &self.slots[player.other().as_usize()];
        let deadline_base = if single_player_turn {
            last_turn_timestamp
        } else if Self::is_committer(turn_id, player) {
            match counterparty.revealed_at {
                Some(t) => t,
                None => return false,
            }
        } else {
            counterparty.committed_at.unwrap_or(last_turn_timestamp)
        };
        now.saturating_sub(deadline_base) > self.timeout_for(player, ruleset, turns_elapsed)
    }

    /// The forfeiting player when exactly one side has timed out; `None`
    /// when neither or both have (a simultaneous timeout is a draw, not a
    /// forfeit, handled upstream the same way a double knockout is).
    pub fn forfeit_winner(p0_timed_out: bool, p1_timed_out: bool) -> Option<PlayerIndex> {
        match (p0_timed_out, p1_timed_out) {
            (true, false) => Some(PlayerIndex::P1),
            (false, true) => Some(PlayerIndex::P0),
            _ => None,
        }
    }
}
