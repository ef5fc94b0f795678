//! Primitive identifiers and packed state shapes shared across the engine:
//! the small, dependency-free types every other module builds on.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// Ethereum-style 20-byte account identifier. Used for players and the
/// EIP-712 `verifyingContract` field.
pub type Address = [u8; 20];

/// Opaque 256-bit hash identifying a battle: `keccak256(p0 || p1 || pairHashNonce || params)`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BattleKey(pub [u8; 32]);

impl BattleKey {
    /// Derives a `BattleKey` from its constituent parts. `params` is an
    /// arbitrary caller-supplied byte encoding of the ruleset/ team refs;
    /// the engine does not interpret it, only hashes it.
    pub fn derive(p0: Address, p1: Address, pair_hash_nonce: u64, params: &[u8]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(p0);
        hasher.update(p1);
        hasher.update(pair_hash_nonce.to_be_bytes());
        hasher.update(params);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        BattleKey(out)
    }
}

impl std::fmt::Display for BattleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Which of the two players a value refers to. Only two players are
/// modeled; a doubles generalization would widen active-slot *count*, not
/// the player count.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerIndex(pub u8);

impl PlayerIndex {
    pub const P0: PlayerIndex = PlayerIndex(0);
    pub const P1: PlayerIndex = PlayerIndex(1);

    /// The other player.
    pub fn other(self) -> PlayerIndex {
        PlayerIndex(1 - self.0)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Index of a mon within a player's team (0..team_size).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonIndex(pub u8);

/// A doubles-ready generalization of a single active-mon index: a small
/// vector of active slots per player. Single-slot (1v1) is the baseline
/// and the only mode exercised by the engine today.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ActiveSlots {
    Single(MonIndex),
    Double([MonIndex; 2]),
}

impl ActiveSlots {
    pub fn primary(&self) -> MonIndex {
        match self {
            ActiveSlots::Single(m) => *m,
            ActiveSlots::Double([m, _]) => *m,
        }
    }

    pub fn set_primary(&mut self, mon: MonIndex) {
        match self {
            ActiveSlots::Single(m) => *m = mon,
            ActiveSlots::Double([m, _]) => *m = mon,
        }
    }

    pub fn slot_count(&self) -> usize {
        match self {
            ActiveSlots::Single(_) => 1,
            ActiveSlots::Double(_) => 2,
        }
    }
}

/// Sentinel distinguishing "never set" from "explicitly 0" on a `MonState`
/// delta.
pub const CLEARED_SENTINEL: i32 = i32::MIN;

/// Packed move-index wire format.
pub type PackedMoveIndex = u8;
pub const MOVE_INDEX_MASK: u8 = 0x7F;
pub const SWITCH_MOVE_INDEX: PackedMoveIndex = 125;
pub const NO_OP_MOVE_INDEX: PackedMoveIndex = 126;
pub const MOVES_PER_MON: usize = 4;

/// Switches and no-ops always resolve at this priority.
pub const SWITCH_PRIORITY: i32 = 6;

pub const CRIT_NUM: u32 = 3;
pub const CRIT_DENOM: u32 = 2;

/// Flat 192-bit value for the KV store. Stored as 24 bytes; callers
/// that only need small integers use the `from_u64`/`as_u64` helpers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Value192(pub [u8; 24]);

impl Value192 {
    pub const ZERO: Value192 = Value192([0u8; 24]);

    pub fn from_u64(v: u64) -> Self {
        let mut bytes = [0u8; 24];
        bytes[16..24].copy_from_slice(&v.to_be_bytes());
        Value192(bytes)
    }

    /// Truncating read-back of the low 64 bits. KV values used by effects in
    /// this codebase are small counters, so this is the common accessor.
    pub fn as_u64(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[16..24]);
        u64::from_be_bytes(buf)
    }

    pub fn is_zero(&self) -> bool {
        *self == Value192::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battle_key_is_deterministic() {
        let a = BattleKey::derive([1u8; 20], [2u8; 20], 7, b"ruleset-v1");
        let b = BattleKey::derive([1u8; 20], [2u8; 20], 7, b"ruleset-v1");
        assert_eq!(a, b);
    }

    #[test]
    fn battle_key_changes_with_nonce() {
        let a = BattleKey::derive([1u8; 20], [2u8; 20], 0, b"x");
        let b = BattleKey::derive([1u8; 20], [2u8; 20], 1, b"x");
        assert_ne!(a, b, "pair-hash nonce must prevent replay of identical battles");
    }

    #[test]
    fn value192_roundtrips_small_integers() {
        let v = Value192::from_u64(42);
        assert_eq!(v.as_u64(), 42);
        assert!(!v.is_zero());
        assert!(Value192::ZERO.is_zero());
    }
}
