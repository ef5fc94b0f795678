//! A minimal matchmaker: pairs two addresses into a `BattleKey`. Real
//! queueing/pairing logic is out of scope; this only exercises the
//! key-derivation half of installing a `Battle` configuration.

use engine::capabilities::Matchmaker;
use engine::primitives::{Address, BattleKey};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct SequentialMatchmaker {
    next_nonce: AtomicU64,
}

impl SequentialMatchmaker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Matchmaker for SequentialMatchmaker {
    fn open_battle(&self, p0: Address, p1: Address, p0_team: u64, p1_team: u64) -> BattleKey {
        let nonce = self.next_nonce.fetch_add(1, Ordering::SeqCst);
        let mut params = Vec::with_capacity(16);
        params.extend_from_slice(&p0_team.to_be_bytes());
        params.extend_from_slice(&p1_team.to_be_bytes());
        BattleKey::derive(p0, p1, nonce, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_battles_get_distinct_keys() {
        let mm = SequentialMatchmaker::new();
        let a = mm.open_battle([1u8; 20], [2u8; 20], 0, 0);
        let b = mm.open_battle([1u8; 20], [2u8; 20], 0, 0);
        assert_ne!(a, b, "matchmaker must not hand out the same battle key twice");
    }
}
