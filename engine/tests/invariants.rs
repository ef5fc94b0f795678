//! Property-based tests for invariants that must hold for every turn
//! regardless of which concrete moves/effects are in play. Kept
//! independent of any concrete `Move`/`Effect` body so the properties
//! exercise the pipeline's bookkeeping, not move-specific damage math.

use engine::battle::{Battle, Mon, MonStats, Team};
use engine::effects::{EffectId, EffectInstance, EffectScope, EffectTable, Steps};
use engine::kv_store::KvStore;
use engine::primitives::{BattleKey, PlayerIndex, Value192};
use engine::ruleset::Ruleset;
use engine::stat_boost::{BoostScope, BoostType, Stat, StatBoostLayer, StatBoostToApply};
use proptest::prelude::*;

fn mon() -> Mon {
    Mon {
        name: "m".into(),
        stats: MonStats { max_hp: 100, max_stamina: 10, ..MonStats::zero() },
        types: vec![],
        moves: [None; engine::primitives::MOVES_PER_MON],
        ability: None,
    }
}

fn battle_with_team_sizes(p0: usize, p1: usize) -> Battle {
    Battle::new(
        BattleKey::derive([0u8; 20], [1u8; 20], 0, b"prop"),
        [[0u8; 20], [1u8; 20]],
        [
            Team::new((0..p0).map(|_| mon()).collect()),
            Team::new((0..p1).map(|_| mon()).collect()),
        ],
        Ruleset::default(),
    )
}

proptest! {
    /// KO bitmap popcount never exceeds the team size.
    #[test]
    fn ko_bitmap_popcount_is_bounded_by_team_size(size in 1usize..20, ko_mask in any::<u32>()) {
        let mut battle = battle_with_team_sizes(size, 1);
        let team = battle.team_mut(PlayerIndex::P0);
        for i in 0..size {
            team.states[i].knocked_out = (ko_mask >> (i % 32)) & 1 == 1;
        }
        let popcount = team.ko_bitmap().count_ones() as usize;
        prop_assert!(popcount <= size);
    }

    /// KV reads immediately after a write return exactly what was written,
    /// for any key/value pair.
    #[test]
    fn kv_read_after_write_round_trips(key_byte in any::<u8>(), value in any::<u64>()) {
        let mut store = KvStore::new();
        let mut key = [0u8; 32];
        key[0] = key_byte;
        store.set(key, Value192::from_u64(value));
        prop_assert_eq!(store.get(&key).as_u64(), value);
    }

    /// Applying then removing the same boost always returns the delta to
    /// its pre-application value, for any magnitude and any stat.
    #[test]
    fn stat_boost_apply_then_remove_is_the_identity(magnitude in -1000i32..1000, stat_idx in 0usize..7) {
        let stats = [
            Stat::Attack, Stat::Defense, Stat::SpecialAttack,
            Stat::SpecialDefense, Stat::Speed, Stat::Accuracy, Stat::CritRate,
        ];
        let stat = stats[stat_idx];
        let mut layer = StatBoostLayer::new();
        let before = layer.delta(stat);
        let boost = StatBoostToApply { stat, scope: BoostScope::Perm, boost_type: BoostType::Add, magnitude };
        layer.apply(boost);
        layer.remove(boost);
        prop_assert_eq!(layer.delta(stat), before);
    }

    /// Effect-table slot indices are stable across any sequence of
    /// additions: an index handed back by `add` keeps pointing at the same
    /// logical row even after further inserts or removals elsewhere.
    #[test]
    fn effect_slot_indices_are_stable_across_inserts(n in 1usize..30, remove_every_other in any::<bool>()) {
        let mut table = EffectTable::new();
        let mut indices = Vec::new();
        for i in 0..n {
            let id = EffectId::new(i as u128, Steps::ON_APPLY);
            let idx = table.add(EffectInstance::new(id, EffectScope::Global, PlayerIndex::P0, None));
            indices.push((idx, id));
            if remove_every_other && i % 2 == 0 {
                table.remove(idx);
            }
        }
        for (idx, id) in indices {
            prop_assert_eq!(table.get(idx).unwrap().id, id);
        }
    }

    /// Timeout windows grow monotonically with turns elapsed: if a given
    /// elapsed time does not yet count as timed out at `elapsed_lo`
    /// elapsed turns, it must not suddenly count as timed out at any
    /// larger elapsed-turn count either (the window only ever widens).
    #[test]
    fn timeout_window_is_monotonic_in_turns_elapsed(now_offset in 1u64..10_000, elapsed_lo in 0u32..10, extra in 0u32..10) {
        use engine::commit_reveal::CommitCoordinator;
        let ruleset = Ruleset::default();
        let coord = CommitCoordinator::new();
        let elapsed_hi = elapsed_lo + extra;
        let not_timed_out_lo = !coord.commit_timed_out(PlayerIndex::P0, &ruleset, 0, now_offset, elapsed_lo);
        if not_timed_out_lo {
            prop_assert!(!coord.commit_timed_out(PlayerIndex::P0, &ruleset, 0, now_offset, elapsed_hi));
        }
    }
}
