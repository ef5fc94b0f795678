//! Core data model: mons, teams, and the `Battle` aggregate plus its
//! EVM-facing read/write surface (`deal_damage`, `switch_active`,
//! `add_effect`/`remove_effect`, the KV passthroughs). The aggregate shape
//! and the mon/stat split are this crate's own design (see DESIGN.md for
//! what it is grounded on).

use crate::capabilities::MonType;
use crate::commit_reveal::{CommitCoordinator, Decision};
use crate::effects::{EffectId, EffectInstance, EffectScope, EffectTable};
use crate::error::EngineResult;
use crate::events::EngineEvent;
use crate::kv_store::{KvKey, KvStore};
use crate::primitives::{
    Address, ActiveSlots, BattleKey, MonIndex, PlayerIndex, Value192, CLEARED_SENTINEL,
};
use crate::ruleset::Ruleset;
use crate::signature::SignedMove;
use crate::stat_boost::StatBoostLayer;
use serde::{Deserialize, Serialize};

/// Treats `CLEARED_SENTINEL` as an unset delta, resolving it to 0.
fn resolve_delta(delta: i32) -> i32 {
    if delta == CLEARED_SENTINEL {
        0
    } else {
        delta
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonStats {
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
    pub max_stamina: u32,
}

impl MonStats {
    pub const fn zero() -> Self {
        Self {
            max_hp: 0,
            attack: 0,
            defense: 0,
            special_attack: 0,
            special_defense: 0,
            speed: 0,
            max_stamina: 0,
        }
    }
}

impl Default for MonStats {
    fn default() -> Self {
        Self::zero()
    }
}

/// Opaque move/ability handles. Concrete bodies are resolved through a
/// `TeamRegistry`/move registry at execution time; the battle's own state
/// never holds a trait object (it must stay serializable).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveId(pub u32);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AbilityId(pub u32);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Mon {
    pub name: String,
    pub stats: MonStats,
    pub types: Vec<MonType>,
    pub moves: [Option<MoveId>; crate::primitives::MOVES_PER_MON],
    pub ability: Option<AbilityId>,
}

/// Mutable per-mon battle state. `hp_delta`/`stamina_delta` stack onto the
/// mon's base stats and use `CLEARED_SENTINEL` to mean "never set"; `boosts`
/// is the stat-boost layer for the five boostable stats. `should_skip_turn`
/// is read and cleared once per turn by the scheduler — set by a knockout,
/// or by an effect overwriting the mon's selection on `RoundStart`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonState {
    pub hp_delta: i32,
    pub stamina_delta: i32,
    pub boosts: StatBoostLayer,
    pub knocked_out: bool,
    pub should_skip_turn: bool,
}

impl MonState {
    pub fn full_health(_stats: &MonStats) -> Self {
        Self {
            hp_delta: CLEARED_SENTINEL,
            stamina_delta: CLEARED_SENTINEL,
            boosts: StatBoostLayer::new(),
            knocked_out: false,
            should_skip_turn: false,
        }
    }

    pub fn effective_hp(&self, stats: &MonStats) -> i32 {
        stats.max_hp as i32 + resolve_delta(self.hp_delta)
    }

    pub fn effective_stamina(&self, stats: &MonStats) -> i32 {
        stats.max_stamina as i32 + resolve_delta(self.stamina_delta)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub mons: Vec<Mon>,
    pub states: Vec<MonState>,
    pub active: ActiveSlots,
}

impl Team {
    pub fn new(mons: Vec<Mon>) -> Self {
        let states = mons.iter().map(|m| MonState::full_health(&m.stats)).collect();
        Team {
            mons,
            states,
            active: ActiveSlots::Single(MonIndex(0)),
        }
    }

    pub fn ko_bitmap(&self) -> u64 {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.knocked_out)
            .fold(0u64, |acc, (i, _)| acc | (1 << i))
    }

    pub fn is_fully_knocked_out(&self) -> bool {
        self.states.iter().all(|s| s.knocked_out)
    }

    pub fn has_non_ko_mon_other_than(&self, index: MonIndex) -> bool {
        self.states
            .iter()
            .enumerate()
            .any(|(i, s)| i != index.0 as usize && !s.knocked_out)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingInitialSwitch,
    AwaitingCommit { pending: [bool; 2] },
    AwaitingReveal { pending: [bool; 2] },
    Executing,
    GameOver,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    pub key: BattleKey,
    pub players: [Address; 2],
    pub teams: [Team; 2],
    pub ruleset: Ruleset,
    pub kv: KvStore,
    pub effects: EffectTable,
    pub turn_id: u64,
    pub state: TurnState,
    pub winner: Option<PlayerIndex>,
    pub commit_coordinator: CommitCoordinator,
    /// Drained by the caller after each step and forwarded to `Hook::on_event`.
    pub events: Vec<EngineEvent>,
}

impl Battle {
    pub fn new(key: BattleKey, players: [Address; 2], teams: [Team; 2], ruleset: Ruleset) -> Self {
        Battle {
            key,
            players,
            teams,
            ruleset,
            kv: KvStore::new(),
            effects: EffectTable::new(),
            turn_id: 0,
            state: TurnState::AwaitingInitialSwitch,
            winner: None,
            commit_coordinator: CommitCoordinator::new(),
            events: vec![EngineEvent::BattleStart { battle_key: key }],
        }
    }

    pub fn team(&self, player: PlayerIndex) -> &Team {
        &self.teams[player.as_usize()]
    }

    pub fn team_mut(&mut self, player: PlayerIndex) -> &mut Team {
        &mut self.teams[player.as_usize()]
    }

    pub fn active_index(&self, player: PlayerIndex) -> MonIndex {
        self.team(player).active.primary()
    }

    pub fn active_mon(&self, player: PlayerIndex) -> &Mon {
        let idx = self.active_index(player).0 as usize;
        &self.team(player).mons[idx]
    }

    pub fn active_state(&self, player: PlayerIndex) -> &MonState {
        let idx = self.active_index(player).0 as usize;
        &self.team(player).states[idx]
    }

    pub fn active_state_mut(&mut self, player: PlayerIndex) -> &mut MonState {
        let idx = self.active_index(player).0 as usize;
        &mut self.team_mut(player).states[idx]
    }

    pub fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Applies damage to a player's active mon by lowering its `hp_delta`,
    /// knocking it out (and marking it to skip its own turn) once its
    /// effective hp reaches zero. Does not fire the `AfterDamage` hook —
    /// that is the scheduler's job, since it needs the effect registry.
    pub fn deal_damage(&mut self, attacker: PlayerIndex, amount: u32) {
        let defender = attacker.other();
        let key = self.key;
        let max_hp = self.active_mon(defender).stats.max_hp;
        let state = self.active_state_mut(defender);
        let current = resolve_delta(state.hp_delta);
        state.hp_delta = current - amount as i32;
        if max_hp as i32 + state.hp_delta <= 0 {
            state.knocked_out = true;
            state.should_skip_turn = true;
        }
        self.emit(EngineEvent::Damage {
            battle_key: key,
            attacker,
            defender,
            amount,
        });
    }

    pub fn stamina_sufficient(&self, player: PlayerIndex, cost: u32) -> bool {
        let stats = self.active_mon(player).stats;
        self.active_state(player).effective_stamina(&stats) >= cost as i32
    }

    pub fn consume_stamina(&mut self, player: PlayerIndex, cost: u32) {
        let state = self.active_state_mut(player);
        let current = resolve_delta(state.stamina_delta);
        state.stamina_delta = current - cost as i32;
    }

    /// Switches a player's active mon: clears `Temp` stat boosts and
    /// tombstones any local effect on the outgoing mon flagged
    /// `remove_on_switch_out`. The `OnMonSwitchOut`/`OnMonSwitchIn` hooks
    /// themselves are dispatched by the caller, which holds the effect
    /// registry this method doesn't have access to.
    pub fn switch_active(&mut self, player: PlayerIndex, new_index: MonIndex) {
        let key = self.key;
        let outgoing = self.active_index(player);
        {
            let out_state = self.active_state_mut(player);
            out_state.boosts.clear_temp();
        }
        self.effects.tombstone_local_switch_out(player, outgoing);
        self.team_mut(player).active.set_primary(new_index);
        self.emit(EngineEvent::Switch {
            battle_key: key,
            player,
            mon: new_index,
        });
    }

    /// Opens the next commit window, resetting the commit/reveal bookkeeping.
    pub fn open_commit_window(&mut self, pending: [bool; 2]) {
        self.commit_coordinator = CommitCoordinator::new();
        self.state = TurnState::AwaitingCommit { pending };
    }

    pub fn submit_commit(
        &mut self,
        player: PlayerIndex,
        commitment: [u8; 32],
        now: u64,
    ) -> EngineResult<()> {
        self.commit_coordinator.commit(player, commitment, now)?;
        let key = self.key;
        let turn_id = self.turn_id;
        self.emit(EngineEvent::Commit {
            battle_key: key,
            player,
            turn_id,
        });
        if let TurnState::AwaitingCommit { pending } = &mut self.state {
            pending[player.as_usize()] = false;
            if pending.iter().all(|p| !p) {
                self.state = TurnState::AwaitingReveal { pending: [true, true] };
            }
        }
        Ok(())
    }

    pub fn submit_reveal(
        &mut self,
        player: PlayerIndex,
        player_address: Address,
        decision: Decision,
        nonce: u64,
        salt: [u8; 32],
        now: u64,
    ) -> EngineResult<()> {
        self.commit_coordinator
            .reveal(player, player_address, decision, nonce, salt, now)?;
        let key = self.key;
        let turn_id = self.turn_id;
        self.emit(EngineEvent::Reveal {
            battle_key: key,
            player,
            turn_id,
        });
        if let TurnState::AwaitingReveal { pending } = &mut self.state {
            pending[player.as_usize()] = false;
        }
        Ok(())
    }

    /// One player (the committer, trusted) submits both sides' moves in a
    /// single call, carrying the counterparty's signature over their own
    /// reveal. Only the counterparty's signature is checked — the committer
    /// is the caller and needs no signature over their own data.
    pub fn submit_dual_signed_moves(
        &mut self,
        domain_separator: [u8; 32],
        committer: PlayerIndex,
        committer_decision: Decision,
        counterparty_move: SignedMove,
        counterparty_signature: [u8; 65],
        counterparty_address: Address,
    ) -> EngineResult<[Decision; 2]> {
        let decisions = self.commit_coordinator.execute_with_dual_signed_moves(
            domain_separator,
            committer,
            committer_decision,
            counterparty_move,
            counterparty_signature,
            counterparty_address,
        )?;
        let key = self.key;
        let turn_id = self.turn_id;
        for player in [PlayerIndex::P0, PlayerIndex::P1] {
            self.emit(EngineEvent::Reveal {
                battle_key: key,
                player,
                turn_id,
            });
        }
        self.state = TurnState::AwaitingReveal { pending: [false, false] };
        Ok(decisions)
    }

    pub fn add_effect(
        &mut self,
        id: EffectId,
        scope: EffectScope,
        owner: PlayerIndex,
        mon: Option<MonIndex>,
    ) -> usize {
        let key = self.key;
        let idx = self.effects.add(EffectInstance::new(id, scope, owner, mon));
        self.emit(EngineEvent::EffectApplied {
            battle_key: key,
            player: owner,
        });
        idx
    }

    pub fn remove_effect(&mut self, index: usize) {
        let owner = self.effects.get(index).map(|e| e.owner);
        self.effects.remove(index);
        if let Some(owner) = owner {
            let key = self.key;
            self.emit(EngineEvent::EffectRemoved {
                battle_key: key,
                player: owner,
            });
        }
    }

    pub fn kv_get(&self, key: &KvKey) -> Value192 {
        self.kv.get(key)
    }

    pub fn kv_set(&mut self, key: KvKey, value: Value192) {
        self.kv.set(key, value);
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, TurnState::GameOver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mon(name: &str) -> Mon {
        Mon {
            name: name.to_string(),
            stats: MonStats {
                max_hp: 100,
                attack: 50,
                defense: 50,
                special_attack: 50,
                special_defense: 50,
                speed: 50,
                max_stamina: 20,
            },
            types: vec![MonType(0)],
            moves: [None; crate::primitives::MOVES_PER_MON],
            ability: None,
        }
    }

    fn sample_battle() -> Battle {
        let team = Team::new(vec![sample_mon("a"), sample_mon("b")]);
        Battle::new(
            BattleKey::derive([1u8; 20], [2u8; 20], 0, b"t"),
            [[1u8; 20], [2u8; 20]],
            [team.clone(), team],
            Ruleset::default(),
        )
    }

    #[test]
    fn deal_damage_knocks_out_at_zero_hp() {
        let mut battle = sample_battle();
        battle.deal_damage(PlayerIndex::P0, 1000);
        assert!(battle.active_state(PlayerIndex::P1).knocked_out);
    }

    #[test]
    fn switch_active_clears_temp_boosts_only() {
        use crate::stat_boost::{BoostScope, BoostType, Stat, StatBoostToApply};
        let mut battle = sample_battle();
        battle.active_state_mut(PlayerIndex::P0).boosts.apply(StatBoostToApply {
            stat: Stat::Speed,
            scope: BoostScope::Temp,
            boost_type: BoostType::Add,
            magnitude: 2,
        });
        battle.switch_active(PlayerIndex::P0, MonIndex(1));
        battle.switch_active(PlayerIndex::P0, MonIndex(0));
        assert_eq!(battle.active_state(PlayerIndex::P0).boosts.delta(Stat::Speed), 0);
    }

    #[test]
    fn ko_bitmap_tracks_only_knocked_out_slots() {
        let mut battle = sample_battle();
        battle.team_mut(PlayerIndex::P0).states[1].knocked_out = true;
        assert_eq!(battle.team(PlayerIndex::P0).ko_bitmap(), 0b10);
    }
}
