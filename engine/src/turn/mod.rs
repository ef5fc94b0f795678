//! Turn execution: the state machine driving a battle from
//! `AwaitingInitialSwitch` through repeated commit/reveal/execute cycles to
//! `GameOver`, and the execute pipeline itself: entry step, ordering, a
//! per-action sequence, end-of-turn residuals, then a battle-state check.

pub mod priority;

pub use priority::{ActionKind, PlayerAction};

use crate::battle::{Battle, MoveId, TurnState};
use crate::capabilities::{Move, Rng};
use crate::effects::{Effect, EffectId, Step};
use crate::primitives::PlayerIndex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub winner: Option<PlayerIndex>,
    /// Set when an active mon was knocked out this turn and its owner must
    /// submit a switch before the next commit window opens.
    pub forced_switch: Option<PlayerIndex>,
}

type MoveLookup<'a> = dyn Fn(MoveId) -> Option<Arc<dyn Move>> + 'a;
type EffectLookup<'a> = dyn Fn(EffectId) -> Option<Arc<dyn Effect>> + 'a;

fn active_mons(battle: &Battle) -> [crate::primitives::MonIndex; 2] {
    [
        battle.active_index(PlayerIndex::P0),
        battle.active_index(PlayerIndex::P1),
    ]
}

/// Dispatches one step without aliasing `battle.effects` against `battle`
/// itself: the table is moved out for the duration of the dispatch (hook
/// bodies mutate `battle`'s other fields, never the table directly) and
/// moved back afterward.
fn dispatch_step(battle: &mut Battle, step: Step, effect_lookup: &EffectLookup) {
    let active = active_mons(battle);
    let mut table = std::mem::take(&mut battle.effects);
    table.dispatch(step, battle, effect_lookup, active);
    battle.effects = table;
}

fn check_game_over(battle: &mut Battle) -> Option<PlayerIndex> {
    let p0_out = battle.team(PlayerIndex::P0).is_fully_knocked_out();
    let p1_out = battle.team(PlayerIndex::P1).is_fully_knocked_out();
    let winner = match (p0_out, p1_out) {
        (true, true) => None, // simultaneous knockout: no winner, still a terminal state
        (true, false) => Some(PlayerIndex::P1),
        (false, true) => Some(PlayerIndex::P0),
        (false, false) => return None,
    };
    battle.winner = winner;
    battle.state = TurnState::GameOver;
    let key = battle.key;
    battle.emit(crate::events::EngineEvent::BattleEnd { battle_key: key, winner });
    winner
}

/// Runs one player's action. `BeforeMove`/`AfterMove` dispatch around every
/// action kind, including switches and no-ops, since a no-op is how a mon
/// regenerates stamina via an `AfterMove`-hooked effect. `AfterDamage`
/// dispatches only when the move actually dealt nonzero damage this call.
fn run_action(
    battle: &mut Battle,
    action: PlayerAction,
    move_lookup: &MoveLookup,
    effect_lookup: &EffectLookup,
    rng: &dyn Rng,
) {
    dispatch_step(battle, Step::BeforeMove, effect_lookup);
    match action.kind {
        ActionKind::NoOp => {}
        ActionKind::Switch(target) => {
            dispatch_step(battle, Step::OnSwitchOut, effect_lookup);
            battle.switch_active(action.player, target);
            dispatch_step(battle, Step::OnSwitchIn, effect_lookup);
        }
        ActionKind::Move(move_id, extra_data) => {
            if let Some(body) = move_lookup(move_id) {
                let cost = body.stamina_cost(battle, action.player);
                if battle.stamina_sufficient(action.player, cost) {
                    battle.consume_stamina(action.player, cost);
                    if !battle.active_state(action.player).should_skip_turn {
                        let events_before = battle.events.len();
                        body.invoke(battle, action.player, extra_data, rng);
                        let dealt_damage = battle.events[events_before..].iter().any(|e| {
                            matches!(e, crate::events::EngineEvent::Damage { amount, .. } if *amount > 0)
                        });
                        if dealt_damage {
                            dispatch_step(battle, Step::AfterDamage, effect_lookup);
                        }
                    }
                }
            }
        }
    }
    dispatch_step(battle, Step::AfterMove, effect_lookup);
}

/// Runs the execute-phase pipeline for one fully-revealed turn. Both
/// players' actions are known up front (commit-reveal already resolved
/// them); this function only orders and applies them.
pub fn execute_turn(
    battle: &mut Battle,
    actions: [PlayerAction; 2],
    move_lookup: &MoveLookup,
    effect_lookup: &EffectLookup,
    rng: &dyn Rng,
    seed: [u8; 32],
) -> TurnOutcome {
    battle.state = TurnState::Executing;
    let key = battle.key;
    battle.emit(crate::events::EngineEvent::Execute { battle_key: key, turn_id: battle.turn_id });

    for player in [PlayerIndex::P0, PlayerIndex::P1] {
        battle.active_state_mut(player).should_skip_turn = false;
    }
    dispatch_step(battle, Step::RoundStart, effect_lookup);

    let ordered = priority::order_actions(actions, battle, move_lookup, rng, seed);

    let mut forced_switch = None;
    for action in ordered {
        if battle.is_over() {
            break;
        }
        run_action(battle, action, move_lookup, effect_lookup, rng);
        let defender = action.player.other();
        if battle.active_state(defender).knocked_out
            && battle.team(defender).has_non_ko_mon_other_than(battle.active_index(defender))
        {
            forced_switch = Some(defender);
        }
        if check_game_over(battle).is_some() {
            break;
        }
    }

    if !battle.is_over() {
        dispatch_step(battle, Step::RoundEnd, effect_lookup);
        check_game_over(battle);
    }

    battle.turn_id += 1;
    if !battle.is_over() {
        if forced_switch.is_some() {
            battle.state = TurnState::AwaitingInitialSwitch;
        } else {
            battle.open_commit_window([true, true]);
        }
    }

    TurnOutcome { winner: battle.winner, forced_switch }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{MonStats, Team};
    use crate::capabilities::{ExtraData, ExtraDataType, MoveClass, MonType};
    use crate::primitives::{BattleKey, MonIndex};
    use crate::ruleset::Ruleset;

    struct StubRng;
    impl Rng for StubRng {
        fn get_rng(&self, _seed: [u8; 32]) -> [u8; 32] {
            [0u8; 32]
        }
    }

    struct Tackle;
    impl Move for Tackle {
        fn name(&self) -> &str {
            "tackle"
        }
        fn stamina_cost(&self, _battle: &Battle, _attacker: PlayerIndex) -> u32 {
            1
        }
        fn priority(&self, _battle: &Battle, _attacker: PlayerIndex) -> i32 {
            0
        }
        fn move_type(&self) -> MonType {
            MonType(0)
        }
        fn move_class(&self) -> MoveClass {
            MoveClass::Physical
        }
        fn base_power(&self) -> Option<u32> {
            Some(40)
        }
        fn accuracy(&self) -> u8 {
            100
        }
        fn volatility(&self) -> u32 {
            0
        }
        fn crit_rate(&self) -> u32 {
            0
        }
        fn extra_data_type(&self) -> ExtraDataType {
            ExtraDataType::None
        }
        fn is_valid_target(&self, _extra_data: ExtraData) -> bool {
            true
        }
        fn invoke(
            &self,
            battle: &mut Battle,
            attacker: PlayerIndex,
            _extra_data: ExtraData,
            _rng: &dyn Rng,
        ) {
            battle.deal_damage(attacker, 25);
        }
    }

    fn mon(speed: u32, hp: u32) -> crate::battle::Mon {
        crate::battle::Mon {
            name: "m".into(),
            stats: MonStats {
                speed,
                max_hp: hp,
                max_stamina: 10,
                attack: 20,
                defense: 20,
                special_attack: 20,
                special_defense: 20,
            },
            types: vec![],
            moves: [Some(MoveId(1)), None, None, None],
            ability: None,
        }
    }

    fn battle(hp0: u32, hp1: u32) -> Battle {
        Battle::new(
            BattleKey::derive([0u8; 20], [1u8; 20], 0, b""),
            [[0u8; 20], [1u8; 20]],
            [Team::new(vec![mon(50, hp0)]), Team::new(vec![mon(10, hp1)])],
            Ruleset::default(),
        )
    }

    fn move_lookup(_: MoveId) -> Option<Arc<dyn Move>> {
        Some(Arc::new(Tackle))
    }

    fn no_effects(_: EffectId) -> Option<Arc<dyn Effect>> {
        None
    }

    #[test]
    fn faster_attacker_deals_damage_first() {
        let mut b = battle(100, 100);
        let actions = [
            PlayerAction { player: PlayerIndex::P0, kind: ActionKind::Move(MoveId(1), ExtraData::default()) },
            PlayerAction { player: PlayerIndex::P1, kind: ActionKind::Move(MoveId(1), ExtraData::default()) },
        ];
        let outcome = execute_turn(&mut b, actions, &move_lookup, &no_effects, &StubRng, [0u8; 32]);
        assert_eq!(outcome.winner, None);
        let stats = b.active_mon(PlayerIndex::P1).stats;
        assert_eq!(b.active_state(PlayerIndex::P1).effective_hp(&stats), 75);
        let stats = b.active_mon(PlayerIndex::P0).stats;
        assert_eq!(b.active_state(PlayerIndex::P0).effective_hp(&stats), 75);
    }

    #[test]
    fn knockout_declares_a_winner() {
        let mut b = battle(100, 10);
        let actions = [
            PlayerAction { player: PlayerIndex::P0, kind: ActionKind::Move(MoveId(1), ExtraData::default()) },
            PlayerAction { player: PlayerIndex::P1, kind: ActionKind::Move(MoveId(1), ExtraData::default()) },
        ];
        let outcome = execute_turn(&mut b, actions, &move_lookup, &no_effects, &StubRng, [0u8; 32]);
        assert_eq!(outcome.winner, Some(PlayerIndex::P0));
        assert!(b.is_over());
    }

    #[test]
    fn turn_counter_advances() {
        let mut b = battle(100, 100);
        let actions = [
            PlayerAction { player: PlayerIndex::P0, kind: ActionKind::NoOp },
            PlayerAction { player: PlayerIndex::P1, kind: ActionKind::NoOp },
        ];
        execute_turn(&mut b, actions, &move_lookup, &no_effects, &StubRng, [0u8; 32]);
        assert_eq!(b.turn_id, 1);
        assert!(matches!(b.state, TurnState::AwaitingCommit { .. }));
        let _ = MonIndex(0);
    }
}
