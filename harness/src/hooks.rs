//! Tracing-backed `Hook` implementation and subscriber bootstrap:
//! `tracing_subscriber::registry().with(EnvFilter...).with(fmt::layer()).init()`,
//! without any HTTP-layer wiring since this crate exposes no network
//! surface of its own.

use engine::capabilities::Hook;
use engine::events::EngineEvent;
use engine::primitives::{BattleKey, PlayerIndex};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global tracing subscriber. Safe to call once at process
/// startup; a second call fails silently rather than panicking, since
/// tests may call it more than once across the same process.
pub fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "engine=debug,harness=debug".into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHook;

impl Hook for TracingHook {
    fn on_battle_start(&self, battle_key: BattleKey) {
        info!(%battle_key, "battle started");
    }

    fn on_turn_start(&self, battle_key: BattleKey, turn_id: u64) {
        debug!(%battle_key, turn_id, "turn start");
    }

    fn on_turn_end(&self, battle_key: BattleKey, turn_id: u64) {
        debug!(%battle_key, turn_id, "turn end");
    }

    fn on_battle_end(&self, battle_key: BattleKey, winner: Option<PlayerIndex>) {
        info!(%battle_key, winner = ?winner.map(|p| p.0), "battle ended");
    }

    fn on_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::Damage { battle_key, attacker, defender, amount } => {
                debug!(%battle_key, attacker = attacker.0, defender = defender.0, amount, "damage");
            }
            EngineEvent::Switch { battle_key, player, mon } => {
                debug!(%battle_key, player = player.0, mon = mon.0, "switch");
            }
            other => debug!(?other, "event"),
        }
    }
}
