use bevy_ecs::system::Res;

use super::state::{GameState, GameStatus};
use crate::config::GameConfig;

// Internal check functions for testability.

fn game_running_check(status: GameStatus, paused: bool) -> bool {
    status == GameStatus::Running && !paused
}

// Bevy run condition functions (for use with `.run_if()`).

/// True while turns should be played.
pub fn game_running(state: Res<GameState>) -> bool {
    game_running_check(state.status, state.paused)
}

/// True when the economy should re-assess its ledger every turn.
pub fn live_accounting(config: Res<GameConfig>) -> bool {
    config.live_treasury_accounting
}
