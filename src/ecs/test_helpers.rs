use bevy_app::App;
use bevy_ecs::entity::Entity;

use crate::ecs::resources::PendingActions;
use crate::ecs::schedule::TurnTick;
use crate::ecs::state::GameState;
use crate::model::action::{Action, KingdomAction};

/// Run `n` full turns.
pub fn tick_turns(app: &mut App, n: u32) {
    for _ in 0..n {
        app.world_mut().run_schedule(TurnTick);
    }
}

/// The player's kingdom entity recorded by `new_game`.
pub fn player(app: &App) -> Entity {
    app.world()
        .resource::<GameState>()
        .player
        .expect("new_game records the player")
}

/// Queue a player action for the next turn.
pub fn queue(app: &mut App, kind: KingdomAction) {
    app.world_mut()
        .resource_mut::<PendingActions>()
        .0
        .push(Action::player(kind));
}
