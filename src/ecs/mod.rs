pub mod app;
pub mod components;
pub mod conditions;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::{
    build_game_app, build_game_app_deterministic, build_game_app_seeded, build_game_app_with_executor,
};
pub use components::{
    ActiveEvents, Affliction, Army, Bank, Court, Economy, IsPlayer, Kingdom, KingdomCore, Population,
    Rival, Weather,
};
pub use conditions::{game_running, live_accounting};
pub use events::KingdomEvent;
pub use plugin::GamePlugin;
pub use resources::{ActionResults, Chronicle, ChronicleEntry, GameRng, PendingActions};
pub use schedule::{DomainSet, TurnPhase, TurnTick, configure_turn_schedule};
pub use spawn::{KingdomBundle, new_game, spawn_kingdom};
pub use state::{GameState, GameStatus};
