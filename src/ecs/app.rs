use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use super::events::KingdomEvent;
use super::resources::{
    ActionResults, ActionsRng, BankRng, Chronicle, DiseaseRng, EconomyRng, EventsRng, GameRng,
    LeadershipRng, MilitaryRng, PendingActions, PopulationRng, RivalsRng, StabilityRng,
    WeatherRng, distribute_rng,
};
use super::schedule::{TurnPhase, configure_turn_schedule};
use super::state::GameState;
use crate::config::GameConfig;

/// Build a headless Bevy app with game state, core resources,
/// message types, and the turn schedule. No kingdoms are spawned and no
/// domain plugins are added.
///
/// Manual turn control:
/// ```no_run
/// # use stronghold::config::GameConfig;
/// # use stronghold::ecs::{build_game_app, TurnTick};
/// let mut app = build_game_app(&GameConfig::default());
/// for _ in 0..10 {
///     app.world_mut().run_schedule(TurnTick);
/// }
/// ```
pub fn build_game_app(config: &GameConfig) -> App {
    build_game_app_seeded(config, config.seed)
}

/// Build a headless Bevy app with a specific RNG seed and multi-threaded executor.
pub fn build_game_app_seeded(config: &GameConfig, seed: u64) -> App {
    build_game_app_with_executor(config, seed, ExecutorKind::MultiThreaded)
}

/// Build a headless Bevy app with single-threaded executor for reproducible determinism.
///
/// Use this when exact RNG consumption order across turns must be identical across runs.
pub fn build_game_app_deterministic(config: &GameConfig, seed: u64) -> App {
    build_game_app_with_executor(config, seed, ExecutorKind::SingleThreaded)
}

/// Build a headless Bevy app with a specific executor kind.
pub fn build_game_app_with_executor(config: &GameConfig, seed: u64, executor: ExecutorKind) -> App {
    let mut app = App::empty();

    // Core resources
    app.insert_resource(GameState::new(config.difficulty));
    app.insert_resource(config.clone());
    app.insert_resource(Chronicle::new());
    app.insert_resource(PendingActions::default());
    app.insert_resource(ActionResults::default());
    app.insert_resource(GameRng::new(seed));

    // Per-domain RNG resources (reseeded each turn by distribute_rng)
    app.init_resource::<ActionsRng>();
    app.init_resource::<LeadershipRng>();
    app.init_resource::<WeatherRng>();
    app.init_resource::<DiseaseRng>();
    app.init_resource::<PopulationRng>();
    app.init_resource::<EconomyRng>();
    app.init_resource::<MilitaryRng>();
    app.init_resource::<EventsRng>();
    app.init_resource::<BankRng>();
    app.init_resource::<StabilityRng>();
    app.init_resource::<RivalsRng>();

    // Register message types
    MessageRegistry::register_message::<KingdomEvent>(app.world_mut());

    // Build schedule with message rotation + RNG distribution
    let mut schedule = configure_turn_schedule(executor);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(TurnPhase::PreUpdate));
    schedule.add_systems(distribute_rng.in_set(TurnPhase::PreUpdate));
    app.add_schedule(schedule);
    app
}
