//! End-of-turn checks.
//!
//! One system in `TurnPhase::PostUpdate`, after the turn counter moves:
//! 1. `check_end_conditions` — the game is lost without a player kingdom,
//!    won once every rival is gone and over at the turn limit; a shaky
//!    player kingdom gets a stability warning
//!
//! One system in `TurnPhase::Last`:
//! 2. `log_turn_summary` — a one-line summary of the player's kingdom

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};

use crate::config::GameConfig;
use crate::ecs::components::{Affliction, Army, Court, Economy, KingdomCore, Population, Rival, Weather};
use crate::ecs::events::KingdomEvent;
use crate::ecs::schedule::{TurnPhase, TurnTick};
use crate::ecs::state::{GameState, GameStatus, advance_turn};
use crate::model::kingdom::KingdomView;

pub struct EndgamePlugin;

impl Plugin for EndgamePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            TurnTick,
            check_end_conditions
                .after(advance_turn)
                .in_set(TurnPhase::PostUpdate),
        );
        app.add_systems(TurnTick, log_turn_summary.in_set(TurnPhase::Last));
    }
}

type KingdomData = (
    &'static KingdomCore,
    &'static Population,
    &'static Economy,
    &'static Army,
    &'static Court,
    &'static Weather,
    &'static Affliction,
);

// ---------------------------------------------------------------------------
// System 1: End conditions
// ---------------------------------------------------------------------------

fn check_end_conditions(
    mut state: ResMut<GameState>,
    config: Res<GameConfig>,
    kingdoms: Query<KingdomData>,
    rivals: Query<(), With<Rival>>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let turn = state.turn;
    let Some((player, data)) = state
        .player
        .and_then(|entity| kingdoms.get(entity).ok().map(|data| (entity, data)))
    else {
        tracing::warn!(turn, "the player's kingdom has fallen");
        state.status = GameStatus::Defeat;
        state.final_score = Some(0);
        return;
    };
    let (core, population, economy, army, court, weather, affliction) = data;

    let status = if config.rival_count > 0 && rivals.is_empty() {
        Some(GameStatus::Victory)
    } else if turn >= config.max_turns {
        Some(GameStatus::TurnLimit)
    } else {
        None
    };

    if core.stability() <= config.stability_warning_threshold {
        tracing::warn!(kingdom = %core.name, stability = core.stability(), "kingdom on the brink");
        events.write(KingdomEvent::StabilityWarning {
            kingdom: player,
            stability: core.stability(),
        });
    }

    let Some(status) = status else {
        return;
    };
    let view = KingdomView {
        population,
        economy,
        army,
        court,
        weather,
        disease: affliction.disease(),
    };
    let score = view.score(core.stability(), turn);
    tracing::info!(kingdom = %core.name, turn, ?status, score, "game over");
    state.status = status;
    state.final_score = Some(score);
    events.write(KingdomEvent::GameEnded {
        kingdom: player,
        status,
        score,
    });
}

// ---------------------------------------------------------------------------
// System 2: Turn summary
// ---------------------------------------------------------------------------

fn log_turn_summary(state: Res<GameState>, kingdoms: Query<(&KingdomCore, &Population, &Economy, &Army)>) {
    let Some(Ok((core, population, economy, army))) = state.player.map(|player| kingdoms.get(player)) else {
        return;
    };
    tracing::debug!(
        turn = state.turn,
        kingdom = %core.name,
        population = population.total(),
        gold = economy.treasury.gold(),
        strength = army.total_strength(),
        stability = core.stability(),
        "turn summary"
    );
}
