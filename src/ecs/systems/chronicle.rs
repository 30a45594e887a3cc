//! Chronicle system.
//!
//! Runs in `TurnPhase::Reactions`, after all of a turn's updates, and turns
//! every `KingdomEvent` written during the turn into a `ChronicleEntry`.

use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageReader;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};

use crate::ecs::components::KingdomCore;
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::Chronicle;
use crate::ecs::schedule::{TurnPhase, TurnTick};
use crate::ecs::state::GameState;

/// Name recorded for messages about a kingdom that no longer exists.
const FALLEN_KINGDOM: &str = "Fallen Kingdom";

pub struct ChroniclePlugin;

impl Plugin for ChroniclePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, record_chronicle.in_set(TurnPhase::Reactions));
    }
}

fn record_chronicle(
    mut reader: MessageReader<KingdomEvent>,
    state: Res<GameState>,
    kingdoms: Query<&KingdomCore>,
    mut chronicle: ResMut<Chronicle>,
) {
    for event in reader.read() {
        let kingdom = kingdoms
            .get(event.kingdom())
            .map(|core| core.name.as_str())
            .unwrap_or(FALLEN_KINGDOM);
        let description = event.description();
        tracing::info!(turn = state.turn, kingdom, kind = event.kind(), "{description}");
        chronicle.record(state.turn, kingdom, event.kind(), description);
    }
}
