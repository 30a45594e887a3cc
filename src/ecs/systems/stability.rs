//! Stability system.
//!
//! One system in `DomainSet::Stability`, the last step of a kingdom's turn:
//! 1. `recalculate_stability` — stability is re-derived from every subsystem
//!    and the kingdom's own turn counter moves on

use bevy_app::{App, Plugin};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{Affliction, Army, Court, Economy, Kingdom, KingdomCore, Population, Weather};
use crate::ecs::resources::StabilityRng;
use crate::ecs::schedule::{DomainSet, TurnTick};
use crate::model::kingdom::KingdomView;

pub struct StabilityPlugin;

impl Plugin for StabilityPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, recalculate_stability.in_set(DomainSet::Stability));
    }
}

#[allow(clippy::type_complexity)]
fn recalculate_stability(
    mut kingdoms: Query<
        (
            &mut KingdomCore,
            &Population,
            &Economy,
            &Army,
            &Court,
            &Weather,
            &Affliction,
        ),
        With<Kingdom>,
    >,
    mut rng: ResMut<StabilityRng>,
) {
    let rng = &mut rng.0;
    for (mut core, population, economy, army, court, weather, affliction) in kingdoms.iter_mut() {
        let view = KingdomView {
            population,
            economy,
            army,
            court,
            weather,
            disease: affliction.disease(),
        };
        let stability = core.calculate_stability(&view, rng);
        core.turn += 1;
        tracing::debug!(kingdom = %core.name, turn = core.turn, stability, "turn complete");
    }
}
