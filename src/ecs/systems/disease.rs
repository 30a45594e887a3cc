//! Disease system.
//!
//! One system in `DomainSet::Disease`:
//! 1. `progress_disease` — a healthy kingdom rolls for a fresh outbreak; an
//!    afflicted one suffers the disease's spread, deaths and lost production
//!    until it burns out

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{Affliction, Court, Economy, Kingdom, Population, Weather};
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::DiseaseRng;
use crate::ecs::schedule::{DomainSet, TurnTick};
use crate::model::disease::Disease;

pub struct DiseasePlugin;

impl Plugin for DiseasePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, progress_disease.in_set(DomainSet::Disease));
    }
}

#[allow(clippy::type_complexity)]
fn progress_disease(
    mut kingdoms: Query<
        (
            Entity,
            &mut Affliction,
            &mut Population,
            &mut Economy,
            &Weather,
            &Court,
        ),
        With<Kingdom>,
    >,
    mut rng: ResMut<DiseaseRng>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let rng = &mut rng.0;
    for (entity, mut affliction, mut population, mut economy, weather, court) in kingdoms.iter_mut() {
        if affliction.0.is_none() {
            if let Some(disease) = Disease::maybe_outbreak(&population, weather, court.ruler(), rng) {
                tracing::info!(disease = disease.name(), severity = disease.severity(), "outbreak");
                events.write(KingdomEvent::OutbreakStarted {
                    kingdom: entity,
                    disease: disease.name().to_string(),
                    severity: disease.severity(),
                });
                affliction.0 = Some(disease);
            }
            continue;
        }
        let Some(disease) = affliction.0.as_mut() else {
            continue;
        };

        disease.update(rng);
        let report = disease.apply(&mut population, &mut economy, weather, rng);
        tracing::debug!(
            disease = disease.name(),
            infected = report.new_infections,
            deaths = report.deaths,
            recovered = report.recoveries,
            "disease progressed"
        );

        if !disease.is_active() {
            events.write(KingdomEvent::OutbreakEnded {
                kingdom: entity,
                disease: disease.name().to_string(),
            });
            affliction.0 = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_app::App;
    use bevy_ecs::message::Messages;

    use super::*;
    use crate::config::GameConfig;
    use crate::ecs::app::build_game_app_deterministic;
    use crate::ecs::spawn::new_game;
    use crate::ecs::test_helpers::tick_turns;
    use crate::model::disease::DiseaseType;

    fn setup_app() -> (App, Entity) {
        let config = GameConfig::default();
        let mut app = build_game_app_deterministic(&config, 42);
        let player = new_game(app.world_mut(), &config);
        app.add_plugins(DiseasePlugin);
        (app, player)
    }

    fn drain_events(app: &mut App) -> Vec<KingdomEvent> {
        app.world_mut()
            .resource_mut::<Messages<KingdomEvent>>()
            .drain()
            .collect()
    }

    #[test]
    fn spent_disease_is_cleared() {
        let (mut app, player) = setup_app();
        let mut disease = Disease::new("Flux", 2, 10, 1, DiseaseType::Dysentery).unwrap();
        disease.outbreak(5).unwrap();
        app.world_mut().get_mut::<Affliction>(player).unwrap().0 = Some(disease);

        tick_turns(&mut app, 1);

        assert!(app.world().get::<Affliction>(player).unwrap().disease().is_none());
        let events = drain_events(&mut app);
        assert!(events.iter().any(|e| matches!(
            e,
            KingdomEvent::OutbreakEnded { disease, .. } if disease == "Flux"
        )));
    }

    #[test]
    fn afflictions_are_always_active() {
        let (mut app, player) = setup_app();
        for _ in 0..100 {
            tick_turns(&mut app, 1);
            let affliction = app.world().get::<Affliction>(player).unwrap();
            if let Some(disease) = affliction.disease() {
                assert!(disease.is_active(), "{} lingers after burning out", disease.name());
            }
        }
    }
}
