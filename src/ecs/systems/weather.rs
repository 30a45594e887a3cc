//! Weather system.
//!
//! One system in `DomainSet::Weather`:
//! 1. `update_weather` — the current weather runs down and bears on the
//!    people, the fields, the army and the ruler; spent weather is replaced

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{Army, Court, Economy, Kingdom, Population, Weather};
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::WeatherRng;
use crate::ecs::schedule::{DomainSet, TurnTick};

pub struct WeatherPlugin;

impl Plugin for WeatherPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, update_weather.in_set(DomainSet::Weather));
    }
}

#[allow(clippy::type_complexity)]
fn update_weather(
    mut kingdoms: Query<
        (
            Entity,
            &mut Weather,
            &mut Population,
            &mut Economy,
            &mut Army,
            &mut Court,
        ),
        With<Kingdom>,
    >,
    mut rng: ResMut<WeatherRng>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let rng = &mut rng.0;
    for (entity, mut weather, mut population, mut economy, mut army, mut court) in kingdoms.iter_mut()
    {
        weather.update(rng);
        weather.apply(
            &mut population,
            &mut economy,
            &mut army,
            court.ruler_mut(),
            rng,
        );

        if !weather.is_active() {
            *weather = Weather::generate_random(rng);
            tracing::debug!(weather = weather.name(), severity = weather.severity(), "weather turned");
            events.write(KingdomEvent::WeatherChanged {
                kingdom: entity,
                weather: weather.name().to_string(),
                severity: weather.severity(),
            });
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
    use crate::model::environment::WeatherType;

    fn setup_app() -> (App, Entity) {
        let config = GameConfig::default();
        let mut app = build_game_app_deterministic(&config, 42);
        let player = new_game(app.world_mut(), &config);
        app.add_plugins(WeatherPlugin);
        (app, player)
    }

    #[test]
    fn spent_weather_is_replaced() {
        let (mut app, player) = setup_app();
        *app.world_mut().get_mut::<Weather>(player).unwrap() =
            Weather::new("Passing Shower", WeatherType::Rainy, 1, 1).unwrap();

        tick_turns(&mut app, 1);

        let weather = app.world().get::<Weather>(player).unwrap();
        assert!(weather.is_active());
        let events: Vec<KingdomEvent> = app
            .world_mut()
            .resource_mut::<Messages<KingdomEvent>>()
            .drain()
            .collect();
        assert!(events.iter().any(|e| matches!(
            e,
            KingdomEvent::WeatherChanged { kingdom, .. } if *kingdom == player
        )));
    }

    #[test]
    fn weather_always_active_after_many_turns() {
        let (mut app, player) = setup_app();
        for _ in 0..30 {
            tick_turns(&mut app, 1);
            let weather = app.world().get::<Weather>(player).unwrap();
            assert!(weather.is_active());
            assert!((1..=5).contains(&weather.severity()));
        }
    }
}
