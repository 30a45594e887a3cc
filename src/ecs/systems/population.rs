//! Population system.
//!
//! One system in `DomainSet::Population`:
//! 1. `feed_population` — the people grow or starve on the food in store,
//!    then eat what they need of it

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{Economy, Kingdom, KingdomCore, Population};
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::PopulationRng;
use crate::ecs::schedule::{DomainSet, TurnTick};
use crate::model::economy::ResourceType;

pub struct PopulationPlugin;

impl Plugin for PopulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, feed_population.in_set(DomainSet::Population));
    }
}

fn feed_population(
    mut kingdoms: Query<(Entity, &KingdomCore, &mut Population, &mut Economy), With<Kingdom>>,
    mut rng: ResMut<PopulationRng>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let rng = &mut rng.0;
    for (entity, core, mut population, mut economy) in kingdoms.iter_mut() {
        let food = economy.resource(ResourceType::Food).amount();
        let report = population.update(food.min(i32::MAX as i64) as i32, rng);
        tracing::debug!(
            kingdom = %core.name,
            total = population.total(),
            growth = report.growth,
            starved = report.starved,
            "population updated"
        );
        if report.unrest_started {
            events.write(KingdomEvent::UnrestBroke { kingdom: entity });
        }

        let eaten = (population.food_required() as i64).min(food);
        if eaten > 0 {
            economy.resource_mut(ResourceType::Food).adjust(-eaten);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_app::App;

    use super::*;
    use crate::config::GameConfig;
    use crate::ecs::app::build_game_app_deterministic;
    use crate::ecs::spawn::new_game;
    use crate::ecs::test_helpers::tick_turns;

    fn setup_app() -> (App, Entity) {
        let config = GameConfig::default();
        let mut app = build_game_app_deterministic(&config, 42);
        let player = new_game(app.world_mut(), &config);
        app.add_plugins(PopulationPlugin);
        (app, player)
    }

    #[test]
    fn people_eat_from_stores() {
        let (mut app, player) = setup_app();
        let before = app
            .world()
            .get::<Economy>(player)
            .unwrap()
            .resource(ResourceType::Food)
            .amount();
        tick_turns(&mut app, 1);
        let after = app
            .world()
            .get::<Economy>(player)
            .unwrap()
            .resource(ResourceType::Food)
            .amount();
        assert!(after < before);
        assert!(after >= 0);
    }

    #[test]
    fn empty_granary_is_never_negative() {
        let (mut app, player) = setup_app();
        app.world_mut()
            .get_mut::<Economy>(player)
            .unwrap()
            .resource_mut(ResourceType::Food)
            .set_amount(0)
            .unwrap();

        tick_turns(&mut app, 3);

        let economy = app.world().get::<Economy>(player).unwrap();
        assert_eq!(economy.resource(ResourceType::Food).amount(), 0);
    }
}
