//! Military system: one system in `DomainSet::Military`.
//!
//! `update_armies` lets every unit drift a little and the army's morale
//! recover by a point.

use bevy_app::{App, Plugin};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{Army, Kingdom, KingdomCore};
use crate::ecs::resources::MilitaryRng;
use crate::ecs::schedule::{DomainSet, TurnTick};

pub struct MilitaryPlugin;

impl Plugin for MilitaryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, update_armies.in_set(DomainSet::Military));
    }
}

fn update_armies(mut kingdoms: Query<(&KingdomCore, &mut Army), With<Kingdom>>, mut rng: ResMut<MilitaryRng>) {
    let rng = &mut rng.0;
    for (core, mut army) in kingdoms.iter_mut() {
        army.update(rng);
        tracing::trace!(
            kingdom = %core.name,
            strength = army.total_strength(),
            morale = army.morale(),
            "army updated"
        );
    }
}

#[cfg(test)]
mod tests {
    use bevy_app::App;
    use bevy_ecs::entity::Entity;

    use super::*;
    use crate::config::GameConfig;
    use crate::ecs::app::build_game_app_deterministic;
    use crate::ecs::spawn::new_game;
    use crate::ecs::test_helpers::tick_turns;

    fn setup_app() -> (App, Entity) {
        let config = GameConfig::default();
        let mut app = build_game_app_deterministic(&config, 42);
        let player = new_game(app.world_mut(), &config);
        app.add_plugins(MilitaryPlugin);
        (app, player)
    }

    #[test]
    fn army_stats_stay_in_range() {
        let (mut app, player) = setup_app();
        for _ in 0..25 {
            tick_turns(&mut app, 1);
            let army = app.world().get::<Army>(player).unwrap();
            assert!((10..=100).contains(&army.morale()), "morale {}", army.morale());
            assert!(army.total_strength() >= 0);
        }
    }

    #[test]
    fn disbanded_army_stays_empty() {
        let (mut app, player) = setup_app();
        *app.world_mut().get_mut::<Army>(player).unwrap() = Army::empty();

        tick_turns(&mut app, 3);

        let army = app.world().get::<Army>(player).unwrap();
        assert!(army.units().is_empty());
        assert_eq!(army.total_strength(), 0);
    }
}
