//! Random events system.
//!
//! Two chained systems in `DomainSet::Events`:
//! 1. `roll_random_events` — with probability 1 in `random_event_chance`, a
//!    kingdom is struck by a fresh event that takes effect at once
//! 2. `expire_events` — running events age a turn; spent ones are dropped

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};

use crate::config::GameConfig;
use crate::ecs::components::{ActiveEvents, Army, Economy, Kingdom, KingdomCore, Population};
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::EventsRng;
use crate::ecs::schedule::{DomainSet, TurnTick};
use crate::model::event::RandomEvent;
use crate::model::stats::one_in;

pub struct RandomEventsPlugin;

impl Plugin for RandomEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            TurnTick,
            (roll_random_events, expire_events)
                .chain()
                .in_set(DomainSet::Events),
        );
    }
}

#[allow(clippy::type_complexity)]
fn roll_random_events(
    config: Res<GameConfig>,
    mut kingdoms: Query<
        (
            Entity,
            &KingdomCore,
            &mut ActiveEvents,
            &mut Population,
            &mut Economy,
            &mut Army,
        ),
        With<Kingdom>,
    >,
    mut rng: ResMut<EventsRng>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let rng = &mut rng.0;
    for (entity, core, mut active, mut population, mut economy, mut army) in kingdoms.iter_mut() {
        if !one_in(rng, config.random_event_chance) {
            continue;
        }
        let event = RandomEvent::generate(rng);
        event.apply(&mut population, &mut economy, &mut army, rng);
        tracing::debug!(kingdom = %core.name, event = %event.name, magnitude = event.magnitude, "random event");
        events.write(KingdomEvent::RandomEvent {
            kingdom: entity,
            name: event.name.clone(),
            magnitude: event.magnitude,
        });
        active.0.push(event);
    }
}

fn expire_events(mut kingdoms: Query<(&KingdomCore, &mut ActiveEvents), With<Kingdom>>) {
    for (core, mut active) in kingdoms.iter_mut() {
        if active.0.is_empty() {
            continue;
        }
        for name in active.tick() {
            tracing::trace!(kingdom = %core.name, event = %name, "event expired");
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_app::App;
    use bevy_ecs::message::Messages;

    use super::*;
    use crate::ecs::app::build_game_app_deterministic;
    use crate::ecs::spawn::new_game;
    use crate::ecs::test_helpers::tick_turns;
    use crate::model::event::{EventCategory, EventType};

    fn setup_app(random_event_chance: u32) -> (App, Entity) {
        let config = GameConfig {
            random_event_chance,
            ..GameConfig::default()
        };
        let mut app = build_game_app_deterministic(&config, 42);
        let player = new_game(app.world_mut(), &config);
        app.add_plugins(RandomEventsPlugin);
        (app, player)
    }

    #[test]
    fn certain_chance_strikes_every_turn() {
        let (mut app, player) = setup_app(1);

        tick_turns(&mut app, 1);

        let events: Vec<KingdomEvent> = app
            .world_mut()
            .resource_mut::<Messages<KingdomEvent>>()
            .drain()
            .collect();
        let struck = events
            .iter()
            .filter(|e| matches!(e, KingdomEvent::RandomEvent { kingdom, .. } if *kingdom == player))
            .count();
        assert_eq!(struck, 1);
    }

    #[test]
    fn events_expire_after_their_duration() {
        let (mut app, player) = setup_app(u32::MAX);
        app.world_mut().get_mut::<ActiveEvents>(player).unwrap().0 = vec![
            RandomEvent::new(EventCategory::Harvest, EventType::Positive, 10, 1),
            RandomEvent::new(EventCategory::Military, EventType::Negative, -10, 3),
        ];

        tick_turns(&mut app, 1);
        assert_eq!(app.world().get::<ActiveEvents>(player).unwrap().0.len(), 1);

        tick_turns(&mut app, 2);
        assert!(app.world().get::<ActiveEvents>(player).unwrap().0.is_empty());
    }

    #[test]
    fn running_events_are_all_active() {
        let (mut app, player) = setup_app(1);
        for _ in 0..20 {
            tick_turns(&mut app, 1);
            let active = app.world().get::<ActiveEvents>(player).unwrap();
            assert!(active.0.iter().all(|e| e.active && e.turns_remaining > 0));
        }
    }
}
