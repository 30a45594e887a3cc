//! Leadership system.
//!
//! Two chained systems in `DomainSet::Leadership`:
//! 1. `resolve_succession` — an empty throne goes to a candidate, or costs stability
//! 2. `update_court` — elections, coups, deaths and new contenders
//!
//! One system in `DomainSet::Court`, after the army has marched:
//! 3. `update_ruler` — the ruler ages in office and gains experience

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{Army, Court, Economy, Kingdom, KingdomCore, Population};
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::LeadershipRng;
use crate::ecs::schedule::{DomainSet, TurnTick};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const EMPTY_THRONE_PENALTY: i32 = 10;

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub struct LeadershipPlugin;

impl Plugin for LeadershipPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            TurnTick,
            (resolve_succession, update_court)
                .chain()
                .in_set(DomainSet::Leadership),
        );
        app.add_systems(TurnTick, update_ruler.in_set(DomainSet::Court));
    }
}

// ---------------------------------------------------------------------------
// System 1: Succession
// ---------------------------------------------------------------------------

fn resolve_succession(
    mut kingdoms: Query<(Entity, &mut KingdomCore, &mut Court), With<Kingdom>>,
    mut rng: ResMut<LeadershipRng>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let rng = &mut rng.0;
    for (entity, mut core, mut court) in kingdoms.iter_mut() {
        if court.ruler().is_some() {
            continue;
        }
        if court.candidates().is_empty() {
            let stability = core.stability();
            core.set_stability(stability - EMPTY_THRONE_PENALTY);
            tracing::debug!(kingdom = %core.name, "throne stands empty");
            continue;
        }
        for outcome in court.handle_succession(rng) {
            events.write(KingdomEvent::from_court(entity, outcome));
        }
    }
}

// ---------------------------------------------------------------------------
// System 2: Court politics
// ---------------------------------------------------------------------------

#[allow(clippy::type_complexity)]
fn update_court(
    mut kingdoms: Query<(Entity, &mut Court, &Population, &Economy, &Army), With<Kingdom>>,
    mut rng: ResMut<LeadershipRng>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let rng = &mut rng.0;
    for (entity, mut court, population, economy, army) in kingdoms.iter_mut() {
        let outcomes = court.update(
            population.has_unrest(),
            economy.treasury.gold(),
            population.loyalty(),
            army.morale(),
            rng,
        );
        for outcome in outcomes {
            events.write(KingdomEvent::from_court(entity, outcome));
        }
    }
}

// ---------------------------------------------------------------------------
// System 3: Ruler
// ---------------------------------------------------------------------------

fn update_ruler(mut courts: Query<&mut Court, With<Kingdom>>, mut rng: ResMut<LeadershipRng>) {
    let rng = &mut rng.0;
    for mut court in courts.iter_mut() {
        if let Some(ruler) = court.ruler_mut() {
            ruler.update(rng);
        }
    }
}
