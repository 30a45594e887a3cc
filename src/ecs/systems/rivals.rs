//! Rival AI system.
//!
//! One system in `DomainSet::Rivals`, after every kingdom has finished its
//! own turn:
//! 1. `rival_decisions` — each rival nudges its economy, drills its army,
//!    picks a fresh strategy and lets its ruler learn; a strong rival may
//!    rattle its sabres at the player. With autopilot on, the player's
//!    kingdom is governed the same way.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::{Has, With};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};
use rand::Rng;

use crate::config::GameConfig;
use crate::ecs::components::{Army, Court, Economy, Kingdom, KingdomCore, Population, Rival};
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::{ActionResults, RivalsRng};
use crate::ecs::schedule::{DomainSet, TurnTick};
use crate::model::action::{ActionOutcome, ActionResult, ActionSource};
use crate::model::economy::ResourceType;
use crate::model::military::CombatStrategy;
use crate::model::stats::{pick, roll_percent};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const LEVEL_FLOOR: i32 = 10;
const THREAT_STRENGTH: i32 = 100;
const THREAT_CHANCE: i32 = 10;

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub struct RivalsPlugin;

impl Plugin for RivalsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, rival_decisions.in_set(DomainSet::Rivals));
    }
}

// ---------------------------------------------------------------------------
// System 1: Rival decisions
// ---------------------------------------------------------------------------

#[allow(clippy::type_complexity)]
fn rival_decisions(
    config: Res<GameConfig>,
    mut kingdoms: Query<
        (
            Entity,
            &KingdomCore,
            Has<Rival>,
            &mut Economy,
            &mut Army,
            &mut Court,
            &mut Population,
        ),
        With<Kingdom>,
    >,
    mut rng: ResMut<RivalsRng>,
    mut results: ResMut<ActionResults>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let rng = &mut rng.0;
    for (entity, core, is_rival, mut economy, mut army, mut court, mut population) in kingdoms.iter_mut() {
        if !is_rival && !config.autopilot {
            continue;
        }
        govern(&mut economy, &mut army, &mut court, &mut population, rng);

        if !is_rival {
            let summary = format!(
                "production {}, trade {}, training {}, {} strategy",
                economy.production_level(),
                economy.trade_level(),
                army.training(),
                army.strategy,
            );
            tracing::debug!(kingdom = %core.name, %summary, "autopilot");
            results.0.push(ActionResult {
                source: ActionSource::Autopilot,
                action: "Autopilot",
                outcome: ActionOutcome::Success { summary },
            });
            continue;
        }

        let strength = army.total_strength();
        if strength > THREAT_STRENGTH && roll_percent(rng, THREAT_CHANCE) {
            tracing::info!(kingdom = %core.name, strength, "rival threatens");
            events.write(KingdomEvent::ThreatWarning {
                kingdom: entity,
                strength,
            });
        }
    }
}

/// One turn of AI government.
fn govern(economy: &mut Economy, army: &mut Army, court: &mut Court, population: &mut Population, rng: &mut impl Rng) {
    let production = economy.production_level() + rng.random_range(-5..=10);
    economy.set_production_level(production.max(LEVEL_FLOOR));
    let trade = economy.trade_level() + rng.random_range(-5..=10);
    economy.set_trade_level(trade.max(LEVEL_FLOOR));
    for &kind in ResourceType::ALL {
        let resource = economy.resource_mut(kind);
        let rate = resource.gather_rate() + rng.random_range(-2..=5);
        resource.set_gather_rate(rate);
    }

    army.strategy = *pick(rng, CombatStrategy::ALL);
    let training = army.training() + rng.random_range(-3..=7);
    army.set_training(training.max(LEVEL_FLOOR));

    if let Some(ruler) = court.ruler_mut() {
        ruler.gain_experience(rng);
    }

    let growth = population.growth_rate() + rng.random_range(-1..=2);
    population.set_growth_rate(growth.max(0));
}
