//! Economy system.
//!
//! Two chained systems in `DomainSet::Economy`:
//! 1. `assess_treasury` — re-assess tax, trade and upkeep from the realm
//!    (only with live treasury accounting)
//! 2. `update_economy` — gather and consume resources, move the markets,
//!    run the trade routes and book the turn's balance

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{Army, Economy, Kingdom, KingdomCore, Population};
use crate::ecs::conditions::live_accounting;
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::EconomyRng;
use crate::ecs::schedule::{DomainSet, TurnTick};

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            TurnTick,
            (assess_treasury.run_if(live_accounting), update_economy)
                .chain()
                .in_set(DomainSet::Economy),
        );
    }
}

// ---------------------------------------------------------------------------
// System 1: Treasury assessment
// ---------------------------------------------------------------------------

fn assess_treasury(mut kingdoms: Query<(&mut Economy, &Population, &Army), With<Kingdom>>) {
    for (mut economy, population, army) in kingdoms.iter_mut() {
        let trade_level = economy.trade_level();
        let resource_count = economy.resources().len();
        let treasury = &mut economy.treasury;
        treasury.assess_tax(population);
        treasury.assess_trade(trade_level, resource_count);
        treasury.assess_military(army);
    }
}

// ---------------------------------------------------------------------------
// System 2: Economy update
// ---------------------------------------------------------------------------

fn update_economy(
    mut kingdoms: Query<(Entity, &KingdomCore, &mut Economy), With<Kingdom>>,
    mut rng: ResMut<EconomyRng>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let rng = &mut rng.0;
    for (entity, core, mut economy) in kingdoms.iter_mut() {
        let had_gold = economy.treasury.gold() > 0;
        economy.update(rng);
        tracing::debug!(
            kingdom = %core.name,
            gold = economy.treasury.gold(),
            balance = economy.treasury.balance(),
            inflation = economy.inflation(),
            "economy updated"
        );
        if had_gold && economy.treasury.gold() == 0 {
            tracing::warn!(kingdom = %core.name, "treasury is empty");
            events.write(KingdomEvent::Bankruptcy { kingdom: entity });
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

    fn setup_app(config: &GameConfig) -> (App, Entity) {
        let mut app = build_game_app_deterministic(config, 42);
        let player = new_game(app.world_mut(), config);
        app.add_plugins(EconomyPlugin);
        (app, player)
    }

    #[test]
    fn gold_never_goes_negative() {
        let (mut app, player) = setup_app(&GameConfig::default());
        {
            let mut economy = app.world_mut().get_mut::<Economy>(player).unwrap();
            economy.treasury.set_gold(1);
            economy.treasury.set_military_expenses(10_000);
        }

        tick_turns(&mut app, 2);

        let economy = app.world().get::<Economy>(player).unwrap();
        assert_eq!(economy.treasury.gold(), 0);
        let events: Vec<KingdomEvent> = app
            .world_mut()
            .resource_mut::<Messages<KingdomEvent>>()
            .drain()
            .collect();
        let bankruptcies = events
            .iter()
            .filter(|e| matches!(e, KingdomEvent::Bankruptcy { kingdom } if *kingdom == player))
            .count();
        assert_eq!(bankruptcies, 1, "only the fall to zero is reported");
    }

    #[test]
    fn fixed_ledger_without_live_accounting() {
        let (mut app, player) = setup_app(&GameConfig::default());
        let before = app.world().get::<Economy>(player).unwrap().treasury.tax_income();

        tick_turns(&mut app, 3);

        let after = app.world().get::<Economy>(player).unwrap().treasury.tax_income();
        assert_eq!(before, after);
    }

    #[test]
    fn live_accounting_taxes_the_population() {
        let config = GameConfig {
            live_treasury_accounting: true,
            ..GameConfig::default()
        };
        let (mut app, player) = setup_app(&config);

        tick_turns(&mut app, 1);

        let world = app.world();
        let population = world.get::<Population>(player).unwrap();
        let economy = world.get::<Economy>(player).unwrap();
        // The first assessment happens before any corruption sets in.
        assert_eq!(economy.treasury.tax_income(), population.tax_revenue() as i64);
        assert!(economy.treasury.military_expenses() > 0);
    }
}
