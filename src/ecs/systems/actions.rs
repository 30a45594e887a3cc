//! Actions system.
//!
//! Drains `PendingActions` at the start of each turn and applies each one to
//! the player's kingdom. Every action yields one `ActionResult`; rejected
//! actions leave the kingdom untouched and carry the reason.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};
use rand::Rng;

use crate::ecs::components::{
    Army, Bank, Court, Economy, Kingdom, KingdomCore, Population, Weather,
};
use crate::ecs::events::KingdomEvent;
use crate::ecs::resources::{ActionResults, ActionsRng, PendingActions};
use crate::ecs::schedule::{DomainSet, TurnTick};
use crate::ecs::state::GameState;
use crate::error::{GameError, Result};
use crate::model::action::{
    ActionOutcome, ActionResult, BattleKind, KingdomAction, SOLDIERS_PER_UNIT, TrainingProgram,
    UnitKind, strategy_modifiers,
};
use crate::model::economy::ResourceType;
use crate::model::environment::TerrainType;
use crate::model::leader::Leader;
use crate::model::military::{CombatStrategy, MilitaryUnit};
use crate::model::stats::pick;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const RECRUIT_FOOD_PER_SOLDIER: i32 = 1;
const RECRUIT_MORALE_CEILING: i32 = 95;
const RECRUIT_MORALE_BOOST: i32 = 5;
const DISBAND_MORALE_PENALTY: i32 = 5;

const VICTORY_MORALE: i32 = 10;
const DEFEAT_MORALE: i32 = -20;
/// Victory needs our strength above the enemy's times 0.7 + rand * 0.6.
const BATTLE_LUCK_BASE: f64 = 0.7;
const BATTLE_LUCK_SPREAD: f64 = 0.6;

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub struct ActionsPlugin;

impl Plugin for ActionsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, process_actions.in_set(DomainSet::Actions));
    }
}

/// Mutable view of the kingdom an action applies to.
struct Realm<'a> {
    entity: Entity,
    stability: i32,
    population: &'a mut Population,
    economy: &'a mut Economy,
    army: &'a mut Army,
    court: &'a mut Court,
    bank: &'a mut Bank,
    weather: &'a Weather,
}

// ---------------------------------------------------------------------------
// Main dispatch
// ---------------------------------------------------------------------------

#[allow(clippy::type_complexity)]
fn process_actions(
    mut pending: ResMut<PendingActions>,
    mut results: ResMut<ActionResults>,
    state: Res<GameState>,
    mut kingdoms: Query<
        (
            &KingdomCore,
            &mut Population,
            &mut Economy,
            &mut Army,
            &mut Court,
            &mut Bank,
            &Weather,
        ),
        With<Kingdom>,
    >,
    mut rng: ResMut<ActionsRng>,
    mut events: MessageWriter<KingdomEvent>,
) {
    let actions = std::mem::take(&mut pending.0);
    let rng = &mut rng.0;

    for action in actions {
        let label = action.kind.label();
        let outcome = match state.player {
            Some(entity) => match kingdoms.get_mut(entity) {
                Ok((core, mut population, mut economy, mut army, mut court, mut bank, weather)) => {
                    let mut realm = Realm {
                        entity,
                        stability: core.stability(),
                        population: &mut *population,
                        economy: &mut *economy,
                        army: &mut *army,
                        court: &mut *court,
                        bank: &mut *bank,
                        weather,
                    };
                    apply_action(&mut realm, &action.kind, rng, &mut events)
                }
                Err(_) => Err(GameError::NoKingdom("player".into())),
            },
            None => Err(GameError::NoKingdom("player".into())),
        };

        let outcome = match outcome {
            Ok(summary) => {
                tracing::debug!(action = label, %summary, "action applied");
                ActionOutcome::Success { summary }
            }
            Err(err) => {
                tracing::warn!(action = label, error = %err, "action rejected");
                ActionOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };
        results.0.push(ActionResult {
            source: action.source,
            action: label,
            outcome,
        });
    }
}

fn apply_action(
    realm: &mut Realm<'_>,
    action: &KingdomAction,
    rng: &mut impl Rng,
    events: &mut MessageWriter<KingdomEvent>,
) -> Result<String> {
    match action {
        // -- Economy --
        KingdomAction::SetTaxRate { class, rate } => {
            let class = realm.population.class_mut(*class)?;
            class.set_tax_rate(rate.clamp(0.0, 1.0))?;
            Ok(format!(
                "{} now taxed at {:.0}%",
                class.name(),
                class.tax_rate() * 100.0
            ))
        }
        KingdomAction::SetGatherRate { resource, rate } => {
            let resource = realm.economy.resource_mut(*resource);
            resource.set_gather_rate(*rate);
            Ok(format!(
                "{} gathered at {} per turn",
                resource.kind.label(),
                resource.gather_rate()
            ))
        }
        KingdomAction::SetConsumptionRate { resource, rate } => {
            let resource = realm.economy.resource_mut(*resource);
            resource.set_consumption_rate(*rate);
            Ok(format!(
                "{} consumed at {} per turn",
                resource.kind.label(),
                resource.consumption_rate()
            ))
        }
        KingdomAction::SetStockpile { resource, on } => {
            realm.economy.set_stockpiled(*resource, *on);
            let state = if *on { "stockpiled" } else { "released" };
            Ok(format!("{} {state}", resource.label()))
        }
        KingdomAction::Barter { sell, amount, buy } => {
            let received = realm.economy.barter(*sell, *amount, *buy, rng)?;
            Ok(format!(
                "traded {amount} {} for {received} {}",
                sell.label(),
                buy.label()
            ))
        }
        KingdomAction::EstablishTradeRoute {
            partner,
            export,
            export_amount,
            import,
        } => {
            let route =
                realm
                    .economy
                    .establish_route(partner.as_str(), *export, *export_amount, *import)?;
            Ok(format!(
                "route to {}: {} {} for {} {}",
                route.partner,
                route.export_amount,
                route.export.label(),
                route.import_amount,
                route.import.label()
            ))
        }
        KingdomAction::CancelTradeRoute { index } => {
            let route = realm.economy.cancel_route(*index)?;
            Ok(format!("route to {} cancelled", route.partner))
        }

        // -- Bank --
        KingdomAction::TakeLoan { amount, term } => {
            let loan = realm
                .bank
                .provide_loan(*amount, *term, &mut realm.economy.treasury)?;
            Ok(format!(
                "{}: {} gold over {} turns at {:.1}%",
                loan.name,
                loan.amount,
                loan.term,
                loan.interest_rate * 100.0
            ))
        }
        KingdomAction::RepayLoans { amount } => {
            let repaid = realm.bank.repay_loans(*amount, &mut realm.economy.treasury)?;
            Ok(format!("repaid {repaid} gold"))
        }
        KingdomAction::Invest { amount, term } => {
            let investment =
                realm
                    .bank
                    .make_investment(*amount, *term, &mut realm.economy.treasury)?;
            Ok(format!(
                "{}: {} gold for {} turns, expecting {}",
                investment.name,
                investment.amount,
                investment.term,
                investment.expected_return()
            ))
        }
        KingdomAction::SetInterestRate { percent } => {
            realm.bank.set_rates(*percent)?;
            Ok(format!("interest rate set to {percent:.1}%"))
        }
        KingdomAction::AuditBank => {
            let recovered = realm.bank.audit(rng);
            if recovered > 0 {
                Ok(format!("audit recovered {recovered} gold"))
            } else {
                Ok("audit found nothing amiss".to_string())
            }
        }
        KingdomAction::ReviewInterestRate => {
            realm.bank.adjust_interest_rate(realm.stability, rng);
            Ok(format!(
                "interest rate now {:.1}%",
                realm.bank.interest_rate() * 100.0
            ))
        }

        // -- Military --
        KingdomAction::Recruit { kind, units } => recruit(realm, *kind, *units),
        KingdomAction::Train { program } => train(realm, *program, rng),
        KingdomAction::Disband { index } => {
            let unit = realm.army.remove_unit(*index)?;
            realm.army.adjust_morale(-DISBAND_MORALE_PENALTY);
            Ok(format!("{} disbanded", unit.name()))
        }
        KingdomAction::SetStrategy { strategy } => {
            realm.army.strategy = *strategy;
            Ok(format!("army now fights {strategy}"))
        }
        KingdomAction::Battle {
            kind,
            strategy,
            terrain,
        } => battle(realm, *kind, *strategy, *terrain, rng, events),

        // -- Court --
        KingdomAction::HoldElection => {
            let outcomes = realm.court.hold_election(rng);
            let winner = realm
                .court
                .ruler()
                .map(Leader::styled_name)
                .ok_or(GameError::NoLeader)?;
            for outcome in outcomes {
                events.write(KingdomEvent::from_court(realm.entity, outcome));
            }
            Ok(format!("{winner} won the election"))
        }
    }
}

// ---------------------------------------------------------------------------
// Military actions
// ---------------------------------------------------------------------------

fn recruit(realm: &mut Realm<'_>, kind: UnitKind, units: u32) -> Result<String> {
    if units == 0 {
        return Err(GameError::invalid("must recruit at least one unit"));
    }
    realm.economy.treasury.spend(kind.cost() * units as i64)?;

    let (attack, defense, speed) = kind.stats();
    for _ in 0..units {
        let name = format!("{} #{}", kind.label(), realm.army.units().len() + 1);
        realm.army.add_unit(MilitaryUnit::new(
            name,
            SOLDIERS_PER_UNIT,
            attack,
            defense,
            speed,
            RECRUIT_FOOD_PER_SOLDIER,
        ));
    }
    if realm.army.morale() < RECRUIT_MORALE_CEILING {
        realm.army.set_morale(realm.army.morale() + RECRUIT_MORALE_BOOST);
    }
    Ok(format!("recruited {units} {} units", kind.label()))
}

fn train(realm: &mut Realm<'_>, program: TrainingProgram, rng: &mut impl Rng) -> Result<String> {
    let spec = program.spec();
    realm.economy.treasury.spend(spec.cost)?;
    realm.army.set_discipline(realm.army.discipline() + spec.discipline);
    realm.army.set_training(realm.army.training() + 1);
    realm.army.improve_units(spec.strength_pct, rng);
    realm.army.adjust_morale(spec.morale);
    Ok(format!(
        "{program} training complete, strength now {}",
        realm.army.total_strength()
    ))
}

fn battle(
    realm: &mut Realm<'_>,
    kind: BattleKind,
    strategy: CombatStrategy,
    terrain: TerrainType,
    rng: &mut impl Rng,
    events: &mut MessageWriter<KingdomEvent>,
) -> Result<String> {
    if realm.army.units().is_empty() {
        return Err(GameError::invalid("no units to send into battle"));
    }
    let spec = kind.spec();
    let (strength_mod, reward_mod, casualty_mod) = strategy_modifiers(strategy);
    realm.army.strategy = strategy;

    let ruler = realm.court.ruler();
    let fielded = realm.army.field_strength(realm.weather, ruler, terrain, rng) as f64;
    let ours = fielded * strength_mod * ruler.map_or(1.0, Leader::military_bonus);
    let enemy = realm.army.total_strength() as f64 * spec.enemy_ratio;
    let victory = ours > enemy * (BATTLE_LUCK_BASE + rng.random::<f64>() * BATTLE_LUCK_SPREAD);

    let mut gold_won = 0;
    let summary = if victory {
        gold_won = ((spec.gold.0 + rng.random_range(0..=spec.gold.1)) as f64 * reward_mod) as i64;
        let spoils =
            ((spec.resources.0 + rng.random_range(0..=spec.resources.1)) as f64 * reward_mod) as i64;
        let spoils_kind = *pick(rng, ResourceType::ALL);
        realm.economy.treasury.earn(gold_won);
        realm.economy.resource_mut(spoils_kind).adjust(spoils);
        let lost = realm
            .army
            .lose_units(spec.unit_loss_risk * casualty_mod / 2.0, rng);
        realm.army.adjust_morale(VICTORY_MORALE);
        (
            lost,
            format!(
                "{kind} won: {gold_won} gold and {spoils} {} taken",
                spoils_kind.label()
            ),
        )
    } else {
        let lost = realm.army.lose_units(spec.unit_loss_risk * casualty_mod, rng);
        realm.army.adjust_morale(DEFEAT_MORALE);
        (lost, format!("{kind} lost"))
    };
    realm.army.drill_units(rng);

    let (units_lost, summary) = summary;
    events.write(KingdomEvent::BattleFought {
        kingdom: realm.entity,
        victory,
        units_lost,
        gold_won,
    });
    Ok(format!("{summary}, {units_lost} units lost"))
}

#[cfg(test)]
mod tests {
    use bevy_app::App;

    use super::*;
    use crate::config::GameConfig;
    use crate::ecs::app::build_game_app_deterministic;
    use crate::ecs::spawn::new_game;
    use crate::model::action::Action;

    fn setup_app() -> (App, Entity) {
        let config = GameConfig::default();
        let mut app = build_game_app_deterministic(&config, 42);
        let player = new_game(app.world_mut(), &config);
        app.add_plugins(ActionsPlugin);
        (app, player)
    }

    fn queue_action(app: &mut App, kind: KingdomAction) {
        app.world_mut()
            .resource_mut::<PendingActions>()
            .0
            .push(Action::player(kind));
    }

    fn tick(app: &mut App) {
        app.world_mut().run_schedule(TurnTick);
    }

    fn get_results(app: &App) -> Vec<ActionResult> {
        app.world().resource::<ActionResults>().0.clone()
    }

    fn gold(app: &App, player: Entity) -> i64 {
        app.world().get::<Economy>(player).unwrap().treasury.gold()
    }

    // -----------------------------------------------------------------------
    // Economy
    // -----------------------------------------------------------------------

    #[test]
    fn tax_rate_is_clamped_to_unit_range() {
        let (mut app, player) = setup_app();
        queue_action(&mut app, KingdomAction::SetTaxRate { class: 0, rate: 1.7 });
        tick(&mut app);

        let results = get_results(&app);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_success(), "{:?}", results[0].outcome);
        let population = app.world().get::<Population>(player).unwrap();
        assert_eq!(population.classes()[0].tax_rate(), 1.0);
    }

    #[test]
    fn bad_class_index_fails_without_panicking() {
        let (mut app, _) = setup_app();
        queue_action(&mut app, KingdomAction::SetTaxRate { class: 99, rate: 0.2 });
        tick(&mut app);

        let results = get_results(&app);
        assert!(matches!(&results[0].outcome, ActionOutcome::Failed { .. }));
    }

    #[test]
    fn queue_is_drained_each_turn() {
        let (mut app, _) = setup_app();
        queue_action(&mut app, KingdomAction::AuditBank);
        queue_action(&mut app, KingdomAction::ReviewInterestRate);
        tick(&mut app);
        assert!(app.world().resource::<PendingActions>().0.is_empty());
        assert_eq!(get_results(&app).len(), 2);
        tick(&mut app);
        assert_eq!(get_results(&app).len(), 2);
    }

    #[test]
    fn loan_adds_gold() {
        let (mut app, player) = setup_app();
        let before = gold(&app, player);
        queue_action(&mut app, KingdomAction::TakeLoan { amount: 300, term: 10 });
        tick(&mut app);
        assert!(get_results(&app)[0].is_success());
        assert_eq!(gold(&app, player), before + 300);
    }

    // -----------------------------------------------------------------------
    // Military
    // -----------------------------------------------------------------------

    #[test]
    fn recruit_names_units_in_sequence() {
        let (mut app, player) = setup_app();
        let before = gold(&app, player);
        queue_action(
            &mut app,
            KingdomAction::Recruit {
                kind: UnitKind::Archers,
                units: 2,
            },
        );
        tick(&mut app);

        assert!(get_results(&app)[0].is_success());
        let army = app.world().get::<Army>(player).unwrap();
        let names: Vec<&str> = army.units().iter().map(|u| u.name()).collect();
        assert_eq!(&names[3..], &["Archers #4", "Archers #5"]);
        assert_eq!(army.units()[3].count(), SOLDIERS_PER_UNIT);
        assert_eq!(gold(&app, player), before - 150);
    }

    #[test]
    fn recruit_beyond_means_is_rejected() {
        let (mut app, player) = setup_app();
        queue_action(
            &mut app,
            KingdomAction::Recruit {
                kind: UnitKind::RoyalGuards,
                units: 100,
            },
        );
        tick(&mut app);

        let results = get_results(&app);
        match &results[0].outcome {
            ActionOutcome::Failed { reason } => assert!(reason.contains("gold"), "{reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(app.world().get::<Army>(player).unwrap().units().len(), 3);
    }

    #[test]
    fn training_costs_gold_and_raises_discipline() {
        let (mut app, player) = setup_app();
        let before = gold(&app, player);
        let discipline = app.world().get::<Army>(player).unwrap().discipline();
        queue_action(
            &mut app,
            KingdomAction::Train {
                program: TrainingProgram::Basic,
            },
        );
        tick(&mut app);

        assert!(get_results(&app)[0].is_success());
        assert_eq!(gold(&app, player), before - 50);
        let army = app.world().get::<Army>(player).unwrap();
        assert_eq!(army.discipline(), discipline + 10);
    }

    #[test]
    fn disband_out_of_range_fails() {
        let (mut app, _) = setup_app();
        queue_action(&mut app, KingdomAction::Disband { index: 9 });
        tick(&mut app);
        assert!(!get_results(&app)[0].is_success());
    }

    #[test]
    fn raid_reports_battle() {
        let (mut app, player) = setup_app();
        queue_action(
            &mut app,
            KingdomAction::Battle {
                kind: BattleKind::Raid,
                strategy: CombatStrategy::Balanced,
                terrain: TerrainType::Plains,
            },
        );
        tick(&mut app);

        let results = get_results(&app);
        assert!(results[0].is_success(), "{:?}", results[0].outcome);
        let army = app.world().get::<Army>(player).unwrap();
        assert_eq!(army.strategy, CombatStrategy::Balanced);
    }

    #[test]
    fn battle_without_units_fails() {
        let (mut app, player) = setup_app();
        *app.world_mut().get_mut::<Army>(player).unwrap() = Army::empty();
        queue_action(
            &mut app,
            KingdomAction::Battle {
                kind: BattleKind::Major,
                strategy: CombatStrategy::Aggressive,
                terrain: TerrainType::Mountains,
            },
        );
        tick(&mut app);
        assert!(!get_results(&app)[0].is_success());
    }

    #[test]
    fn election_seats_a_ruler() {
        let (mut app, player) = setup_app();
        queue_action(&mut app, KingdomAction::HoldElection);
        tick(&mut app);
        assert!(get_results(&app)[0].is_success());
        let court = app.world().get::<Court>(player).unwrap();
        assert!(court.ruler().is_some_and(|r| r.elected));
    }

    #[test]
    fn actions_without_player_fail() {
        let config = GameConfig::default();
        let mut app = build_game_app_deterministic(&config, 1);
        app.add_plugins(ActionsPlugin);
        queue_action(&mut app, KingdomAction::AuditBank);
        tick(&mut app);
        match &get_results(&app)[0].outcome {
            ActionOutcome::Failed { reason } => assert!(reason.contains("player")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
