//! Bank system.
//!
//! One system in `DomainSet::Bank`:
//! 1. `update_banks` — loans run down or default, investments mature into the
//!    treasury, and a corrupt ruler gets a chance to skim the reserves

use bevy_app::{App, Plugin};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{Bank, Court, Economy, Kingdom, KingdomCore};
use crate::ecs::resources::BankRng;
use crate::ecs::schedule::{DomainSet, TurnTick};

pub struct BankPlugin;

impl Plugin for BankPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(TurnTick, update_banks.in_set(DomainSet::Bank));
    }
}

fn update_banks(
    mut kingdoms: Query<(&KingdomCore, &mut Bank, &mut Economy, &Court), With<Kingdom>>,
    mut rng: ResMut<BankRng>,
) {
    let rng = &mut rng.0;
    for (core, mut bank, mut economy, court) in kingdoms.iter_mut() {
        let report = bank.update(&mut economy.treasury, rng);
        if report.defaults > 0 {
            tracing::debug!(kingdom = %core.name, defaults = report.defaults, "loans defaulted");
        }
        if report.investment_payout > 0 {
            tracing::debug!(kingdom = %core.name, payout = report.investment_payout, "investments matured");
        }

        let Some(ruler) = court.ruler() else {
            continue;
        };
        let skimmed = bank.handle_fraud(ruler, rng);
        if skimmed > 0 {
            tracing::debug!(kingdom = %core.name, ruler = %ruler.name(), skimmed, "reserves skimmed");
        }
    }
}
