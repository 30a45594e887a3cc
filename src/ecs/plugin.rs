use bevy_app::{App, Plugin};

use super::systems::actions::ActionsPlugin;
use super::systems::bank::BankPlugin;
use super::systems::chronicle::ChroniclePlugin;
use super::systems::disease::DiseasePlugin;
use super::systems::economy::EconomyPlugin;
use super::systems::endgame::EndgamePlugin;
use super::systems::leadership::LeadershipPlugin;
use super::systems::military::MilitaryPlugin;
use super::systems::population::PopulationPlugin;
use super::systems::random_events::RandomEventsPlugin;
use super::systems::rivals::RivalsPlugin;
use super::systems::stability::StabilityPlugin;
use super::systems::weather::WeatherPlugin;

/// Aggregate plugin that installs every game system.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ActionsPlugin,
            LeadershipPlugin,
            WeatherPlugin,
            DiseasePlugin,
            PopulationPlugin,
            EconomyPlugin,
            MilitaryPlugin,
            RandomEventsPlugin,
            BankPlugin,
            StabilityPlugin,
            RivalsPlugin,
            EndgamePlugin,
            ChroniclePlugin,
        ));
    }
}
