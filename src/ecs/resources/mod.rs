pub mod chronicle;
pub mod game_resources;

pub use chronicle::{Chronicle, ChronicleEntry};
pub use game_resources::{
    ActionResults, ActionsRng, BankRng, DiseaseRng, EconomyRng, EventsRng, GameRng, LeadershipRng,
    MilitaryRng, PendingActions, PopulationRng, RivalsRng, StabilityRng, WeatherRng, distribute_rng,
};
